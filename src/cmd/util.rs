use std::fs;
use std::path::Path;

use binmsg::msg::{Compression, Result, Value, decode_bytes};

/// Stored buffer with compression removed.
pub(crate) struct Loaded {
	pub(crate) file_size: usize,
	pub(crate) compression: Compression,
	pub(crate) bytes: Vec<u8>,
}

/// Read a file and undo zstd compression when present.
pub(crate) fn load(path: &Path) -> Result<Loaded> {
	let raw = fs::read(path)?;
	let file_size = raw.len();
	let (compression, bytes) = decode_bytes(raw)?;
	Ok(Loaded {
		file_size,
		compression,
		bytes,
	})
}

/// Print a serializable payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}

/// One-line rendering of a scalar, or `None` for containers and objects.
pub(crate) fn scalar_label(value: &Value) -> Option<String> {
	let text = match value {
		Value::Null => "null".to_owned(),
		Value::Bool(v) => v.to_string(),
		Value::Byte(v) => v.to_string(),
		Value::Char(v) => format!("{v:?}"),
		Value::I16(v) => v.to_string(),
		Value::U16(v) => v.to_string(),
		Value::I32(v) => v.to_string(),
		Value::U32(v) => v.to_string(),
		Value::I64(v) => v.to_string(),
		Value::U64(v) => v.to_string(),
		Value::F32(v) => v.to_string(),
		Value::F64(v) => v.to_string(),
		Value::DateTime(v) => format!("@{}", v.to_unix()),
		Value::Vector2(v) => format!("{v:?}"),
		Value::Vector3(v) => format!("{v:?}"),
		Value::Vector4(v) | Value::Quaternion(v) => format!("{v:?}"),
		Value::Color(c) => format!("rgba({}, {}, {}, {})", c.r, c.g, c.b, c.a),
		Value::Color32(v) => format!("#{:02x}{:02x}{:02x}{:02x}", v[0], v[1], v[2], v[3]),
		Value::Rect(r) => format!("rect({}, {}, {}x{})", r.x, r.y, r.width, r.height),
		Value::Bounds(b) => format!("bounds(center={:?}, size={:?})", b.center, b.size),
		Value::String(v) => format!("{v:?}"),
		_ => return None,
	};
	Some(text)
}

/// Kind label with element count for containers.
pub(crate) fn shape_label(value: &Value) -> String {
	let len = match value {
		Value::Array(array) => array.len(),
		Value::MultiArray(array) => {
			let dims: Vec<String> = array.dims.iter().map(ToString::to_string).collect();
			return format!("multi_array[{}]", dims.join("x"));
		}
		Value::List(items) | Value::TypedList { items, .. } | Value::Set { items, .. } | Value::Queue { items, .. } | Value::Stack { items, .. } => items.len(),
		Value::Map(entries) | Value::Dictionary { entries, .. } => entries.len(),
		other => return other.kind().to_owned(),
	};
	format!("{}[{len}]", value.kind())
}

#[cfg(test)]
mod tests;
