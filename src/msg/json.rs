//! Conversion between value graphs and JSON.
//!
//! Objects render as `{"$type": "ns.Name", "$id": n, ...fields}` on first
//! occurrence and `{"$ref": n}` afterwards, so shared and cyclic graphs stay finite.

use std::collections::HashSet;

use serde_json::{Map, Number, json};

use crate::msg::{Array, Error, Graph, ObjectId, Result, Value};

/// Render a graph as JSON.
pub fn to_json(graph: &Graph) -> Result<serde_json::Value> {
	JsonWriter {
		graph,
		seen: HashSet::new(),
	}
	.value(&graph.root)
}

/// Render a graph as JSON text.
pub fn to_json_string(graph: &Graph, pretty: bool) -> Result<String> {
	let value = to_json(graph)?;
	let text = if pretty { serde_json::to_string_pretty(&value)? } else { serde_json::to_string(&value)? };
	Ok(text)
}

/// Convert parsed JSON into a value.
///
/// Objects become string-keyed maps in document order, arrays become untyped
/// lists, integers that fit `i32` become `I32`, other integers `I64` (or `U64`
/// above `i64::MAX`), and all other numbers `F64`.
pub fn from_json(value: &serde_json::Value) -> Value {
	match value {
		serde_json::Value::Null => Value::Null,
		serde_json::Value::Bool(v) => Value::Bool(*v),
		serde_json::Value::Number(number) => number_value(number),
		serde_json::Value::String(text) => Value::String(text.clone()),
		serde_json::Value::Array(items) => Value::List(items.iter().map(from_json).collect()),
		serde_json::Value::Object(entries) => Value::Map(entries.iter().map(|(k, v)| (Value::String(k.clone()), from_json(v))).collect()),
	}
}

/// Parse JSON text into a value.
pub fn from_json_str(text: &str) -> Result<Value> {
	let parsed: serde_json::Value = serde_json::from_str(text)?;
	Ok(from_json(&parsed))
}

fn number_value(number: &Number) -> Value {
	if let Some(v) = number.as_i64() {
		return i32::try_from(v).map_or(Value::I64(v), Value::I32);
	}
	if let Some(v) = number.as_u64() {
		return Value::U64(v);
	}
	Value::F64(number.as_f64().unwrap_or(f64::NAN))
}

struct JsonWriter<'g> {
	graph: &'g Graph,
	seen: HashSet<ObjectId>,
}

impl JsonWriter<'_> {
	fn value(&mut self, value: &Value) -> Result<serde_json::Value> {
		Ok(match value {
			Value::Null => serde_json::Value::Null,
			Value::Bool(v) => json!(v),
			Value::Byte(v) => json!(v),
			Value::Char(v) => json!(v.to_string()),
			Value::I16(v) => json!(v),
			Value::U16(v) => json!(v),
			Value::I32(v) => json!(v),
			Value::U32(v) => json!(v),
			Value::I64(v) => json!(v),
			Value::U64(v) => json!(v),
			Value::F32(v) => float(f64::from(*v))?,
			Value::F64(v) => float(*v)?,
			Value::DateTime(v) => json!(v.to_unix()),
			Value::Vector2(v) => floats(v)?,
			Value::Vector3(v) => floats(v)?,
			Value::Vector4(v) => floats(v)?,
			Value::Quaternion(v) => floats(v)?,
			Value::Color(v) => floats(&[v.r, v.g, v.b, v.a])?,
			Value::Color32(v) => json!(v),
			Value::Rect(v) => json!({ "x": float(f64::from(v.x))?, "y": float(f64::from(v.y))?, "width": float(f64::from(v.width))?, "height": float(f64::from(v.height))? }),
			Value::Bounds(v) => json!({ "center": floats(&v.center)?, "size": floats(&v.size)? }),
			Value::String(v) => json!(v),
			Value::Array(array) => self.array(array)?,
			Value::MultiArray(array) => self.nested(&array.dims, &array.items)?,
			Value::List(items)
			| Value::TypedList { items, .. }
			| Value::Set { items, .. }
			| Value::Queue { items, .. }
			| Value::Stack { items, .. } => self.list(items)?,
			Value::Map(entries) | Value::Dictionary { entries, .. } => self.entries(entries)?,
			Value::Object(id) => self.object(*id)?,
		})
	}

	fn list(&mut self, items: &[Value]) -> Result<serde_json::Value> {
		let items = items.iter().map(|item| self.value(item)).collect::<Result<Vec<_>>>()?;
		Ok(serde_json::Value::Array(items))
	}

	fn array(&mut self, array: &Array) -> Result<serde_json::Value> {
		Ok(match array {
			Array::Any(items) | Array::Typed { items, .. } => self.list(items)?,
			Array::Bool(items) => json!(items),
			Array::Byte(items) => json!(items),
			Array::Int(items) => json!(items),
			Array::Float(items) => floats(items)?,
			Array::Vector2(items) => serde_json::Value::Array(items.iter().map(|item| floats(item)).collect::<Result<_>>()?),
			Array::Vector3(items) => serde_json::Value::Array(items.iter().map(|item| floats(item)).collect::<Result<_>>()?),
			Array::Color(items) => serde_json::Value::Array(items.iter().map(|c| floats(&[c.r, c.g, c.b, c.a])).collect::<Result<_>>()?),
			Array::Color32(items) => json!(items),
			Array::String(items) => json!(items),
		})
	}

	/// Row-major items reshaped into nested arrays.
	fn nested(&mut self, dims: &[usize], items: &[Value]) -> Result<serde_json::Value> {
		let Some((first, rest)) = dims.split_first() else {
			return self.list(items);
		};
		if rest.is_empty() {
			return self.list(items);
		}
		let stride: usize = rest.iter().product();
		let mut rows = Vec::with_capacity(*first);
		for row in 0..*first {
			let start = row * stride;
			let chunk = items.get(start..start + stride).ok_or_else(|| Error::JsonBridge {
				reason: format!("array shape {dims:?} does not hold {} items", items.len()),
			})?;
			rows.push(self.nested(rest, chunk)?);
		}
		Ok(serde_json::Value::Array(rows))
	}

	fn entries(&mut self, entries: &[(Value, Value)]) -> Result<serde_json::Value> {
		if entries.iter().all(|(k, _)| k.as_str().is_some()) {
			let mut out = Map::with_capacity(entries.len());
			for (k, v) in entries {
				out.insert(k.as_str().unwrap_or_default().to_owned(), self.value(v)?);
			}
			return Ok(serde_json::Value::Object(out));
		}

		let mut pairs = Vec::with_capacity(entries.len());
		for (k, v) in entries {
			pairs.push(serde_json::Value::Array(vec![self.value(k)?, self.value(v)?]));
		}
		Ok(serde_json::Value::Array(pairs))
	}

	fn object(&mut self, id: ObjectId) -> Result<serde_json::Value> {
		if !self.seen.insert(id) {
			return Ok(json!({ "$ref": id.0 }));
		}
		let graph = self.graph;
		let object = graph.get(id).ok_or_else(|| Error::JsonBridge {
			reason: format!("dangling object id {}", id.0),
		})?;

		let type_name = if object.type_name.namespace.is_empty() {
			object.type_name.name.clone()
		} else {
			format!("{}.{}", object.type_name.namespace, object.type_name.name)
		};
		let mut out = Map::with_capacity(object.fields.len() + 2);
		out.insert("$type".to_owned(), json!(type_name));
		out.insert("$id".to_owned(), json!(id.0));
		for (name, value) in &object.fields {
			out.insert(name.clone(), self.value(value)?);
		}
		Ok(serde_json::Value::Object(out))
	}
}

fn float(value: f64) -> Result<serde_json::Value> {
	Number::from_f64(value).map(serde_json::Value::Number).ok_or_else(|| Error::JsonBridge {
		reason: format!("non-finite float {value} has no JSON form"),
	})
}

fn floats(values: &[f32]) -> Result<serde_json::Value> {
	let items = values.iter().map(|v| float(f64::from(*v))).collect::<Result<Vec<_>>>()?;
	Ok(serde_json::Value::Array(items))
}
