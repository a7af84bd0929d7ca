#![allow(missing_docs)]

use binmsg::msg::{Array, Value, decode, encode_value};

const BOUNDARIES: [usize; 4] = [15, 16, 2047, 2048];

/// Expected tag plus count prefix for a container or string of `len` items.
fn prefix(base: u8, len: usize) -> Vec<u8> {
	match len {
		15 => vec![base | 0x0f],
		16 => vec![base | 0x10, 0x10],
		2047 => vec![base | 0x17, 0xff],
		2048 => vec![base | 0x18, 0x08, 0x00],
		other => panic!("no expectation for {other}"),
	}
}

#[test]
fn ascii_strings_cross_count_widths() {
	for len in BOUNDARIES {
		let text = "q".repeat(len);
		let bytes = encode_value(&Value::String(text.clone())).expect("encodes");
		let expected = prefix(0x20, len);
		assert_eq!(&bytes[2..2 + expected.len()], expected.as_slice(), "len={len}");
		assert_eq!(bytes.len(), 2 + expected.len() + len, "len={len}");

		let graph = decode(&bytes).expect("decodes");
		assert_eq!(graph.root.as_str().map(str::len), Some(len), "len={len}");
	}
}

#[test]
fn lists_cross_count_widths() {
	for len in BOUNDARIES {
		let list = Value::List(vec![Value::Null; len]);
		let bytes = encode_value(&list).expect("encodes");
		let expected = prefix(0x80, len);
		assert_eq!(&bytes[2..2 + expected.len()], expected.as_slice(), "len={len}");

		match decode(&bytes).expect("decodes").root {
			Value::List(items) => assert_eq!(items.len(), len),
			other => panic!("expected list, got {}", other.kind()),
		}
	}
}

#[test]
fn maps_cross_count_widths() {
	for len in BOUNDARIES {
		let entries = (0..len).map(|idx| (Value::I32(idx as i32), Value::Bool(idx % 2 == 0))).collect();
		let bytes = encode_value(&Value::Map(entries)).expect("encodes");
		let expected = prefix(0xc0, len);
		assert_eq!(&bytes[2..2 + expected.len()], expected.as_slice(), "len={len}");

		match decode(&bytes).expect("decodes").root {
			Value::Map(entries) => {
				assert_eq!(entries.len(), len);
				assert_eq!(entries[len - 1].0, Value::I32(len as i32 - 1));
			}
			other => panic!("expected map, got {}", other.kind()),
		}
	}
}

#[test]
fn dense_arrays_keep_exact_length() {
	for len in BOUNDARIES {
		let floats: Vec<f32> = (0..len).map(|idx| idx as f32 * 0.5).collect();
		let array = Value::Array(Array::Float(floats));
		let bytes = encode_value(&array).expect("encodes");
		let graph = decode(&bytes).expect("decodes");
		assert_eq!(graph.root, array, "len={len}");
	}
}
