#![allow(missing_docs)]

use binmsg::msg::{DecodeOptions, Graph, Object, ObjectId, TypeName, Value, decode_with, encode, encode_value};

#[test]
fn repeated_string_is_shorter_than_distinct_strings() {
	let repeated = Value::List(vec![Value::from("shared-text"), Value::I32(1), Value::from("shared-text")]);
	let distinct = Value::List(vec![Value::from("shared-text"), Value::I32(1), Value::from("other-text!")]);

	let repeated_len = encode_value(&repeated).expect("encodes").len();
	let distinct_len = encode_value(&distinct).expect("encodes").len();
	assert!(repeated_len < distinct_len, "repeated={repeated_len} distinct={distinct_len}");
	// literal is 1 + 11 bytes, the back-reference 2
	assert_eq!(distinct_len - repeated_len, 10);
}

#[test]
fn strings_longer_than_intern_limit_are_always_literal() {
	let long = "a".repeat(256);
	let repeated = Value::List(vec![Value::String(long.clone()), Value::String(long.clone())]);
	let single = encode_value(&Value::String(long)).expect("encodes").len();
	let both = encode_value(&repeated).expect("encodes").len();
	// header, list tag, and two full literals
	assert_eq!(both, 2 + 1 + 2 * (single - 2));
}

#[test]
fn shared_object_is_written_once_and_stays_shared() {
	let mut shared = Graph::default();
	let point = shared.insert(Object {
		type_name: TypeName::new("Geo", "Point"),
		fields: vec![("x".to_owned(), Value::I32(3)), ("y".to_owned(), Value::I32(4))],
	});
	shared.root = Value::List(vec![Value::Object(point), Value::Object(point)]);

	let mut copies = Graph::default();
	let first = copies.insert(shared.objects()[0].clone());
	let second = copies.insert(shared.objects()[0].clone());
	copies.root = Value::List(vec![Value::Object(first), Value::Object(second)]);

	let shared_bytes = encode(&shared).expect("encodes");
	let copy_bytes = encode(&copies).expect("encodes");
	assert!(shared_bytes.len() < copy_bytes.len());

	let decoded = decode_with(&shared_bytes, &DecodeOptions::for_inspection()).expect("decodes");
	assert_eq!(decoded.objects().len(), 1);
	assert_eq!(decoded.root, Value::List(vec![Value::Object(ObjectId(0)), Value::Object(ObjectId(0))]));

	let decoded = decode_with(&copy_bytes, &DecodeOptions::for_inspection()).expect("decodes");
	assert_eq!(decoded.objects().len(), 2);
	assert_eq!(decoded.objects()[0], decoded.objects()[1]);
}
