#![allow(missing_docs)]

use binmsg::msg::{
	Array, Bounds, Color, DecodeError, DecodeOptions, ElementType, Graph, Object, Rect, Timestamp, TypeName, Value, decode, decode_with, encode,
	encode_value,
};
use binmsg_testkit::{truncations, unhex};

fn rich_graph() -> Graph {
	let mut graph = Graph::default();
	let owner = graph.insert(Object {
		type_name: TypeName::new("Demo", "Owner"),
		fields: vec![("name".to_owned(), Value::from("Grace")), ("self".to_owned(), Value::Null)],
	});
	graph.get_mut(owner).expect("owner").set_field("self", Value::Object(owner));

	graph.root = Value::Map(vec![
		(Value::from("owner"), Value::Object(owner)),
		(Value::from("again"), Value::Object(owner)),
		(Value::from("text"), Value::from("ünïcode")),
		(Value::from("wide"), Value::I64(-1 << 40)),
		(Value::from("when"), Value::DateTime(Timestamp(1_700_000_000))),
		(Value::from("tint"), Value::Color(Color::new(1.0, 0.0, 1.0, 1.0))),
		(Value::from("rect"), Value::Rect(Rect { x: 1.0, y: 2.0, width: 3.0, height: 4.0 })),
		(
			Value::from("box"),
			Value::Bounds(Bounds {
				center: [0.0, 1.0, 2.0],
				size: [3.0, 4.0, 5.0],
			}),
		),
		(Value::from("ints"), Value::Array(Array::Int(vec![1, 300, 70_000]))),
		(
			Value::from("names"),
			Value::TypedList {
				element: ElementType::String,
				items: vec![Value::from("a"), Value::from("b"), Value::from("a")],
			},
		),
		(
			Value::from("stack"),
			Value::Stack {
				element: Some(ElementType::I32),
				items: vec![Value::I32(1), Value::I32(2)],
			},
		),
	]);
	graph
}

fn assert_every_truncation_fails(bytes: &[u8], opt: &DecodeOptions) {
	for prefix in truncations(bytes) {
		match decode_with(prefix, opt) {
			Err(DecodeError::HeaderTooShort { len }) => assert!(len < 3, "len={len}"),
			Err(DecodeError::TruncatedBuffer { need, rem, .. }) => {
				assert!(rem < need, "prefix {} of {}: need={need} rem={rem}", prefix.len(), bytes.len());
			}
			Err(other) => panic!("prefix {} of {}: unexpected error {other}", prefix.len(), bytes.len()),
			Ok(graph) => panic!("prefix {} of {} decoded to {:?}", prefix.len(), bytes.len(), graph.root),
		}
	}
}

#[test]
fn scenario_buffer_rejects_every_truncation() {
	let value = Value::Map(vec![
		(Value::from("name"), Value::from("Ada")),
		(Value::from("tags"), Value::List(vec![Value::from("x"), Value::from("x"), Value::from("y")])),
		(Value::from("count"), Value::I32(42)),
	]);
	let bytes = encode_value(&value).expect("encodes");
	assert_every_truncation_fails(&bytes, &DecodeOptions::default());
}

#[test]
fn rich_buffer_rejects_every_truncation() {
	let graph = rich_graph();
	let bytes = encode(&graph).expect("encodes");
	let opt = DecodeOptions::for_inspection();
	assert_eq!(decode_with(&bytes, &opt).expect("full buffer decodes"), graph);
	assert_every_truncation_fails(&bytes, &opt);
}

#[test]
fn empty_and_header_only_buffers_fail() {
	assert!(matches!(decode(&[]), Err(DecodeError::HeaderTooShort { len: 0 })));
	assert!(matches!(decode(&[0, 0]), Err(DecodeError::HeaderTooShort { len: 2 })));
}

#[test]
fn back_reference_past_table_is_malformed() {
	// list of two: literal "x" (id 0) then a reference to id 1
	let bytes = unhex("00 00 82 21 78 1c 01");
	let err = decode(&bytes).expect_err("dangling string reference");
	assert!(matches!(err, DecodeError::MalformedBackReference { kind: "string", id: 1, registered: 1 }));

	let bytes = unhex("00 00 18 07 00");
	let err = decode(&bytes).expect_err("dangling object reference");
	assert!(matches!(err, DecodeError::MalformedBackReference { kind: "object", id: 0, registered: 0 }));
}
