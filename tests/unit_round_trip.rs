#![allow(missing_docs)]

use binmsg::msg::{
	Array, Bounds, Color, DecodeOptions, ElementType, Graph, MultiArray, Object, Rect, Timestamp, TypeName, Value, decode, decode_with, encode,
	encode_value, encode_with_hint,
};

fn assert_round_trip(value: Value) {
	let bytes = encode_value(&value).unwrap_or_else(|err| panic!("{} fails to encode: {err}", value.kind()));
	let graph = decode(&bytes).unwrap_or_else(|err| panic!("{} fails to decode: {err}", value.kind()));
	assert_eq!(graph.root, value);
}

#[test]
fn scalars_round_trip() {
	let scalars = [
		Value::Null,
		Value::Bool(true),
		Value::Bool(false),
		Value::Byte(0xfe),
		Value::Char('Ж'),
		Value::I16(-12_345),
		Value::U16(54_321),
		Value::I32(0),
		Value::I32(-1),
		Value::I32(127),
		Value::I32(-128),
		Value::I32(128),
		Value::I32(-32_769),
		Value::I32(i32::MIN),
		Value::I32(i32::MAX),
		Value::U32(65_535),
		Value::U32(u32::MAX),
		Value::I64(i64::MIN),
		Value::U64(u64::MAX),
		Value::F32(-0.25),
		Value::F64(std::f64::consts::PI),
		Value::DateTime(Timestamp(1_234_567_890)),
		Value::Vector2([1.0, -2.0]),
		Value::Vector3([0.5, 1.5, 2.5]),
		Value::Vector4([1.0, 2.0, 3.0, 4.0]),
		Value::Color(Color::new(1.0, 0.0, 0.0, 1.0)),
		Value::Color32([1, 2, 3, 4]),
		Value::Rect(Rect {
			x: -1.0,
			y: 1.0,
			width: 10.0,
			height: 20.0,
		}),
		Value::Bounds(Bounds {
			center: [0.0, 0.0, 0.0],
			size: [2.0, 2.0, 2.0],
		}),
		Value::Quaternion([0.0, 0.0, 0.0, 1.0]),
		Value::from(""),
		Value::from("plain"),
		Value::from("🦀 crab"),
	];
	for value in scalars {
		assert_round_trip(value);
	}
}

#[test]
fn dense_arrays_round_trip() {
	let arrays = [
		Array::Bool(vec![true, false, true]),
		Array::Byte(vec![0, 1, 255]),
		Array::Int(vec![1, -200, 70_000, i32::MIN]),
		Array::Float(vec![0.0, -1.5]),
		Array::Vector2(vec![[1.0, 2.0]]),
		Array::Vector3(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]),
		Array::Color(vec![Color::new(0.0, 1.0, 0.0, 1.0)]),
		Array::Color32(vec![[9, 8, 7, 6]]),
		Array::String(vec![Some("a".to_owned()), None, Some("a".to_owned())]),
		Array::Any(vec![Value::I32(1), Value::from("two"), Value::Null]),
		Array::Typed {
			element: ElementType::I64,
			items: vec![Value::I64(1), Value::I64(-1)],
		},
		Array::Int(Vec::new()),
	];
	for array in arrays {
		assert_round_trip(Value::Array(array));
	}
}

#[test]
fn typed_arrays_round_trip_to_the_same_variant() {
	let cases = [
		(ElementType::Bool, vec![Value::Bool(true), Value::Bool(false)]),
		(ElementType::Byte, vec![Value::Byte(7)]),
		(ElementType::I32, vec![Value::I32(-3), Value::I32(300)]),
		(ElementType::String, vec![Value::from("s"), Value::Null]),
		(ElementType::U16, vec![Value::U16(1), Value::U16(65_535)]),
	];
	for (element, items) in cases {
		let array = Array::typed(element, items).expect("items fit the element type");
		assert_round_trip(Value::Array(array));
	}
}

#[test]
fn containers_round_trip() {
	let values = [
		Value::List(vec![Value::I32(1), Value::List(vec![Value::from("nested")])]),
		Value::TypedList {
			element: ElementType::List(Box::new(ElementType::I32)),
			items: vec![
				Value::TypedList {
					element: ElementType::I32,
					items: vec![Value::I32(1), Value::I32(2)],
				},
				Value::Null,
			],
		},
		Value::Map(vec![(Value::I32(1), Value::from("one")), (Value::from("two"), Value::I32(2))]),
		Value::Dictionary {
			key: ElementType::String,
			value: ElementType::F32,
			entries: vec![(Value::from("w"), Value::F32(0.5)), (Value::from("h"), Value::F32(2.0))],
		},
		Value::Set {
			element: ElementType::I32,
			items: vec![Value::I32(3), Value::I32(1), Value::I32(2)],
		},
		Value::Queue {
			element: Some(ElementType::String),
			items: vec![Value::from("first"), Value::from("second")],
		},
		Value::Queue {
			element: None,
			items: vec![Value::I32(1), Value::from("mixed")],
		},
		Value::Stack {
			element: None,
			items: vec![Value::from("bottom"), Value::from("top")],
		},
		Value::MultiArray(MultiArray {
			element: ElementType::I32,
			dims: vec![2, 3],
			items: (0..6).map(Value::I32).collect(),
		}),
		Value::MultiArray(MultiArray {
			element: ElementType::Any,
			dims: vec![1, 2, 2],
			items: vec![Value::Null, Value::from("x"), Value::I32(1), Value::from("x")],
		}),
	];
	for value in values {
		assert_round_trip(value);
	}
}

#[test]
fn object_graph_round_trips_with_hint() {
	let mut graph = Graph::default();
	let leaf = graph.insert(Object {
		type_name: TypeName::new("Scene", "Light"),
		fields: vec![("intensity".to_owned(), Value::F32(1.5)), ("tint".to_owned(), Value::Color32([255, 255, 255, 255]))],
	});
	let root = graph.insert(Object {
		type_name: TypeName::new("Scene", "Root"),
		fields: vec![
			("lights".to_owned(), Value::List(vec![Value::Object(leaf), Value::Object(leaf)])),
			(
				"typed".to_owned(),
				Value::TypedList {
					element: ElementType::Object(TypeName::new("Scene", "Light")),
					items: vec![Value::Object(leaf), Value::Null],
				},
			),
		],
	});
	graph.root = Value::Object(root);

	let bytes = encode_with_hint(&graph, 4096).expect("encodes");
	assert_eq!(bytes, encode(&graph).expect("encodes without hint"));
	let decoded = decode_with(&bytes, &DecodeOptions::for_inspection()).expect("decodes");
	assert_eq!(decoded.objects().len(), 2);
	// the root is decoded first, so the arena comes back in a different order
	assert_ne!(decoded, graph);
	assert!(decoded.deep_eq(&graph));
}
