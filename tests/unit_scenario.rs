#![allow(missing_docs)]

use binmsg::msg::{DecodeOptions, Graph, ObjectId, Serializable, TypeRegistry, Value, decode, decode_with, encode, encode_value};
use binmsg_testkit::hex;

fn ada_map() -> Value {
	Value::Map(vec![
		(Value::from("name"), Value::from("Ada")),
		(Value::from("tags"), Value::List(vec![Value::from("x"), Value::from("x"), Value::from("y")])),
		(Value::from("count"), Value::I32(42)),
	])
}

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
	haystack.windows(needle.len()).filter(|window| *window == needle).count()
}

#[test]
fn ada_map_encodes_to_expected_bytes() {
	let bytes = encode_value(&ada_map()).expect("encodes");
	assert_eq!(
		hex(&bytes),
		"00 00 c3 24 6e 61 6d 65 24 74 61 67 73 25 63 6f 75 6e 74 23 41 64 61 83 21 78 1c 04 21 79 07 2a"
	);
}

#[test]
fn ada_map_holds_one_literal_and_one_reference_for_x() {
	let bytes = encode_value(&ada_map()).expect("encodes");
	assert_eq!(count_occurrences(&bytes, &[0x21, b'x']), 1, "one literal \"x\"");
	// "x" is the fifth interned string: name, tags, count, Ada, x.
	assert_eq!(count_occurrences(&bytes, &[0x1c, 0x04]), 1, "one back-reference to \"x\"");
}

#[test]
fn ada_map_decodes_with_shared_tag_text() {
	let bytes = encode_value(&ada_map()).expect("encodes");
	let graph = decode(&bytes).expect("decodes");
	assert_eq!(graph.root, ada_map());

	let tags = match graph.root.get("tags") {
		Some(Value::List(items)) => items,
		other => panic!("expected tag list, got {other:?}"),
	};
	assert_eq!(tags[0], Value::from("x"));
	assert_eq!(tags[0], tags[1]);
	assert_eq!(tags[2], Value::from("y"));
	assert_eq!(graph.root.get("count"), Some(&Value::I32(42)));
}

#[derive(Debug, Default, PartialEq)]
struct Person {
	name: String,
	tags: Vec<String>,
	count: i32,
}

impl Serializable for Person {
	const NAMESPACE: &'static str = "Demo";
	const TYPE_NAME: &'static str = "Person";

	fn to_fields(&self) -> Vec<(&'static str, Value)> {
		vec![
			("name", Value::from(self.name.as_str())),
			("tags", Value::List(self.tags.iter().map(|tag| Value::from(tag.as_str())).collect())),
			("count", Value::I32(self.count)),
		]
	}

	fn set_field(&mut self, name: &str, value: Value) -> bool {
		match (name, value) {
			("name", Value::String(text)) => self.name = text,
			("tags", Value::List(items)) => {
				let mut tags = Vec::with_capacity(items.len());
				for item in items {
					let Value::String(text) = item else {
						return false;
					};
					tags.push(text);
				}
				self.tags = tags;
			}
			("count", Value::I32(count)) => self.count = count,
			_ => return false,
		}
		true
	}
}

#[test]
fn ada_object_round_trips_through_registry() {
	let ada = Person {
		name: "Ada".to_owned(),
		tags: vec!["x".to_owned(), "x".to_owned(), "y".to_owned()],
		count: 42,
	};
	let mut graph = Graph::default();
	let id = graph.insert_serializable(&ada);
	graph.root = Value::Object(id);

	let bytes = encode(&graph).expect("encodes");
	assert_eq!(count_occurrences(&bytes, &[0x21, b'x']), 1);

	let mut registry = TypeRegistry::new();
	registry.register_type::<Person>();
	let decoded = decode_with(&bytes, &DecodeOptions::with_registry(registry)).expect("decodes");
	assert_eq!(decoded.root, Value::Object(ObjectId(0)));
	assert_eq!(decoded.extract::<Person>(ObjectId(0)).expect("extracts"), ada);
}
