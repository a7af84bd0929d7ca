#![allow(missing_docs)]

use binmsg::msg::{DecodeOptions, Graph, Object, ObjectId, TypeName, TypeRegistry, TypeSchema, Value, decode_with, encode};

fn node(label: &str) -> Object {
	let mut object = Object::new(TypeName::new("Graph", "Node"));
	object.set_field("label", Value::from(label));
	object.set_field("next", Value::Null);
	object
}

fn node_registry() -> DecodeOptions {
	let mut registry = TypeRegistry::new();
	registry.register(TypeSchema::new(TypeName::new("Graph", "Node"), &["label", "next"]));
	DecodeOptions::with_registry(registry)
}

#[test]
fn self_reference_decodes_to_same_instance() {
	let mut graph = Graph::default();
	let a = graph.insert(node("a"));
	graph.get_mut(a).expect("a").set_field("next", Value::Object(a));
	graph.root = Value::Object(a);

	let bytes = encode(&graph).expect("self reference encodes");
	let decoded = decode_with(&bytes, &node_registry()).expect("self reference decodes");

	assert_eq!(decoded.objects().len(), 1);
	let a = decoded.get(ObjectId(0)).expect("a");
	assert_eq!(a.field("next"), Some(&Value::Object(ObjectId(0))));
	assert_eq!(decoded, graph);
}

#[test]
fn two_node_ring_keeps_identity() {
	let mut graph = Graph::default();
	let a = graph.insert(node("a"));
	let b = graph.insert(node("b"));
	graph.get_mut(a).expect("a").set_field("next", Value::Object(b));
	graph.get_mut(b).expect("b").set_field("next", Value::Object(a));
	graph.root = Value::List(vec![Value::Object(a), Value::Object(b)]);

	let bytes = encode(&graph).expect("ring encodes");
	let decoded = decode_with(&bytes, &node_registry()).expect("ring decodes");

	assert_eq!(decoded.objects().len(), 2);
	assert_eq!(decoded, graph);
	let b = decoded.get(ObjectId(1)).expect("b");
	assert_eq!(b.field("label"), Some(&Value::from("b")));
	assert_eq!(b.field("next"), Some(&Value::Object(ObjectId(0))));
}

#[test]
fn object_registered_before_fields_gets_lower_id() {
	// parent is literal first, child is nested inside it and refers back
	let mut graph = Graph::default();
	let parent = graph.insert(node("parent"));
	let child = graph.insert(node("child"));
	graph.get_mut(parent).expect("parent").set_field("next", Value::Object(child));
	graph.get_mut(child).expect("child").set_field("next", Value::Object(parent));
	graph.root = Value::Object(parent);

	let bytes = encode(&graph).expect("encodes");
	let decoded = decode_with(&bytes, &DecodeOptions::for_inspection()).expect("decodes");
	assert_eq!(decoded.get(ObjectId(0)).and_then(|o| o.field("label")), Some(&Value::from("parent")));
	assert_eq!(decoded.get(ObjectId(1)).and_then(|o| o.field("next")), Some(&Value::Object(ObjectId(0))));
}
