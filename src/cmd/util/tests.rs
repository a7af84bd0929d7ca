use binmsg::msg::{Color, Value};

use super::{scalar_label, shape_label};

#[test]
fn scalar_labels_render_compactly() {
	assert_eq!(scalar_label(&Value::I32(42)).as_deref(), Some("42"));
	assert_eq!(scalar_label(&Value::from("Ada")).as_deref(), Some("\"Ada\""));
	assert_eq!(scalar_label(&Value::Color32([0xff, 0x00, 0x10, 0x80])).as_deref(), Some("#ff001080"));
	assert_eq!(
		scalar_label(&Value::Color(Color { r: 1.0, g: 0.5, b: 0.0, a: 1.0 })).as_deref(),
		Some("rgba(1, 0.5, 0, 1)")
	);
	assert!(scalar_label(&Value::List(Vec::new())).is_none());
}

#[test]
fn shape_labels_carry_lengths() {
	let list = Value::List(vec![Value::Null, Value::Null]);
	assert_eq!(shape_label(&list), "list[2]");
	assert_eq!(shape_label(&Value::Map(Vec::new())), "map[0]");
	assert_eq!(shape_label(&Value::Bool(true)), "bool");
}
