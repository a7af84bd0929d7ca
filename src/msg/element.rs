use std::fmt;

use crate::msg::{Object, TypeName, Value, tag};

/// Declared element type of a typed container, written as a type token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
	/// Any value.
	Any,
	/// `bool`.
	Bool,
	/// `u8`.
	Byte,
	/// `char`.
	Char,
	/// `i16`.
	I16,
	/// `u16`.
	U16,
	/// `i32`.
	I32,
	/// `u32`.
	U32,
	/// `i64`.
	I64,
	/// `u64`.
	U64,
	/// `f32`.
	F32,
	/// `f64`.
	F64,
	/// Timestamp.
	DateTime,
	/// 2D vector.
	Vector2,
	/// 3D vector.
	Vector3,
	/// 4D vector.
	Vector4,
	/// Float color.
	Color,
	/// Byte color.
	Color32,
	/// Rectangle.
	Rect,
	/// Box.
	Bounds,
	/// Rotation.
	Quaternion,
	/// Objects of one named type.
	Object(TypeName),
	/// Strings.
	String,
	/// Untyped association tables.
	Map,
	/// Typed dictionaries.
	Dictionary(Box<ElementType>, Box<ElementType>),
	/// Typed lists.
	List(Box<ElementType>),
	/// Untyped lists.
	UntypedList,
	/// Typed queues.
	Queue(Box<ElementType>),
	/// Typed stacks.
	Stack(Box<ElementType>),
	/// Typed sets.
	Set(Box<ElementType>),
	/// Arrays of the given rank (1 to 4).
	Array {
		/// Number of dimensions.
		rank: u8,
		/// Element type.
		element: Box<ElementType>,
	},
	/// Untyped queues.
	UntypedQueue,
	/// Untyped stacks.
	UntypedStack,
}

impl ElementType {
	/// Token for element types that need no trailing data.
	pub(crate) fn simple_token(&self) -> Option<u8> {
		Some(match self {
			Self::Any => tag::NULL,
			Self::Bool => tag::TRUE,
			Self::Byte => tag::BYTE,
			Self::Char => tag::CHAR,
			Self::I16 => tag::I16,
			Self::U16 => tag::U16,
			Self::I32 => tag::INT,
			Self::U32 => tag::UINT,
			Self::I64 => tag::I64,
			Self::U64 => tag::U64,
			Self::F32 => tag::F32,
			Self::F64 => tag::F64,
			Self::DateTime => tag::DATE_TIME,
			Self::Vector2 => tag::VECTOR2,
			Self::Vector3 => tag::VECTOR3,
			Self::Vector4 => tag::VECTOR4,
			Self::Color => tag::COLOR,
			Self::Color32 => tag::COLOR32,
			Self::Rect => tag::RECT,
			Self::String => tag::token::STRING,
			Self::Map => tag::token::MAP,
			Self::UntypedList => tag::token::UNTYPED_LIST,
			Self::UntypedQueue => tag::token::UNTYPED_QUEUE,
			Self::UntypedStack => tag::token::UNTYPED_STACK,
			_ => return None,
		})
	}

	/// Inverse of [`Self::simple_token`]; the int and uint tags of every width map to their type.
	pub(crate) fn from_simple_token(token: u8) -> Option<Self> {
		Some(match token {
			tag::NULL => Self::Any,
			tag::TRUE => Self::Bool,
			tag::BYTE => Self::Byte,
			tag::CHAR => Self::Char,
			tag::I16 => Self::I16,
			tag::U16 => Self::U16,
			tag::INT_BYTE | tag::INT_SHORT | tag::INT => Self::I32,
			tag::UINT_SHORT | tag::UINT => Self::U32,
			tag::I64 => Self::I64,
			tag::U64 => Self::U64,
			tag::F32 => Self::F32,
			tag::F64 => Self::F64,
			tag::DATE_TIME => Self::DateTime,
			tag::VECTOR2 => Self::Vector2,
			tag::VECTOR3 => Self::Vector3,
			tag::VECTOR4 => Self::Vector4,
			tag::COLOR => Self::Color,
			tag::COLOR32 => Self::Color32,
			tag::RECT => Self::Rect,
			tag::token::STRING => Self::String,
			tag::token::MAP => Self::Map,
			tag::token::UNTYPED_LIST => Self::UntypedList,
			tag::token::UNTYPED_QUEUE => Self::UntypedQueue,
			tag::token::UNTYPED_STACK => Self::UntypedStack,
			_ => return None,
		})
	}

	/// True when the array subtype byte for this element is a dense form.
	pub(crate) fn has_dense_array_form(&self) -> bool {
		matches!(
			self,
			Self::Any | Self::Bool | Self::Byte | Self::I32 | Self::F32 | Self::Vector2 | Self::Vector3 | Self::Color | Self::Color32 | Self::String
		)
	}

	fn allows_null(&self) -> bool {
		matches!(
			self,
			Self::Any
				| Self::Object(_)
				| Self::String
				| Self::Map
				| Self::Dictionary(..)
				| Self::List(_)
				| Self::UntypedList
				| Self::Queue(_)
				| Self::Stack(_)
				| Self::Set(_)
				| Self::Array { .. }
				| Self::UntypedQueue
				| Self::UntypedStack
		)
	}

	/// Check whether `value` may be stored in a container of this element type.
	pub fn conforms(&self, value: &Value, objects: &[Object]) -> bool {
		if matches!(value, Value::Null) {
			return self.allows_null();
		}

		match (self, value) {
			(Self::Any, _) => true,
			(Self::Bool, Value::Bool(_))
			| (Self::Byte, Value::Byte(_))
			| (Self::Char, Value::Char(_))
			| (Self::I16, Value::I16(_))
			| (Self::U16, Value::U16(_))
			| (Self::I32, Value::I32(_))
			| (Self::U32, Value::U32(_))
			| (Self::I64, Value::I64(_))
			| (Self::U64, Value::U64(_))
			| (Self::F32, Value::F32(_))
			| (Self::F64, Value::F64(_))
			| (Self::DateTime, Value::DateTime(_))
			| (Self::Vector2, Value::Vector2(_))
			| (Self::Vector3, Value::Vector3(_))
			| (Self::Vector4, Value::Vector4(_))
			| (Self::Color, Value::Color(_))
			| (Self::Color32, Value::Color32(_))
			| (Self::Rect, Value::Rect(_))
			| (Self::Bounds, Value::Bounds(_))
			| (Self::Quaternion, Value::Quaternion(_))
			| (Self::String, Value::String(_))
			| (Self::Map, Value::Map(_))
			| (Self::UntypedList, Value::List(_)) => true,
			(Self::Object(name), Value::Object(id)) => objects.get(id.index()).is_some_and(|object| object.type_name == *name),
			(Self::Dictionary(k, v), Value::Dictionary { key, value, .. }) => **k == *key && **v == *value,
			(Self::List(t), Value::TypedList { element, .. }) | (Self::Set(t), Value::Set { element, .. }) => **t == *element,
			(Self::Queue(t), Value::Queue { element: Some(element), .. }) | (Self::Stack(t), Value::Stack { element: Some(element), .. }) => **t == *element,
			(Self::UntypedQueue, Value::Queue { element: None, .. }) | (Self::UntypedStack, Value::Stack { element: None, .. }) => true,
			(Self::Array { rank: 1, element }, Value::Array(array)) => **element == array.element_type(),
			(Self::Array { rank, element }, Value::MultiArray(array)) => **element == array.element && usize::from(*rank) == array.dims.len(),
			_ => false,
		}
	}
}

impl fmt::Display for ElementType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Any => f.write_str("any"),
			Self::Bool => f.write_str("bool"),
			Self::Byte => f.write_str("byte"),
			Self::Char => f.write_str("char"),
			Self::I16 => f.write_str("i16"),
			Self::U16 => f.write_str("u16"),
			Self::I32 => f.write_str("i32"),
			Self::U32 => f.write_str("u32"),
			Self::I64 => f.write_str("i64"),
			Self::U64 => f.write_str("u64"),
			Self::F32 => f.write_str("f32"),
			Self::F64 => f.write_str("f64"),
			Self::DateTime => f.write_str("datetime"),
			Self::Vector2 => f.write_str("vector2"),
			Self::Vector3 => f.write_str("vector3"),
			Self::Vector4 => f.write_str("vector4"),
			Self::Color => f.write_str("color"),
			Self::Color32 => f.write_str("color32"),
			Self::Rect => f.write_str("rect"),
			Self::Bounds => f.write_str("bounds"),
			Self::Quaternion => f.write_str("quaternion"),
			Self::Object(name) => write!(f, "object {name}"),
			Self::String => f.write_str("string"),
			Self::Map => f.write_str("map"),
			Self::Dictionary(k, v) => write!(f, "dictionary<{k}, {v}>"),
			Self::List(t) => write!(f, "list<{t}>"),
			Self::UntypedList => f.write_str("list"),
			Self::Queue(t) => write!(f, "queue<{t}>"),
			Self::Stack(t) => write!(f, "stack<{t}>"),
			Self::Set(t) => write!(f, "set<{t}>"),
			Self::Array { rank, element } => write!(f, "array{rank}<{element}>"),
			Self::UntypedQueue => f.write_str("queue"),
			Self::UntypedStack => f.write_str("stack"),
		}
	}
}
