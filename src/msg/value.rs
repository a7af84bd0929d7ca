use crate::msg::{ElementType, EncodeError, ObjectId};

/// Seconds since 1980-01-01T00:00:00Z, the codec's date resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub u32);

impl Timestamp {
	/// Unix time of the codec epoch (1980-01-01T00:00:00Z).
	pub const EPOCH_UNIX: i64 = 315_532_800;

	/// Convert Unix seconds, failing outside the representable range.
	pub fn from_unix(secs: i64) -> Option<Self> {
		u32::try_from(secs - Self::EPOCH_UNIX).ok().map(Self)
	}

	/// Unix seconds for this timestamp.
	pub fn to_unix(self) -> i64 {
		i64::from(self.0) + Self::EPOCH_UNIX
	}
}

/// Float RGBA color; each channel travels as `channel * 255` in one byte.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
	/// Red.
	pub r: f32,
	/// Green.
	pub g: f32,
	/// Blue.
	pub b: f32,
	/// Alpha.
	pub a: f32,
}

impl Color {
	/// Build a color from channels.
	pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
		Self { r, g, b, a }
	}

	/// Pack channels into bytes (saturating).
	pub fn to_bytes(self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a].map(|channel| (channel * 255.0) as u8)
	}

	/// Unpack channels from bytes.
	pub fn from_bytes(bytes: [u8; 4]) -> Self {
		let [r, g, b, a] = bytes.map(|byte| f32::from(byte) / 255.0);
		Self { r, g, b, a }
	}
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
	/// Minimum x.
	pub x: f32,
	/// Minimum y.
	pub y: f32,
	/// Extent along x.
	pub width: f32,
	/// Extent along y.
	pub height: f32,
}

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
	/// Box center.
	pub center: [f32; 3],
	/// Full box extents.
	pub size: [f32; 3],
}

/// One-dimensional array; dense variants omit per-element tags on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Array {
	/// Self-describing elements (`object[]`).
	Any(Vec<Value>),
	/// Booleans.
	Bool(Vec<bool>),
	/// Raw bytes.
	Byte(Vec<u8>),
	/// Ints, each in its narrowest tagged form.
	Int(Vec<i32>),
	/// Floats.
	Float(Vec<f32>),
	/// Float pairs.
	Vector2(Vec<[f32; 2]>),
	/// Float triples.
	Vector3(Vec<[f32; 3]>),
	/// Float colors.
	Color(Vec<Color>),
	/// Byte colors.
	Color32(Vec<[u8; 4]>),
	/// Strings; `None` travels as null.
	String(Vec<Option<String>>),
	/// Any element type without a dense variant, elements tagged individually.
	///
	/// Use [`Array::typed`] to build one; element types that have a dense
	/// variant are refused by the encoder here.
	Typed {
		/// Declared element type.
		element: ElementType,
		/// Elements conforming to `element`.
		items: Vec<Value>,
	},
}

impl Array {
	/// Build an array of `element` values, picking the dense variant when the
	/// element type has one so that decoding yields the same variant back.
	///
	/// Fails when an item does not fit a dense element type.
	pub fn typed(element: ElementType, items: Vec<Value>) -> Result<Self, EncodeError> {
		Ok(match element {
			ElementType::Any => Self::Any(items),
			ElementType::Bool => Self::Bool(dense(&element, items, |item| match item {
				Value::Bool(v) => Ok(v),
				other => Err(other),
			})?),
			ElementType::Byte => Self::Byte(dense(&element, items, |item| match item {
				Value::Byte(v) => Ok(v),
				other => Err(other),
			})?),
			ElementType::I32 => Self::Int(dense(&element, items, |item| match item {
				Value::I32(v) => Ok(v),
				other => Err(other),
			})?),
			ElementType::F32 => Self::Float(dense(&element, items, |item| match item {
				Value::F32(v) => Ok(v),
				other => Err(other),
			})?),
			ElementType::Vector2 => Self::Vector2(dense(&element, items, |item| match item {
				Value::Vector2(v) => Ok(v),
				other => Err(other),
			})?),
			ElementType::Vector3 => Self::Vector3(dense(&element, items, |item| match item {
				Value::Vector3(v) => Ok(v),
				other => Err(other),
			})?),
			ElementType::Color => Self::Color(dense(&element, items, |item| match item {
				Value::Color(v) => Ok(v),
				other => Err(other),
			})?),
			ElementType::Color32 => Self::Color32(dense(&element, items, |item| match item {
				Value::Color32(v) => Ok(v),
				other => Err(other),
			})?),
			ElementType::String => Self::String(dense(&element, items, |item| match item {
				Value::String(v) => Ok(Some(v)),
				Value::Null => Ok(None),
				other => Err(other),
			})?),
			element => Self::Typed { element, items },
		})
	}

	/// Number of elements.
	pub fn len(&self) -> usize {
		match self {
			Self::Any(items) => items.len(),
			Self::Bool(items) => items.len(),
			Self::Byte(items) => items.len(),
			Self::Int(items) => items.len(),
			Self::Float(items) => items.len(),
			Self::Vector2(items) => items.len(),
			Self::Vector3(items) => items.len(),
			Self::Color(items) => items.len(),
			Self::Color32(items) => items.len(),
			Self::String(items) => items.len(),
			Self::Typed { items, .. } => items.len(),
		}
	}

	/// True when the array has no elements.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Element type as written in a type token.
	pub fn element_type(&self) -> ElementType {
		match self {
			Self::Any(_) => ElementType::Any,
			Self::Bool(_) => ElementType::Bool,
			Self::Byte(_) => ElementType::Byte,
			Self::Int(_) => ElementType::I32,
			Self::Float(_) => ElementType::F32,
			Self::Vector2(_) => ElementType::Vector2,
			Self::Vector3(_) => ElementType::Vector3,
			Self::Color(_) => ElementType::Color,
			Self::Color32(_) => ElementType::Color32,
			Self::String(_) => ElementType::String,
			Self::Typed { element, .. } => element.clone(),
		}
	}
}

fn dense<T>(element: &ElementType, items: Vec<Value>, pick: impl Fn(Value) -> Result<T, Value>) -> Result<Vec<T>, EncodeError> {
	items
		.into_iter()
		.map(|item| {
			pick(item).map_err(|other| EncodeError::ElementTypeMismatch {
				expected: element.to_string(),
				got: other.kind(),
			})
		})
		.collect()
}

/// Array of rank 2 to 4, elements in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiArray {
	/// Declared element type.
	pub element: ElementType,
	/// Extent of each dimension, leading dimension first.
	pub dims: Vec<usize>,
	/// Row-major elements; `items.len()` is the product of `dims`.
	pub items: Vec<Value>,
}

/// Decoded or to-be-encoded value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	/// Absent value.
	#[default]
	Null,
	/// Boolean.
	Bool(bool),
	/// Unsigned byte.
	Byte(u8),
	/// Character in the Basic Multilingual Plane.
	Char(char),
	/// 16-bit signed integer.
	I16(i16),
	/// 16-bit unsigned integer.
	U16(u16),
	/// 32-bit signed integer.
	I32(i32),
	/// 32-bit unsigned integer.
	U32(u32),
	/// 64-bit signed integer.
	I64(i64),
	/// 64-bit unsigned integer.
	U64(u64),
	/// Single-precision float.
	F32(f32),
	/// Double-precision float.
	F64(f64),
	/// Point in time, second resolution.
	DateTime(Timestamp),
	/// 2D vector.
	Vector2([f32; 2]),
	/// 3D vector.
	Vector3([f32; 3]),
	/// 4D vector.
	Vector4([f32; 4]),
	/// Float color.
	Color(Color),
	/// Byte color.
	Color32([u8; 4]),
	/// Rectangle.
	Rect(Rect),
	/// Box.
	Bounds(Bounds),
	/// Rotation `x, y, z, w`.
	Quaternion([f32; 4]),
	/// Text.
	String(String),
	/// One-dimensional array.
	Array(Array),
	/// Array of rank 2 to 4.
	MultiArray(MultiArray),
	/// Untyped list.
	List(Vec<Value>),
	/// List with a declared element type.
	TypedList {
		/// Declared element type.
		element: ElementType,
		/// Elements.
		items: Vec<Value>,
	},
	/// Untyped association table, in insertion order.
	Map(Vec<(Value, Value)>),
	/// Association table with declared key and value types.
	Dictionary {
		/// Declared key type.
		key: ElementType,
		/// Declared value type.
		value: ElementType,
		/// Entries in insertion order.
		entries: Vec<(Value, Value)>,
	},
	/// Set with a declared element type, in insertion order.
	Set {
		/// Declared element type.
		element: ElementType,
		/// Distinct elements.
		items: Vec<Value>,
	},
	/// First-in first-out queue, front first.
	Queue {
		/// Declared element type; `None` for an untyped queue.
		element: Option<ElementType>,
		/// Elements, front first.
		items: Vec<Value>,
	},
	/// Last-in first-out stack, bottom first (the top is the last item).
	Stack {
		/// Declared element type; `None` for an untyped stack.
		element: Option<ElementType>,
		/// Elements, bottom first.
		items: Vec<Value>,
	},
	/// Reference to an object in the owning [`crate::msg::Graph`].
	Object(ObjectId),
}

impl Value {
	/// Stable lowercase label of the active variant.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Byte(_) => "byte",
			Self::Char(_) => "char",
			Self::I16(_) => "i16",
			Self::U16(_) => "u16",
			Self::I32(_) => "i32",
			Self::U32(_) => "u32",
			Self::I64(_) => "i64",
			Self::U64(_) => "u64",
			Self::F32(_) => "f32",
			Self::F64(_) => "f64",
			Self::DateTime(_) => "datetime",
			Self::Vector2(_) => "vector2",
			Self::Vector3(_) => "vector3",
			Self::Vector4(_) => "vector4",
			Self::Color(_) => "color",
			Self::Color32(_) => "color32",
			Self::Rect(_) => "rect",
			Self::Bounds(_) => "bounds",
			Self::Quaternion(_) => "quaternion",
			Self::String(_) => "string",
			Self::Array(_) => "array",
			Self::MultiArray(_) => "multi_array",
			Self::List(_) => "list",
			Self::TypedList { .. } => "typed_list",
			Self::Map(_) => "map",
			Self::Dictionary { .. } => "dictionary",
			Self::Set { .. } => "set",
			Self::Queue { .. } => "queue",
			Self::Stack { .. } => "stack",
			Self::Object(_) => "object",
		}
	}

	/// Borrow the text of a string value.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(text) => Some(text),
			_ => None,
		}
	}

	/// Widen any integer variant to `i64` when it fits.
	pub fn as_i64(&self) -> Option<i64> {
		match *self {
			Self::Byte(v) => Some(i64::from(v)),
			Self::I16(v) => Some(i64::from(v)),
			Self::U16(v) => Some(i64::from(v)),
			Self::I32(v) => Some(i64::from(v)),
			Self::U32(v) => Some(i64::from(v)),
			Self::I64(v) => Some(v),
			Self::U64(v) => i64::try_from(v).ok(),
			_ => None,
		}
	}

	/// Look up a string key in an untyped map or dictionary.
	pub fn get(&self, key: &str) -> Option<&Value> {
		let entries = match self {
			Self::Map(entries) => entries,
			Self::Dictionary { entries, .. } => entries,
			_ => return None,
		};
		entries.iter().find(|(k, _)| k.as_str() == Some(key)).map(|(_, v)| v)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::I32(value)
	}
}

impl From<f32> for Value {
	fn from(value: f32) -> Self {
		Self::F32(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::F64(value)
	}
}
