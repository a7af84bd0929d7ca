use crate::msg::bytes::ByteWriter;
use crate::msg::count::{write_count, write_int, write_uint};
use crate::msg::intern::{Interned, ObjectInterner, SHORT_REF_MAX, StringInterner};
use crate::msg::{Array, ElementType, EncodeError, Graph, MsgHeader, MultiArray, Object, ObjectId, Value, tag};

type Result<T> = std::result::Result<T, EncodeError>;

/// Handling of values that have no wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unsupported {
	/// Abort with [`EncodeError::UnsupportedValueShape`].
	#[default]
	Error,
	/// Write null in place of the value and log a warning.
	Null,
}

/// Runtime switches for BinMsg encoding.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
	/// Expected output size; the buffer starts at `max(hint, 256) + 256` bytes.
	pub size_hint: usize,
	/// What to do with values that cannot be written.
	pub on_unsupported: Unsupported,
}

impl EncodeOptions {
	/// Default options with a capacity hint.
	pub fn with_size_hint(size_hint: usize) -> Self {
		Self {
			size_hint,
			..Self::default()
		}
	}

	/// Preset that writes null for unsupported values instead of failing.
	pub fn lossy() -> Self {
		Self {
			size_hint: 0,
			on_unsupported: Unsupported::Null,
		}
	}
}

/// Encode a value graph with default options.
pub fn encode(graph: &Graph) -> Result<Vec<u8>> {
	encode_with(graph, &EncodeOptions::default())
}

/// Encode a value graph, presizing the output for about `size_hint` bytes.
pub fn encode_with_hint(graph: &Graph, size_hint: usize) -> Result<Vec<u8>> {
	encode_with(graph, &EncodeOptions::with_size_hint(size_hint))
}

/// Encode a value graph.
pub fn encode_with(graph: &Graph, opt: &EncodeOptions) -> Result<Vec<u8>> {
	let mut encoder = Encoder::new(graph.objects(), opt);
	encoder.write_value(&graph.root)?;
	Ok(encoder.finish())
}

/// Encode a value that references no objects.
pub fn encode_value(value: &Value) -> Result<Vec<u8>> {
	let opt = EncodeOptions::default();
	let mut encoder = Encoder::new(&[], &opt);
	encoder.write_value(value)?;
	Ok(encoder.finish())
}

/// Single-use encoder state: output buffer plus the string and object tables.
pub struct Encoder<'a> {
	objects: &'a [Object],
	opt: &'a EncodeOptions,
	out: ByteWriter,
	strings: StringInterner,
	object_ids: ObjectInterner,
}

impl<'a> Encoder<'a> {
	/// Start an encode over the given object arena.
	pub fn new(objects: &'a [Object], opt: &'a EncodeOptions) -> Self {
		let mut out = ByteWriter::with_hint(opt.size_hint);
		out.put_slice(&[0; MsgHeader::SIZE]);
		Self {
			objects,
			opt,
			out,
			strings: StringInterner::default(),
			object_ids: ObjectInterner::default(),
		}
	}

	/// Patch the header and return the trimmed buffer.
	pub fn finish(mut self) -> Vec<u8> {
		let header = MsgHeader::from_counts(self.strings.len(), self.object_ids.len());
		for (at, byte) in header.to_bytes().into_iter().enumerate() {
			self.out.patch_u8(at, byte);
		}
		log::debug!(
			"binmsg encoded {} bytes (strings={}, objects={})",
			self.out.len(),
			self.strings.len(),
			self.object_ids.len()
		);
		self.out.finish()
	}

	/// Write one tagged value and everything it contains.
	pub fn write_value(&mut self, value: &Value) -> Result<()> {
		match value {
			Value::Null => self.out.put_u8(tag::NULL),
			Value::Bool(v) => self.out.put_u8(bool_tag(*v)),
			Value::Byte(v) => self.out.put_slice(&[tag::BYTE, *v]),
			Value::Char(v) => match u16::try_from(u32::from(*v)) {
				Ok(unit) => {
					self.out.put_u8(tag::CHAR);
					self.out.put_slice(&unit.to_le_bytes());
				}
				Err(_) => return self.unsupported(format!("char U+{:04X} is outside the Basic Multilingual Plane", u32::from(*v))),
			},
			Value::I16(v) => self.put_tagged(tag::I16, &v.to_le_bytes()),
			Value::U16(v) => self.put_tagged(tag::U16, &v.to_le_bytes()),
			Value::I32(v) => write_int(&mut self.out, *v),
			Value::U32(v) => write_uint(&mut self.out, *v),
			Value::I64(v) => self.put_tagged(tag::I64, &v.to_le_bytes()),
			Value::U64(v) => self.put_tagged(tag::U64, &v.to_le_bytes()),
			Value::F32(v) => self.put_tagged(tag::F32, &v.to_le_bytes()),
			Value::F64(v) => self.put_tagged(tag::F64, &v.to_le_bytes()),
			Value::DateTime(v) => self.put_tagged(tag::DATE_TIME, &v.0.to_le_bytes()),
			Value::Vector2(v) => self.put_floats(&[tag::VECTOR2], v),
			Value::Vector3(v) => self.put_floats(&[tag::VECTOR3], v),
			Value::Vector4(v) => self.put_floats(&[tag::VECTOR4], v),
			Value::Color(v) => self.put_tagged(tag::COLOR, &v.to_bytes()),
			Value::Color32(v) => self.put_tagged(tag::COLOR32, v),
			Value::Rect(v) => self.put_floats(&[tag::RECT], &[v.x, v.y, v.width, v.height]),
			Value::Bounds(v) => {
				self.put_floats(&[tag::OTHER, tag::OTHER_BOUNDS], &v.center);
				self.out.put_f32s(&v.size);
			}
			Value::Quaternion(v) => self.put_floats(&[tag::OTHER, tag::OTHER_QUATERNION], v),
			Value::String(v) => self.write_string(v)?,
			Value::Array(v) => self.write_array(v)?,
			Value::MultiArray(v) => self.write_multi_array(v)?,
			Value::List(items) => {
				write_count(&mut self.out, tag::LIST, items.len())?;
				for item in items {
					self.write_value(item)?;
				}
			}
			Value::TypedList { element, items } => {
				write_count(&mut self.out, tag::TYPED_LIST, items.len())?;
				self.write_type_token(element)?;
				self.write_elements(element, items)?;
			}
			Value::Map(entries) => {
				write_count(&mut self.out, tag::MAP, entries.len())?;
				self.write_entries(&ElementType::Any, &ElementType::Any, entries)?;
			}
			Value::Dictionary { key, value, entries } => {
				write_count(&mut self.out, tag::DICTIONARY, entries.len())?;
				self.write_type_token(key)?;
				self.write_type_token(value)?;
				self.write_entries(key, value, entries)?;
			}
			Value::Set { element, items } => self.write_sequence(tag::array::SET, Some(element), items)?,
			Value::Queue { element: Some(element), items } => self.write_sequence(tag::array::QUEUE, Some(element), items)?,
			Value::Queue { element: None, items } => self.write_sequence(tag::array::UNTYPED_QUEUE, None, items)?,
			Value::Stack { element: Some(element), items } => self.write_sequence(tag::array::STACK, Some(element), items)?,
			Value::Stack { element: None, items } => self.write_sequence(tag::array::UNTYPED_STACK, None, items)?,
			Value::Object(id) => self.write_object(*id)?,
		}
		Ok(())
	}

	fn put_tagged(&mut self, tag_byte: u8, payload: &[u8]) {
		self.out.reserve(payload.len() + 1);
		self.out.put_u8(tag_byte);
		self.out.put_slice(payload);
	}

	fn put_floats(&mut self, prefix: &[u8], values: &[f32]) {
		self.out.put_slice(prefix);
		self.out.put_f32s(values);
	}

	fn unsupported(&mut self, reason: String) -> Result<()> {
		match self.opt.on_unsupported {
			Unsupported::Error => Err(EncodeError::UnsupportedValueShape { reason }),
			Unsupported::Null => {
				log::warn!("binmsg writing null in place of unsupported value: {reason}");
				self.out.put_u8(tag::NULL);
				Ok(())
			}
		}
	}

	fn write_string(&mut self, text: &str) -> Result<()> {
		if let Interned::Existing(id) = self.strings.intern(text) {
			if id <= SHORT_REF_MAX {
				self.out.put_slice(&[tag::STRING_REF | (id >> 8) as u8, id as u8]);
			} else {
				self.out.put_u8(tag::STRING_REF_WIDE);
				self.out.put_slice(&(id as u16).to_le_bytes());
			}
			return Ok(());
		}

		if text.is_ascii() {
			write_count(&mut self.out, tag::STRING, text.len())?;
		} else {
			write_count(&mut self.out, tag::STRING ^ tag::UNICODE_FLIP, text.chars().count())?;
		}
		self.out.put_slice(text.as_bytes());
		Ok(())
	}

	fn write_object(&mut self, id: ObjectId) -> Result<()> {
		let objects = self.objects;
		let object = objects.get(id.index()).ok_or(EncodeError::DanglingObject {
			id: id.index(),
			len: objects.len(),
		})?;

		match self.object_ids.intern(id) {
			Interned::Existing(wire) => {
				self.out.put_u8(tag::OBJECT_REF);
				self.write_len_int(wire as usize)?;
			}
			Interned::New(_) => {
				self.out.put_u8(tag::OBJECT);
				self.write_string(&object.type_name.namespace)?;
				self.write_string(&object.type_name.name)?;
				self.write_len_int(object.fields.len())?;
				for (name, value) in &object.fields {
					self.write_string(name)?;
					self.write_value(value)?;
				}
			}
		}
		Ok(())
	}

	fn write_len_int(&mut self, len: usize) -> Result<()> {
		let value = i32::try_from(len).map_err(|_| EncodeError::CountTooLarge {
			count: len,
			max: i32::MAX as usize,
		})?;
		write_int(&mut self.out, value);
		Ok(())
	}

	fn check_element(&self, element: &ElementType, item: &Value) -> Result<()> {
		if element.conforms(item, self.objects) {
			return Ok(());
		}
		Err(EncodeError::ElementTypeMismatch {
			expected: element.to_string(),
			got: item.kind(),
		})
	}

	fn write_elements(&mut self, element: &ElementType, items: &[Value]) -> Result<()> {
		for item in items {
			self.check_element(element, item)?;
			self.write_value(item)?;
		}
		Ok(())
	}

	fn write_entries(&mut self, key: &ElementType, value: &ElementType, entries: &[(Value, Value)]) -> Result<()> {
		for (k, _) in entries {
			self.check_element(key, k)?;
			self.write_value(k)?;
		}
		for (_, v) in entries {
			self.check_element(value, v)?;
			self.write_value(v)?;
		}
		Ok(())
	}

	fn write_sequence(&mut self, subtype: u8, element: Option<&ElementType>, items: &[Value]) -> Result<()> {
		write_count(&mut self.out, tag::ARRAY, items.len())?;
		self.out.put_u8(subtype);
		match element {
			Some(element) => {
				self.write_type_token(element)?;
				self.write_elements(element, items)
			}
			None => {
				for item in items {
					self.write_value(item)?;
				}
				Ok(())
			}
		}
	}

	fn write_array(&mut self, array: &Array) -> Result<()> {
		if let Array::Typed { element, .. } = array
			&& element.has_dense_array_form()
		{
			return self.unsupported(format!("typed array of {element} has a dense variant, build it with Array::typed"));
		}
		write_count(&mut self.out, tag::ARRAY, array.len())?;
		match array {
			Array::Any(items) => {
				self.out.put_u8(tag::array::ANY);
				for item in items {
					self.write_value(item)?;
				}
			}
			Array::Bool(items) => {
				self.out.put_u8(tag::array::BOOL);
				self.out.reserve(items.len());
				for item in items {
					self.out.put_u8(bool_tag(*item));
				}
			}
			Array::Byte(items) => {
				self.out.put_u8(tag::array::BYTE);
				self.out.put_slice(items);
			}
			Array::Int(items) => {
				self.out.put_u8(tag::array::INT);
				for item in items {
					write_int(&mut self.out, *item);
				}
			}
			Array::Float(items) => self.put_floats(&[tag::array::FLOAT], items),
			Array::Vector2(items) => {
				self.out.put_u8(tag::array::VECTOR2);
				for item in items {
					self.out.put_f32s(item);
				}
			}
			Array::Vector3(items) => {
				self.out.put_u8(tag::array::VECTOR3);
				for item in items {
					self.out.put_f32s(item);
				}
			}
			Array::Color(items) => {
				self.out.put_u8(tag::array::COLOR);
				for item in items {
					self.out.put_slice(&item.to_bytes());
				}
			}
			Array::Color32(items) => {
				self.out.put_u8(tag::array::COLOR32);
				for item in items {
					self.out.put_slice(item);
				}
			}
			Array::String(items) => {
				self.out.put_u8(tag::array::STRING);
				for item in items {
					match item {
						Some(text) => self.write_string(text)?,
						None => self.out.put_u8(tag::NULL),
					}
				}
			}
			Array::Typed { element, items } => {
				// Dense subtype bytes coincide with the element's type token.
				self.write_type_token(element)?;
				self.write_elements(element, items)?;
			}
		}
		Ok(())
	}

	fn write_multi_array(&mut self, array: &MultiArray) -> Result<()> {
		let rank = array.dims.len();
		if !(2..=4).contains(&rank) {
			return self.unsupported(format!("multi-dimensional array of rank {rank}"));
		}
		let total = array.dims.iter().try_fold(1_usize, |acc, extent| acc.checked_mul(*extent));
		if total != Some(array.items.len()) {
			return self.unsupported(format!("array shape {:?} does not hold {} items", array.dims, array.items.len()));
		}

		write_count(&mut self.out, tag::ARRAY, array.dims[0])?;
		self.out.put_u8(tag::array::MULTI + (rank - 1) as u8);
		for extent in &array.dims[1..] {
			self.write_len_int(*extent)?;
		}
		self.write_type_token(&array.element)?;
		self.write_elements(&array.element, &array.items)
	}

	fn write_type_token(&mut self, element: &ElementType) -> Result<()> {
		match element {
			ElementType::Bounds => self.out.put_slice(&[tag::OTHER, tag::OTHER_BOUNDS]),
			ElementType::Quaternion => self.out.put_slice(&[tag::OTHER, tag::OTHER_QUATERNION]),
			ElementType::Object(name) => {
				self.out.put_u8(tag::token::OBJECT);
				self.write_string(&name.namespace)?;
				self.write_string(&name.name)?;
			}
			ElementType::Dictionary(key, value) => {
				self.out.put_u8(tag::token::DICTIONARY);
				self.write_type_token(key)?;
				self.write_type_token(value)?;
			}
			ElementType::List(inner) => self.write_nested_token(tag::token::LIST, inner)?,
			ElementType::Queue(inner) => self.write_nested_token(tag::token::QUEUE, inner)?,
			ElementType::Stack(inner) => self.write_nested_token(tag::token::STACK, inner)?,
			ElementType::Set(inner) => self.write_nested_token(tag::token::SET, inner)?,
			ElementType::Array { rank, element } => {
				if !(1..=4).contains(rank) {
					return Err(EncodeError::UnsupportedValueShape {
						reason: format!("array element type of rank {rank}"),
					});
				}
				self.write_nested_token(tag::token::ARRAY + (rank - 1), element)?;
			}
			other => match other.simple_token() {
				Some(token) => self.out.put_u8(token),
				None => {
					return Err(EncodeError::UnsupportedValueShape {
						reason: format!("element type {other} has no type token"),
					});
				}
			},
		}
		Ok(())
	}

	fn write_nested_token(&mut self, token: u8, inner: &ElementType) -> Result<()> {
		self.out.put_u8(token);
		self.write_type_token(inner)
	}
}

fn bool_tag(value: bool) -> u8 {
	if value { tag::TRUE } else { tag::FALSE }
}
