use crate::msg::bytes::Cursor;
use crate::msg::count::{MAX_COUNT, read_count, read_index, read_int_payload};
use crate::msg::intern::StringTable;
use crate::msg::{
	Array, Bounds, Color, DecodeError, ElementType, Graph, MsgHeader, MultiArray, Object, ObjectId, Rect, Timestamp, TypeName, TypeRegistry, Value,
	tag,
};

type Result<T> = std::result::Result<T, DecodeError>;

const MULTI_LAST: u8 = tag::array::MULTI + 3;
const ARRAY_TOKEN_LAST: u8 = tag::token::ARRAY + 3;
const STRING_LAST: u8 = tag::ARRAY - 1;

/// Runtime limits and type lookup for BinMsg decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Object types the buffer may instantiate.
	pub registry: TypeRegistry,
	/// Maximum nesting of containers, objects, and type tokens.
	pub max_depth: u32,
	/// Maximum element count of any single container.
	pub max_count: usize,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			registry: TypeRegistry::new(),
			max_depth: 256,
			max_count: MAX_COUNT,
		}
	}
}

impl DecodeOptions {
	/// Default limits with the given registry.
	pub fn with_registry(registry: TypeRegistry) -> Self {
		Self {
			registry,
			..Self::default()
		}
	}

	/// Preset for tooling: any object type decodes as a dynamic record.
	pub fn for_inspection() -> Self {
		Self::with_registry(TypeRegistry::permissive())
	}
}

/// Decode a buffer with default options (no object types registered).
pub fn decode(bytes: &[u8]) -> Result<Graph> {
	decode_with(bytes, &DecodeOptions::default())
}

/// Decode a buffer.
pub fn decode_with(bytes: &[u8], opt: &DecodeOptions) -> Result<Graph> {
	Decoder::new(bytes, opt)?.decode_root()
}

/// Single-use decoder state: cursor plus the tables rebuilt from tag order.
pub struct Decoder<'a> {
	cursor: Cursor<'a>,
	opt: &'a DecodeOptions,
	strings: StringTable,
	objects: Vec<Object>,
	depth: u32,
}

impl<'a> Decoder<'a> {
	/// Parse the header and position the cursor on the root tag.
	pub fn new(bytes: &'a [u8], opt: &'a DecodeOptions) -> Result<Self> {
		let header = MsgHeader::parse(bytes)?;
		Ok(Self {
			cursor: Cursor::at(bytes, MsgHeader::SIZE),
			opt,
			strings: StringTable::with_capacity(header.string_capacity()),
			objects: Vec::with_capacity(header.object_capacity()),
			depth: 0,
		})
	}

	/// Read the root value and hand back the graph.
	pub fn decode_root(mut self) -> Result<Graph> {
		let root = self.read_value()?;
		if self.cursor.remaining() > 0 {
			log::trace!("binmsg ignoring {} trailing bytes", self.cursor.remaining());
		}
		log::debug!(
			"binmsg decoded {} bytes (strings={}, objects={})",
			self.cursor.pos(),
			self.strings.len(),
			self.objects.len()
		);
		Ok(Graph::from_parts(root, self.objects))
	}

	/// Read one tagged value and everything it contains.
	pub fn read_value(&mut self) -> Result<Value> {
		let at = self.cursor.pos();
		let tag_byte = self.cursor.read_u8()?;
		if tag_byte >= tag::STRING {
			return self.read_counted(tag_byte);
		}

		Ok(match tag_byte {
			tag::NULL | tag::RESERVED_NULL => Value::Null,
			tag::TRUE => Value::Bool(true),
			tag::FALSE => Value::Bool(false),
			tag::BYTE => Value::Byte(self.cursor.read_u8()?),
			tag::CHAR => Value::Char(self.read_char()?),
			tag::I16 => Value::I16(self.cursor.read_i16_le()?),
			tag::U16 => Value::U16(self.cursor.read_u16_le()?),
			tag::INT_BYTE | tag::INT_SHORT | tag::INT => Value::I32(read_int_payload(tag_byte, &mut self.cursor)?),
			tag::UINT_SHORT => Value::U32(u32::from(self.cursor.read_u16_le()?)),
			tag::UINT => Value::U32(self.cursor.read_u32_le()?),
			tag::I64 => Value::I64(self.cursor.read_i64_le()?),
			tag::U64 => Value::U64(self.cursor.read_u64_le()?),
			tag::F32 => Value::F32(self.cursor.read_f32_le()?),
			tag::F64 => Value::F64(self.cursor.read_f64_le()?),
			tag::DATE_TIME => Value::DateTime(Timestamp(self.cursor.read_u32_le()?)),
			tag::VECTOR2 => Value::Vector2(self.cursor.read_f32s()?),
			tag::VECTOR3 => Value::Vector3(self.cursor.read_f32s()?),
			tag::VECTOR4 => Value::Vector4(self.cursor.read_f32s()?),
			tag::COLOR => Value::Color(Color::from_bytes(self.cursor.read_array()?)),
			tag::COLOR32 => Value::Color32(self.cursor.read_array()?),
			tag::RECT => {
				let [x, y, width, height] = self.cursor.read_f32s()?;
				Value::Rect(Rect { x, y, width, height })
			}
			tag::OTHER => self.read_other()?,
			tag::OBJECT_REF => {
				let id = read_index(&mut self.cursor)?;
				if id >= self.objects.len() {
					return Err(DecodeError::MalformedBackReference {
						kind: "object",
						id,
						registered: self.objects.len(),
					});
				}
				Value::Object(ObjectId(id as u32))
			}
			tag::OBJECT => self.read_object()?,
			tag::STRING_REF_WIDE => {
				let id = usize::from(self.cursor.read_u16_le()?);
				Value::String(self.strings.get(id)?.to_owned())
			}
			tag::STRING_REF..=0x1f => {
				let id = (usize::from(tag_byte & 0x3) << 8) | usize::from(self.cursor.read_u8()?);
				Value::String(self.strings.get(id)?.to_owned())
			}
			other => {
				return Err(DecodeError::UnknownTag {
					tag: other,
					at,
					context: "value",
				});
			}
		})
	}

	fn read_char(&mut self) -> Result<char> {
		let unit = self.cursor.read_u16_le()?;
		char::from_u32(u32::from(unit)).ok_or(DecodeError::InvalidChar { unit })
	}

	fn read_other(&mut self) -> Result<Value> {
		let at = self.cursor.pos();
		match self.cursor.read_u8()? {
			tag::OTHER_BOUNDS => Ok(Value::Bounds(Bounds {
				center: self.cursor.read_f32s()?,
				size: self.cursor.read_f32s()?,
			})),
			tag::OTHER_QUATERNION => Ok(Value::Quaternion(self.cursor.read_f32s()?)),
			other => Err(DecodeError::UnknownTag {
				tag: other,
				at,
				context: "other",
			}),
		}
	}

	fn enter(&mut self) -> Result<()> {
		if self.depth >= self.opt.max_depth {
			return Err(DecodeError::DepthExceeded {
				max_depth: self.opt.max_depth,
			});
		}
		self.depth += 1;
		Ok(())
	}

	fn leave(&mut self) {
		self.depth -= 1;
	}

	fn check_count(&self, count: usize) -> Result<()> {
		if count > self.opt.max_count {
			return Err(DecodeError::CountTooLarge {
				count,
				max: self.opt.max_count,
			});
		}
		Ok(())
	}

	/// Capacity for `count` elements that each take at least one byte.
	fn capacity(&self, count: usize) -> usize {
		count.min(self.cursor.remaining())
	}

	fn read_counted(&mut self, tag_byte: u8) -> Result<Value> {
		let count = read_count(tag_byte, &mut self.cursor)?;
		match tag_byte & tag::KIND_MASK {
			tag::STRING => {
				let at = self.cursor.pos();
				let raw = self.cursor.read_exact(count)?;
				let text = std::str::from_utf8(raw).map_err(|_| DecodeError::InvalidString { at })?;
				self.strings.record(text);
				return Ok(Value::String(text.to_owned()));
			}
			tag::UNICODE_STRING => {
				let text = self.read_unicode(count)?;
				self.strings.record(&text);
				return Ok(Value::String(text));
			}
			_ => {}
		}

		self.check_count(count)?;
		self.enter()?;
		let value = match tag_byte & tag::KIND_MASK {
			tag::ARRAY => self.read_array(count)?,
			tag::LIST => Value::List(self.read_items(count)?),
			tag::TYPED_LIST => {
				let element = self.read_type_token()?;
				let items = self.read_elements(&element, count)?;
				Value::TypedList { element, items }
			}
			tag::MAP => Value::Map(self.read_entries(&ElementType::Any, &ElementType::Any, count)?),
			_ => {
				let key = self.read_type_token()?;
				let value = self.read_type_token()?;
				let entries = self.read_entries(&key, &value, count)?;
				Value::Dictionary { key, value, entries }
			}
		};
		self.leave();
		Ok(value)
	}

	fn read_unicode(&mut self, chars: usize) -> Result<String> {
		let at = self.cursor.pos();
		let mut len = 0;
		for _ in 0..chars {
			len += match self.cursor.peek(len)? {
				0x00..=0x7f => 1,
				0xc0..=0xdf => 2,
				0xe0..=0xef => 3,
				0xf0..=0xf7 => 4,
				_ => return Err(DecodeError::InvalidString { at: at + len }),
			};
		}
		let raw = self.cursor.read_exact(len)?;
		std::str::from_utf8(raw).map(str::to_owned).map_err(|_| DecodeError::InvalidString { at })
	}

	/// Read a literal or back-referenced string; any other tag fails before it is decoded.
	fn read_string_value(&mut self) -> Result<String> {
		let at = self.cursor.pos();
		let tag_byte = self.cursor.peek(0)?;
		if !matches!(tag_byte, tag::STRING_REF_WIDE..=STRING_LAST) {
			return Err(DecodeError::ExpectedString { at, got: tag_kind(tag_byte) });
		}
		match self.read_value()? {
			Value::String(text) => Ok(text),
			other => Err(DecodeError::ExpectedString { at, got: other.kind() }),
		}
	}

	fn read_items(&mut self, count: usize) -> Result<Vec<Value>> {
		let mut items = Vec::with_capacity(self.capacity(count));
		for _ in 0..count {
			items.push(self.read_value()?);
		}
		Ok(items)
	}

	fn read_element(&mut self, element: &ElementType) -> Result<Value> {
		let item = self.read_value()?;
		if !element.conforms(&item, &self.objects) {
			return Err(DecodeError::ElementTypeMismatch {
				at: self.cursor.pos(),
				expected: element.to_string(),
				got: item.kind(),
			});
		}
		Ok(item)
	}

	fn read_elements(&mut self, element: &ElementType, count: usize) -> Result<Vec<Value>> {
		let mut items = Vec::with_capacity(self.capacity(count));
		for _ in 0..count {
			items.push(self.read_element(element)?);
		}
		Ok(items)
	}

	fn read_entries(&mut self, key: &ElementType, value: &ElementType, count: usize) -> Result<Vec<(Value, Value)>> {
		let keys = self.read_elements(key, count)?;
		let mut entries = Vec::with_capacity(keys.len());
		for k in keys {
			let v = self.read_element(value)?;
			entries.push((k, v));
		}
		Ok(entries)
	}

	fn read_array(&mut self, count: usize) -> Result<Value> {
		let at = self.cursor.pos();
		let subtype = self.cursor.read_u8()?;
		let array = match subtype {
			tag::array::MULTI..=MULTI_LAST => return self.read_multi_array(count, subtype - tag::array::MULTI + 1, at),
			tag::array::QUEUE | tag::array::STACK | tag::array::SET => {
				let element = self.read_type_token()?;
				let items = self.read_elements(&element, count)?;
				return Ok(match subtype {
					tag::array::QUEUE => Value::Queue {
						element: Some(element),
						items,
					},
					tag::array::STACK => Value::Stack {
						element: Some(element),
						items,
					},
					_ => Value::Set { element, items },
				});
			}
			tag::array::UNTYPED_QUEUE => return Ok(Value::Queue {
				element: None,
				items: self.read_items(count)?,
			}),
			tag::array::UNTYPED_STACK => return Ok(Value::Stack {
				element: None,
				items: self.read_items(count)?,
			}),
			0x29..=0x2f => {
				return Err(DecodeError::UnknownTag {
					tag: subtype,
					at,
					context: "array subtype",
				});
			}
			tag::array::ANY => Array::Any(self.read_items(count)?),
			tag::array::BOOL => {
				let mut items = Vec::with_capacity(self.capacity(count));
				for _ in 0..count {
					let item_at = self.cursor.pos();
					items.push(match self.cursor.read_u8()? {
						tag::TRUE => true,
						tag::FALSE => false,
						other => {
							return Err(DecodeError::UnknownTag {
								tag: other,
								at: item_at,
								context: "bool array",
							});
						}
					});
				}
				Array::Bool(items)
			}
			tag::array::BYTE => Array::Byte(self.cursor.read_exact(count)?.to_vec()),
			tag::array::INT => {
				let mut items = Vec::with_capacity(self.capacity(count));
				for _ in 0..count {
					let int_tag = self.cursor.read_u8()?;
					items.push(read_int_payload(int_tag, &mut self.cursor)?);
				}
				Array::Int(items)
			}
			tag::array::FLOAT => Array::Float(self.read_dense(count, |cursor| cursor.read_f32_le())?),
			tag::array::VECTOR2 => Array::Vector2(self.read_dense(count, |cursor| cursor.read_f32s())?),
			tag::array::VECTOR3 => Array::Vector3(self.read_dense(count, |cursor| cursor.read_f32s())?),
			tag::array::COLOR => Array::Color(self.read_dense(count, |cursor| Ok(Color::from_bytes(cursor.read_array()?)))?),
			tag::array::COLOR32 => Array::Color32(self.read_dense(count, |cursor| cursor.read_array())?),
			tag::array::STRING => {
				let mut items = Vec::with_capacity(self.capacity(count));
				for _ in 0..count {
					let item_at = self.cursor.pos();
					items.push(match self.read_value()? {
						Value::String(text) => Some(text),
						Value::Null => None,
						other => {
							return Err(DecodeError::ExpectedString {
								at: item_at,
								got: other.kind(),
							});
						}
					});
				}
				Array::String(items)
			}
			token => {
				let element = self.type_token_from(token)?;
				let items = self.read_elements(&element, count)?;
				Array::Typed { element, items }
			}
		};
		Ok(Value::Array(array))
	}

	fn read_dense<T>(&mut self, count: usize, mut read: impl FnMut(&mut Cursor<'a>) -> Result<T>) -> Result<Vec<T>> {
		let mut items = Vec::with_capacity(self.capacity(count));
		for _ in 0..count {
			items.push(read(&mut self.cursor)?);
		}
		Ok(items)
	}

	fn read_multi_array(&mut self, leading: usize, rank: u8, at: usize) -> Result<Value> {
		if rank < 2 {
			return Err(DecodeError::InvalidShape { at });
		}

		let mut dims = vec![leading];
		for _ in 1..rank {
			dims.push(read_index(&mut self.cursor)?);
		}
		let element = self.read_type_token()?;
		let total = dims.iter().try_fold(1_usize, |acc, extent| acc.checked_mul(*extent)).ok_or(DecodeError::CountTooLarge {
			count: usize::MAX,
			max: self.opt.max_count,
		})?;
		self.check_count(total)?;

		let items = self.read_elements(&element, total)?;
		Ok(Value::MultiArray(MultiArray { element, dims, items }))
	}

	fn read_type_token(&mut self) -> Result<ElementType> {
		let token = self.cursor.read_u8()?;
		self.type_token_from(token)
	}

	fn type_token_from(&mut self, token: u8) -> Result<ElementType> {
		if let Some(simple) = ElementType::from_simple_token(token) {
			return Ok(simple);
		}

		let at = self.cursor.pos().saturating_sub(1);
		self.enter()?;
		let element = match token {
			tag::OTHER => match self.cursor.read_u8()? {
				tag::OTHER_BOUNDS => ElementType::Bounds,
				tag::OTHER_QUATERNION => ElementType::Quaternion,
				other => {
					return Err(DecodeError::UnknownTag {
						tag: other,
						at: at + 1,
						context: "type token",
					});
				}
			},
			tag::token::OBJECT => {
				let namespace = self.read_string_value()?;
				let name = self.read_string_value()?;
				ElementType::Object(TypeName { namespace, name })
			}
			tag::token::DICTIONARY => {
				let key = self.read_type_token()?;
				let value = self.read_type_token()?;
				ElementType::Dictionary(Box::new(key), Box::new(value))
			}
			tag::token::LIST => ElementType::List(Box::new(self.read_type_token()?)),
			tag::token::QUEUE => ElementType::Queue(Box::new(self.read_type_token()?)),
			tag::token::STACK => ElementType::Stack(Box::new(self.read_type_token()?)),
			tag::token::SET => ElementType::Set(Box::new(self.read_type_token()?)),
			tag::token::ARRAY..=ARRAY_TOKEN_LAST => ElementType::Array {
				rank: token - tag::token::ARRAY + 1,
				element: Box::new(self.read_type_token()?),
			},
			other => {
				return Err(DecodeError::UnknownTag {
					tag: other,
					at,
					context: "type token",
				});
			}
		};
		self.leave();
		Ok(element)
	}

	fn read_object(&mut self) -> Result<Value> {
		self.enter()?;
		let namespace = self.read_string_value()?;
		let name = self.read_string_value()?;
		let type_name = TypeName { namespace, name };

		// Register before reading fields so nested references can point back here.
		let object = self.opt.registry.instantiate(&type_name)?;
		let id = ObjectId(self.objects.len() as u32);
		self.objects.push(object);

		let fields = read_index(&mut self.cursor)?;
		self.check_count(fields)?;
		for _ in 0..fields {
			let field = self.read_string_value()?;
			self.opt.registry.check_field(&type_name, &field)?;
			let value = self.read_value()?;
			self.objects[id.index()].set_field(&field, value);
		}
		self.leave();
		Ok(Value::Object(id))
	}
}

/// Coarse kind label for a tag byte that has not been decoded.
fn tag_kind(tag_byte: u8) -> &'static str {
	match tag_byte {
		tag::NULL | tag::RESERVED_NULL => "null",
		tag::TRUE | tag::FALSE => "bool",
		tag::OBJECT | tag::OBJECT_REF => "object",
		tag::BYTE..=tag::OTHER => "scalar",
		_ => match tag_byte & tag::KIND_MASK {
			tag::ARRAY => "array",
			tag::LIST => "list",
			tag::TYPED_LIST => "typed_list",
			tag::MAP => "map",
			_ => "dictionary",
		},
	}
}
