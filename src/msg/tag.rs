//! Wire tag bytes.
//!
//! Values below [`STRING_REF_WIDE`] are simple or object tags. From `0x20`
//! upward the high three bits select a counted kind and the low five bits
//! carry the count prefix (see [`crate::msg::count`]).

/// Null value.
pub const NULL: u8 = 0x00;
/// Boolean `true`.
pub const TRUE: u8 = 0x01;
/// Boolean `false`.
pub const FALSE: u8 = 0x02;
/// Unsigned byte, 1 payload byte.
pub const BYTE: u8 = 0x03;
/// UTF-16 code unit, 2 payload bytes.
pub const CHAR: u8 = 0x04;
/// `i16`, 2 payload bytes.
pub const I16: u8 = 0x05;
/// `u16`, 2 payload bytes.
pub const U16: u8 = 0x06;
/// `i32` stored in 1 byte (`0..256`).
pub const INT_BYTE: u8 = 0x07;
/// `i32` stored in 2 bytes (`-32768..32768`).
pub const INT_SHORT: u8 = 0x08;
/// `i32` stored in 4 bytes.
pub const INT: u8 = 0x09;
/// `u32` stored in 2 bytes.
pub const UINT_SHORT: u8 = 0x0a;
/// `u32` stored in 4 bytes.
pub const UINT: u8 = 0x0b;
/// `i64`, 8 payload bytes.
pub const I64: u8 = 0x0c;
/// `u64`, 8 payload bytes.
pub const U64: u8 = 0x0d;
/// `f32`, 4 payload bytes.
pub const F32: u8 = 0x0e;
/// `f64`, 8 payload bytes.
pub const F64: u8 = 0x0f;
/// Seconds since 1980-01-01 UTC, 4 payload bytes.
pub const DATE_TIME: u8 = 0x10;
/// Two floats.
pub const VECTOR2: u8 = 0x11;
/// Three floats.
pub const VECTOR3: u8 = 0x12;
/// Four floats.
pub const VECTOR4: u8 = 0x13;
/// Float color packed into four bytes.
pub const COLOR: u8 = 0x14;
/// Byte color.
pub const COLOR32: u8 = 0x15;
/// `x, y, width, height` floats.
pub const RECT: u8 = 0x16;
/// Two-byte tag prefix for the shapes below.
pub const OTHER: u8 = 0x17;
/// Sub-tag after [`OTHER`]: center and size vectors.
pub const OTHER_BOUNDS: u8 = 0x00;
/// Sub-tag after [`OTHER`]: four floats.
pub const OTHER_QUATERNION: u8 = 0x01;
/// Back-reference to an object, followed by an int-tagged id.
pub const OBJECT_REF: u8 = 0x18;
/// Object literal.
pub const OBJECT: u8 = 0x19;
/// Reserved, decodes as null.
pub const RESERVED_NULL: u8 = 0x1a;
/// String back-reference with a 16-bit little-endian id.
pub const STRING_REF_WIDE: u8 = 0x1b;
/// String back-reference with a 10-bit id (`0x1c..=0x1f`).
pub const STRING_REF: u8 = 0x1c;

/// Mask selecting the counted kind of a tag byte.
pub const KIND_MASK: u8 = 0xe0;
/// Counted kind: ASCII string literal.
pub const STRING: u8 = 0x20;
/// Counted kind: multibyte string literal.
pub const UNICODE_STRING: u8 = 0x40;
/// Bits flipped to turn [`STRING`] into [`UNICODE_STRING`].
pub const UNICODE_FLIP: u8 = 0x60;
/// Counted kind: array with subtype byte.
pub const ARRAY: u8 = 0x60;
/// Counted kind: untyped list.
pub const LIST: u8 = 0x80;
/// Counted kind: typed list with element token.
pub const TYPED_LIST: u8 = 0xa0;
/// Counted kind: untyped association table.
pub const MAP: u8 = 0xc0;
/// Counted kind: typed dictionary with key and value tokens.
pub const DICTIONARY: u8 = 0xe0;

/// Array subtype bytes written after an [`ARRAY`] count.
pub mod array {
	/// Self-describing elements.
	pub const ANY: u8 = 0x00;
	/// One byte per element, `1` or `2`.
	pub const BOOL: u8 = 0x01;
	/// Raw bytes.
	pub const BYTE: u8 = 0x03;
	/// Int-tagged elements.
	pub const INT: u8 = 0x09;
	/// Raw little-endian floats.
	pub const FLOAT: u8 = 0x0e;
	/// Raw float pairs.
	pub const VECTOR2: u8 = 0x11;
	/// Raw float triples.
	pub const VECTOR3: u8 = 0x12;
	/// Packed float colors.
	pub const COLOR: u8 = 0x14;
	/// Byte colors.
	pub const COLOR32: u8 = 0x15;
	/// String-tagged elements.
	pub const STRING: u8 = 0x30;
	/// Multi-dimensional array, rank 1 (`0x20`) through 4 (`0x23`).
	pub const MULTI: u8 = 0x20;
	/// Typed queue.
	pub const QUEUE: u8 = 0x24;
	/// Typed stack.
	pub const STACK: u8 = 0x25;
	/// Typed set.
	pub const SET: u8 = 0x26;
	/// Untyped queue.
	pub const UNTYPED_QUEUE: u8 = 0x27;
	/// Untyped stack.
	pub const UNTYPED_STACK: u8 = 0x28;
}

/// Element type tokens that differ from the value tags.
pub mod token {
	/// Custom object type, followed by namespace and name strings.
	pub const OBJECT: u8 = 0x1f;
	/// String.
	pub const STRING: u8 = 0x30;
	/// Untyped association table.
	pub const MAP: u8 = 0x31;
	/// Typed dictionary, followed by key and value tokens.
	pub const DICTIONARY: u8 = 0x32;
	/// Typed list, followed by element token.
	pub const LIST: u8 = 0x33;
	/// Untyped list.
	pub const UNTYPED_LIST: u8 = 0x34;
	/// Typed queue.
	pub const QUEUE: u8 = 0x35;
	/// Typed stack.
	pub const STACK: u8 = 0x36;
	/// Typed set.
	pub const SET: u8 = 0x37;
	/// Array of rank 1 (`0x38`) through 4 (`0x3b`).
	pub const ARRAY: u8 = 0x38;
	/// Untyped queue.
	pub const UNTYPED_QUEUE: u8 = 0x3c;
	/// Untyped stack.
	pub const UNTYPED_STACK: u8 = 0x3d;
}
