//! Bounded byte cursor and growable output buffer.

use crate::msg::DecodeError;

type Result<T> = std::result::Result<T, DecodeError>;

/// Simple bounded cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Create a cursor starting at `pos`.
	pub fn at(bytes: &'a [u8], pos: usize) -> Self {
		Self { bytes, pos }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Look at the byte `offset` past the current position without advancing.
	pub fn peek(&self, offset: usize) -> Result<u8> {
		let at = self.pos + offset;
		self.bytes.get(at).copied().ok_or(DecodeError::TruncatedBuffer {
			at,
			need: 1,
			rem: 0,
		})
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(DecodeError::TruncatedBuffer {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read a fixed-size array.
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read a little-endian `u16`.
	pub fn read_u16_le(&mut self) -> Result<u16> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i16`.
	pub fn read_i16_le(&mut self) -> Result<i16> {
		Ok(i16::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u32`.
	pub fn read_u32_le(&mut self) -> Result<u32> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i32`.
	pub fn read_i32_le(&mut self) -> Result<i32> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u64`.
	pub fn read_u64_le(&mut self) -> Result<u64> {
		Ok(u64::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i64`.
	pub fn read_i64_le(&mut self) -> Result<i64> {
		Ok(i64::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `f32`.
	pub fn read_f32_le(&mut self) -> Result<f32> {
		Ok(f32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `f64`.
	pub fn read_f64_le(&mut self) -> Result<f64> {
		Ok(f64::from_le_bytes(self.read_array()?))
	}

	/// Read `N` consecutive little-endian `f32` values.
	pub fn read_f32s<const N: usize>(&mut self) -> Result<[f32; N]> {
		let mut out = [0.0_f32; N];
		for item in &mut out {
			*item = self.read_f32_le()?;
		}
		Ok(out)
	}
}

/// Growable output buffer with doubling growth.
pub struct ByteWriter {
	buf: Vec<u8>,
}

impl ByteWriter {
	/// Smallest capacity handed out regardless of hint.
	pub const MIN_CAPACITY: usize = 256;

	/// Create a writer presized for roughly `hint` bytes.
	pub fn with_hint(hint: usize) -> Self {
		let capacity = hint.max(Self::MIN_CAPACITY) + Self::MIN_CAPACITY;
		Self {
			buf: Vec::with_capacity(capacity),
		}
	}

	/// Number of bytes written so far.
	pub fn len(&self) -> usize {
		self.buf.len()
	}

	/// True when nothing has been written.
	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	/// Make room for `additional` bytes, doubling capacity when it runs out.
	pub fn reserve(&mut self, additional: usize) {
		let need = self.buf.len() + additional;
		if need <= self.buf.capacity() {
			return;
		}
		let target = (self.buf.capacity() * 2).max(need);
		log::trace!("binmsg buffer grow {} -> {}", self.buf.capacity(), target);
		self.buf.reserve_exact(target - self.buf.len());
	}

	/// Append one byte.
	pub fn put_u8(&mut self, byte: u8) {
		self.reserve(1);
		self.buf.push(byte);
	}

	/// Append a byte slice.
	pub fn put_slice(&mut self, bytes: &[u8]) {
		self.reserve(bytes.len());
		self.buf.extend_from_slice(bytes);
	}

	/// Overwrite a previously written byte.
	pub fn patch_u8(&mut self, at: usize, byte: u8) {
		self.buf[at] = byte;
	}

	/// Append a little-endian `f32`.
	pub fn put_f32_le(&mut self, value: f32) {
		self.put_slice(&value.to_le_bytes());
	}

	/// Append consecutive little-endian `f32` values.
	pub fn put_f32s(&mut self, values: &[f32]) {
		self.reserve(values.len() * 4);
		for value in values {
			self.buf.extend_from_slice(&value.to_le_bytes());
		}
	}

	/// Trim spare capacity and return the written bytes.
	pub fn finish(mut self) -> Vec<u8> {
		self.buf.shrink_to_fit();
		self.buf
	}
}
