use crate::msg::DecodeError;

/// Two-byte presize header at the start of every BinMsg buffer.
///
/// Each byte holds the corresponding table size divided by 256, saturated at
/// `0xff`. Decoders treat it as a capacity hint only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MsgHeader {
	/// Interned string count hint.
	pub string_hint: u8,
	/// Registered object count hint.
	pub object_hint: u8,
}

impl MsgHeader {
	/// Header size in bytes.
	pub const SIZE: usize = 2;
	/// Smallest decodable buffer: header plus one tag.
	pub const MIN_BUFFER: usize = Self::SIZE + 1;

	/// Build the header for the final table sizes of an encode.
	pub fn from_counts(strings: usize, objects: usize) -> Self {
		Self {
			string_hint: saturating_hint(strings),
			object_hint: saturating_hint(objects),
		}
	}

	/// Parse the header from the start of `bytes`.
	pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
		if bytes.len() < Self::MIN_BUFFER {
			return Err(DecodeError::HeaderTooShort { len: bytes.len() });
		}
		Ok(Self {
			string_hint: bytes[0],
			object_hint: bytes[1],
		})
	}

	/// Header bytes in wire order.
	pub fn to_bytes(self) -> [u8; Self::SIZE] {
		[self.string_hint, self.object_hint]
	}

	/// Capacity to presize the decode string table with.
	pub fn string_capacity(self) -> usize {
		(usize::from(self.string_hint) + 1) << 8
	}

	/// Capacity to presize the decode object table with.
	pub fn object_capacity(self) -> usize {
		(usize::from(self.object_hint) + 1) << 8
	}
}

fn saturating_hint(count: usize) -> u8 {
	(count >> 8).min(0xff) as u8
}
