//! Variable-length counts and narrow integer forms.

use crate::msg::bytes::{ByteWriter, Cursor};
use crate::msg::{DecodeError, EncodeError, tag};

/// Largest count the four-byte form can carry.
pub const MAX_COUNT: usize = 0x3ff_ffff;

const ONE_BYTE_LIMIT: usize = 0x10;
const TWO_BYTE_LIMIT: usize = 0x800;
const THREE_BYTE_LIMIT: usize = 0x4_0000;

/// Number of bytes `write_count` emits for `count`.
pub fn count_len(count: usize) -> usize {
	if count < ONE_BYTE_LIMIT {
		1
	} else if count < TWO_BYTE_LIMIT {
		2
	} else if count < THREE_BYTE_LIMIT {
		3
	} else {
		4
	}
}

/// Write `count` merged into the low bits of the `base` kind tag.
pub fn write_count(out: &mut ByteWriter, base: u8, count: usize) -> Result<(), EncodeError> {
	if count > MAX_COUNT {
		return Err(EncodeError::CountTooLarge { count, max: MAX_COUNT });
	}

	out.reserve(4);
	if count < ONE_BYTE_LIMIT {
		out.put_u8(base | count as u8);
	} else if count < TWO_BYTE_LIMIT {
		out.put_u8(base | 0x10 | (count >> 8) as u8);
		out.put_u8(count as u8);
	} else if count < THREE_BYTE_LIMIT {
		out.put_u8(base | 0x18 | (count >> 16) as u8);
		out.put_u8((count >> 8) as u8);
		out.put_u8(count as u8);
	} else {
		out.put_u8(base | 0x1c | (count >> 24) as u8);
		out.put_u8((count >> 16) as u8);
		out.put_u8((count >> 8) as u8);
		out.put_u8(count as u8);
	}
	Ok(())
}

/// Read the count whose prefix sits in the low five bits of `tag_byte`.
pub fn read_count(tag_byte: u8, cursor: &mut Cursor<'_>) -> Result<usize, DecodeError> {
	let low = usize::from(tag_byte & 0x1f);
	if low < 0x10 {
		return Ok(low);
	}
	if low < 0x18 {
		let b0 = usize::from(cursor.read_u8()?);
		return Ok(((low & 0x7) << 8) | b0);
	}

	let high = low & 0x3;
	if low < 0x1c {
		let [b1, b0] = cursor.read_array::<2>()?;
		return Ok((high << 16) | (usize::from(b1) << 8) | usize::from(b0));
	}
	let [b2, b1, b0] = cursor.read_array::<3>()?;
	Ok((high << 24) | (usize::from(b2) << 16) | (usize::from(b1) << 8) | usize::from(b0))
}

/// Write a signed 32-bit integer in its narrowest tagged form.
pub fn write_int(out: &mut ByteWriter, value: i32) {
	out.reserve(5);
	if (0..256).contains(&value) {
		out.put_u8(tag::INT_BYTE);
		out.put_u8(value as u8);
	} else if (-32768..32768).contains(&value) {
		out.put_u8(tag::INT_SHORT);
		out.put_slice(&(value as i16).to_le_bytes());
	} else {
		out.put_u8(tag::INT);
		out.put_slice(&value.to_le_bytes());
	}
}

/// Write an unsigned 32-bit integer in its narrowest tagged form.
pub fn write_uint(out: &mut ByteWriter, value: u32) {
	out.reserve(5);
	if value < 0x1_0000 {
		out.put_u8(tag::UINT_SHORT);
		out.put_slice(&(value as u16).to_le_bytes());
	} else {
		out.put_u8(tag::UINT);
		out.put_slice(&value.to_le_bytes());
	}
}

/// Read the payload of an int-tagged value whose tag was already consumed.
pub fn read_int_payload(tag_byte: u8, cursor: &mut Cursor<'_>) -> Result<i32, DecodeError> {
	match tag_byte {
		tag::INT_BYTE => Ok(i32::from(cursor.read_u8()?)),
		tag::INT_SHORT => Ok(i32::from(cursor.read_i16_le()?)),
		tag::INT => cursor.read_i32_le(),
		other => Err(DecodeError::UnknownTag {
			tag: other,
			at: cursor.pos().saturating_sub(1),
			context: "int",
		}),
	}
}

/// Read a tagged int and require it to be a non-negative index or count.
pub fn read_index(cursor: &mut Cursor<'_>) -> Result<usize, DecodeError> {
	let at = cursor.pos();
	let tag_byte = cursor.read_u8()?;
	let value = read_int_payload(tag_byte, cursor)?;
	usize::try_from(value).map_err(|_| DecodeError::InvalidShape { at })
}

#[cfg(test)]
mod tests;
