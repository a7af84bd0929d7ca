use super::{MAX_COUNT, count_len, read_count, read_int_payload, write_count, write_int, write_uint};
use crate::msg::bytes::{ByteWriter, Cursor};
use crate::msg::{EncodeError, tag};

fn encoded_count(base: u8, count: usize) -> Vec<u8> {
	let mut out = ByteWriter::with_hint(0);
	write_count(&mut out, base, count).expect("count encodes");
	out.finish()
}

fn decoded_count(bytes: &[u8]) -> usize {
	let mut cursor = Cursor::new(bytes);
	let first = cursor.read_u8().expect("tag byte");
	let count = read_count(first, &mut cursor).expect("count decodes");
	assert_eq!(cursor.remaining(), 0, "count must consume every byte it wrote");
	count
}

#[test]
fn count_widths_switch_at_each_threshold() {
	let cases = [
		(0_usize, 1_usize),
		(15, 1),
		(16, 2),
		(2047, 2),
		(2048, 3),
		(0x3_ffff, 3),
		(0x4_0000, 4),
		(MAX_COUNT, 4),
	];
	for (count, width) in cases {
		let bytes = encoded_count(tag::LIST, count);
		assert_eq!(bytes.len(), width, "width for {count}");
		assert_eq!(count_len(count), width);
		assert_eq!(bytes[0] & tag::KIND_MASK, tag::LIST, "kind bits preserved for {count}");
		assert_eq!(decoded_count(&bytes), count);
	}
}

#[test]
fn count_layout_matches_wire_table() {
	assert_eq!(encoded_count(tag::STRING, 5), vec![0x25]);
	assert_eq!(encoded_count(tag::STRING, 0x123), vec![0x31, 0x23]);
	assert_eq!(encoded_count(tag::ARRAY, 0x1_2345), vec![0x79, 0x23, 0x45]);
	assert_eq!(encoded_count(tag::MAP, 0x123_4567), vec![0xdd, 0x23, 0x45, 0x67]);
}

#[test]
fn count_above_max_is_rejected() {
	let mut out = ByteWriter::with_hint(0);
	let err = write_count(&mut out, tag::LIST, MAX_COUNT + 1).expect_err("too large");
	assert_eq!(
		err,
		EncodeError::CountTooLarge {
			count: MAX_COUNT + 1,
			max: MAX_COUNT
		}
	);
	assert!(out.is_empty());
}

#[test]
fn int_picks_narrowest_form() {
	let cases: [(i32, u8, usize); 7] = [
		(0, tag::INT_BYTE, 2),
		(255, tag::INT_BYTE, 2),
		(256, tag::INT_SHORT, 3),
		(-1, tag::INT_SHORT, 3),
		(-32768, tag::INT_SHORT, 3),
		(32768, tag::INT, 5),
		(i32::MIN, tag::INT, 5),
	];
	for (value, expected_tag, len) in cases {
		let mut out = ByteWriter::with_hint(0);
		write_int(&mut out, value);
		let bytes = out.finish();
		assert_eq!(bytes[0], expected_tag, "tag for {value}");
		assert_eq!(bytes.len(), len, "len for {value}");

		let mut cursor = Cursor::new(&bytes[1..]);
		assert_eq!(read_int_payload(bytes[0], &mut cursor).expect("int decodes"), value);
	}
}

#[test]
fn uint_uses_short_form_below_65536() {
	let mut out = ByteWriter::with_hint(0);
	write_uint(&mut out, 65535);
	write_uint(&mut out, 65536);
	assert_eq!(out.finish(), vec![tag::UINT_SHORT, 0xff, 0xff, tag::UINT, 0x00, 0x00, 0x01, 0x00]);
}
