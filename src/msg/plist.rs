//! Binary property lists (`bplist00`).
//!
//! Only the shapes a property list can hold are accepted: null, booleans,
//! integers, floats, dates, byte arrays, strings, lists, and string-keyed maps.
//! Null list elements and null map values are dropped on encode.

use std::collections::HashMap;

use crate::msg::{Array, PlistError, Timestamp, Value};

type Result<T> = std::result::Result<T, PlistError>;

const MAGIC: &[u8; 8] = b"bplist00";
const TRAILER_SIZE: usize = 32;
const MAX_DEPTH: u32 = 512;
/// Seconds between the Unix epoch and 2001-01-01T00:00:00Z.
const APPLE_EPOCH_UNIX: i64 = 978_307_200;

/// Encode a value as a binary property list.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
	let upper = record_bound(value);
	let mut writer = PlistWriter {
		out: Vec::with_capacity(64 + upper * 6),
		offsets: Vec::with_capacity(upper),
		strings: HashMap::new(),
		ref_size: width_for(upper as u64),
	};
	writer.out.extend_from_slice(MAGIC);
	let root = writer.add(value)?;
	Ok(writer.finish(root))
}

/// Decode a binary property list.
pub fn decode(bytes: &[u8]) -> Result<Value> {
	let reader = PlistReader::new(bytes)?;
	reader.value(reader.root, 0)
}

/// Upper bound on the number of records `value` produces.
fn record_bound(value: &Value) -> usize {
	1 + match value {
		Value::List(items) | Value::Array(Array::Any(items)) | Value::TypedList { items, .. } => items.iter().map(record_bound).sum(),
		Value::Array(Array::String(items)) => items.len(),
		Value::Array(Array::Int(items)) => items.len(),
		Value::Array(Array::Float(items)) => items.len(),
		Value::Map(entries) | Value::Dictionary { entries, .. } => entries.iter().map(|(_, v)| 1 + record_bound(v)).sum(),
		_ => 0,
	}
}

/// Smallest of 1, 2, 4, or 8 bytes that holds `value`.
fn width_for(value: u64) -> usize {
	if value <= 0xff {
		1
	} else if value <= 0xffff {
		2
	} else if value <= 0xffff_ffff {
		4
	} else {
		8
	}
}

fn put_be(out: &mut Vec<u8>, value: u64, width: usize) {
	out.extend_from_slice(&value.to_be_bytes()[8 - width..]);
}

struct PlistWriter {
	out: Vec<u8>,
	offsets: Vec<u64>,
	strings: HashMap<String, u64>,
	ref_size: usize,
}

impl PlistWriter {
	fn begin(&mut self) -> u64 {
		self.offsets.push(self.out.len() as u64);
		(self.offsets.len() - 1) as u64
	}

	fn finish(mut self, root: u64) -> Vec<u8> {
		let table_at = self.out.len() as u64;
		let offset_size = width_for(table_at);
		for offset in &self.offsets {
			put_be(&mut self.out, *offset, offset_size);
		}

		self.out.extend_from_slice(&[0; 6]);
		self.out.push(offset_size as u8);
		self.out.push(self.ref_size as u8);
		put_be(&mut self.out, self.offsets.len() as u64, 8);
		put_be(&mut self.out, root, 8);
		put_be(&mut self.out, table_at, 8);
		log::debug!("plist encoded {} records in {} bytes", self.offsets.len(), self.out.len());
		self.out
	}

	fn add(&mut self, value: &Value) -> Result<u64> {
		match value {
			Value::Null => Ok(self.add_marker(0x00)),
			Value::Bool(v) => Ok(self.add_marker(if *v { 0x09 } else { 0x08 })),
			Value::String(text) => Ok(self.add_string(text)),
			Value::List(items) | Value::Array(Array::Any(items)) | Value::TypedList { items, .. } => self.add_array(items.iter()),
			Value::Array(Array::String(items)) => {
				let items: Vec<Value> = items.iter().map(|item| item.clone().map_or(Value::Null, Value::String)).collect();
				self.add_array(items.iter())
			}
			Value::Array(Array::Int(items)) => {
				let refs = items.iter().map(|item| self.add_int(i64::from(*item))).collect();
				Ok(self.add_refs(0xa, refs))
			}
			Value::Array(Array::Float(items)) => {
				let refs = items.iter().map(|item| self.add_real(f64::from(*item), false)).collect();
				Ok(self.add_refs(0xa, refs))
			}
			Value::Array(Array::Byte(bytes)) => {
				let id = self.begin();
				self.put_marker(0x4, bytes.len());
				self.out.extend_from_slice(bytes);
				Ok(id)
			}
			Value::Map(entries) | Value::Dictionary { entries, .. } => self.add_dict(entries),
			Value::F32(v) => Ok(self.add_real(f64::from(*v), false)),
			Value::F64(v) => Ok(self.add_real(*v, true)),
			Value::DateTime(v) => {
				let id = self.begin();
				self.out.push(0x33);
				let secs = (v.to_unix() - APPLE_EPOCH_UNIX) as f64;
				self.out.extend_from_slice(&secs.to_be_bytes());
				Ok(id)
			}
			Value::U64(v) => match i64::try_from(*v) {
				Ok(v) => Ok(self.add_int(v)),
				Err(_) => Err(PlistError::Unsupported { kind: "u64 above i64::MAX" }),
			},
			other => match other.as_i64() {
				Some(v) => Ok(self.add_int(v)),
				None => Err(PlistError::Unsupported { kind: other.kind() }),
			},
		}
	}

	fn add_marker(&mut self, marker: u8) -> u64 {
		let id = self.begin();
		self.out.push(marker);
		id
	}

	fn add_int(&mut self, value: i64) -> u64 {
		let id = self.begin();
		self.put_int(value);
		id
	}

	fn put_int(&mut self, value: i64) {
		let width = if value < 0 { 8 } else { width_for(value as u64) };
		self.out.push(0x10 | width.trailing_zeros() as u8);
		put_be(&mut self.out, value as u64, width);
	}

	fn put_marker(&mut self, high: u8, count: usize) {
		if count < 0xf {
			self.out.push((high << 4) | count as u8);
		} else {
			self.out.push((high << 4) | 0xf);
			self.put_int(count as i64);
		}
	}

	fn add_real(&mut self, value: f64, double: bool) -> u64 {
		let id = self.begin();
		if double {
			self.out.push(0x23);
			self.out.extend_from_slice(&value.to_be_bytes());
		} else {
			self.out.push(0x22);
			self.out.extend_from_slice(&(value as f32).to_be_bytes());
		}
		id
	}

	fn add_string(&mut self, text: &str) -> u64 {
		let short = text.chars().count() < 256;
		if short {
			if let Some(id) = self.strings.get(text) {
				return *id;
			}
		}

		let id = self.begin();
		if text.is_ascii() {
			self.put_marker(0x5, text.len());
			self.out.extend_from_slice(text.as_bytes());
		} else {
			let units: Vec<u16> = text.encode_utf16().collect();
			self.put_marker(0x6, units.len());
			for unit in units {
				self.out.extend_from_slice(&unit.to_be_bytes());
			}
		}
		if short {
			self.strings.insert(text.to_owned(), id);
		}
		id
	}

	fn add_array<'v>(&mut self, items: impl Iterator<Item = &'v Value>) -> Result<u64> {
		let mut refs = Vec::new();
		for item in items.filter(|item| !matches!(item, Value::Null)) {
			refs.push(self.add(item)?);
		}
		Ok(self.add_refs(0xa, refs))
	}

	fn add_dict(&mut self, entries: &[(Value, Value)]) -> Result<u64> {
		let mut keys = Vec::with_capacity(entries.len());
		let mut values = Vec::with_capacity(entries.len());
		for (key, value) in entries {
			if matches!(value, Value::Null) {
				continue;
			}
			let Value::String(key) = key else {
				return Err(PlistError::Unsupported { kind: key.kind() });
			};
			keys.push(self.add_string(key));
			values.push(self.add(value)?);
		}
		keys.extend(values);
		Ok(self.add_refs(0xd, keys))
	}

	/// Write a container record; dictionaries pass keys then values.
	fn add_refs(&mut self, high: u8, refs: Vec<u64>) -> u64 {
		let count = if high == 0xd { refs.len() / 2 } else { refs.len() };
		let id = self.begin();
		self.put_marker(high, count);
		for r in refs {
			put_be(&mut self.out, r, self.ref_size);
		}
		id
	}
}

struct PlistReader<'a> {
	bytes: &'a [u8],
	offsets: Vec<usize>,
	ref_size: usize,
	root: usize,
}

impl<'a> PlistReader<'a> {
	fn new(bytes: &'a [u8]) -> Result<Self> {
		if !bytes.starts_with(MAGIC) {
			return Err(PlistError::BadMagic);
		}
		let min = MAGIC.len() + TRAILER_SIZE;
		if bytes.len() < min {
			return Err(PlistError::Truncated {
				at: bytes.len(),
				need: min - bytes.len(),
			});
		}

		let trailer_at = bytes.len() - TRAILER_SIZE;
		let trailer = &bytes[trailer_at..];
		let offset_size = usize::from(trailer[6]);
		let ref_size = usize::from(trailer[7]);
		if !(1..=8).contains(&offset_size) || !(1..=8).contains(&ref_size) {
			return Err(PlistError::BadTrailer { reason: "int size outside 1..=8" });
		}

		let object_count = be_usize(&trailer[8..16])?;
		let root = be_usize(&trailer[16..24])?;
		let table_at = be_usize(&trailer[24..32])?;
		let table_end = object_count
			.checked_mul(offset_size)
			.and_then(|len| len.checked_add(table_at))
			.filter(|end| *end <= trailer_at)
			.ok_or(PlistError::BadTrailer { reason: "offset table overruns trailer" })?;
		if root >= object_count {
			return Err(PlistError::BadRef {
				index: root,
				count: object_count,
			});
		}

		let mut offsets = Vec::with_capacity(object_count);
		for entry in bytes[table_at..table_end].chunks_exact(offset_size) {
			let offset = be_usize(entry)?;
			if offset < MAGIC.len() || offset >= table_at {
				return Err(PlistError::BadTrailer { reason: "object offset outside record area" });
			}
			offsets.push(offset);
		}

		Ok(Self {
			bytes,
			offsets,
			ref_size,
			root,
		})
	}

	fn slice(&self, at: usize, len: usize) -> Result<&'a [u8]> {
		at.checked_add(len)
			.and_then(|end| self.bytes.get(at..end))
			.ok_or(PlistError::Truncated { at, need: len })
	}

	fn byte(&self, at: usize) -> Result<u8> {
		Ok(self.slice(at, 1)?[0])
	}

	/// Element count and payload start for a record whose marker sits at `at`.
	fn count(&self, at: usize, low: u8) -> Result<(usize, usize)> {
		if low != 0xf {
			return Ok((usize::from(low), at + 1));
		}
		let marker = self.byte(at + 1)?;
		if marker >> 4 != 0x1 || marker & 0xf > 3 {
			return Err(PlistError::UnknownMarker { marker, at: at + 1 });
		}
		let width = 1_usize << (marker & 0xf);
		let count = be_usize(self.slice(at + 2, width)?)?;
		Ok((count, at + 2 + width))
	}

	/// Object indices of a table of `refs` references starting at `start`.
	fn ref_table(&self, start: usize, refs: usize) -> Result<Vec<usize>> {
		let len = refs.checked_mul(self.ref_size).ok_or(PlistError::Truncated { at: start, need: usize::MAX })?;
		self.slice(start, len)?;
		(0..refs).map(|idx| self.reference(start + idx * self.ref_size)).collect()
	}

	fn reference(&self, at: usize) -> Result<usize> {
		let index = be_usize(self.slice(at, self.ref_size)?)?;
		if index >= self.offsets.len() {
			return Err(PlistError::BadRef {
				index,
				count: self.offsets.len(),
			});
		}
		Ok(index)
	}

	fn value(&self, index: usize, depth: u32) -> Result<Value> {
		if depth > MAX_DEPTH {
			return Err(PlistError::DepthExceeded { max_depth: MAX_DEPTH });
		}

		let at = self.offsets[index];
		let marker = self.byte(at)?;
		let low = marker & 0xf;
		match marker >> 4 {
			0x0 => match marker {
				0x00 => Ok(Value::Null),
				0x08 => Ok(Value::Bool(false)),
				0x09 => Ok(Value::Bool(true)),
				_ => Err(PlistError::UnknownMarker { marker, at }),
			},
			0x1 if low <= 3 => {
				// 8-byte ints are signed; narrower widths are unsigned and always fit.
				let value = be_u64(self.slice(at + 1, 1 << low)?) as i64;
				Ok(i32::try_from(value).map_or(Value::I64(value), Value::I32))
			}
			0x2 if low == 2 => Ok(Value::F32(f32::from_be_bytes(array(self.slice(at + 1, 4)?)))),
			0x2 if low == 3 => Ok(Value::F64(f64::from_be_bytes(array(self.slice(at + 1, 8)?)))),
			0x3 if low == 3 => {
				let secs = f64::from_be_bytes(array(self.slice(at + 1, 8)?));
				Timestamp::from_unix(secs.floor() as i64 + APPLE_EPOCH_UNIX)
					.map(Value::DateTime)
					.ok_or(PlistError::Unsupported { kind: "date outside 1980..2116" })
			}
			0x4 => {
				let (count, start) = self.count(at, low)?;
				Ok(Value::Array(Array::Byte(self.slice(start, count)?.to_vec())))
			}
			0x5 => {
				let (count, start) = self.count(at, low)?;
				let raw = self.slice(start, count)?;
				if !raw.is_ascii() {
					return Err(PlistError::BadString { at });
				}
				Ok(Value::String(raw.iter().map(|byte| char::from(*byte)).collect()))
			}
			0x6 => {
				let (count, start) = self.count(at, low)?;
				let len = count.checked_mul(2).ok_or(PlistError::Truncated { at: start, need: usize::MAX })?;
				let units = self.slice(start, len)?.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
				char::decode_utf16(units)
					.collect::<std::result::Result<String, _>>()
					.map(Value::String)
					.map_err(|_| PlistError::BadString { at })
			}
			0xa => {
				let (count, start) = self.count(at, low)?;
				let refs = self.ref_table(start, count)?;
				let mut items = Vec::with_capacity(refs.len());
				for item in refs {
					items.push(self.value(item, depth + 1)?);
				}
				Ok(Value::List(items))
			}
			0xd => {
				let (count, start) = self.count(at, low)?;
				let total = count.checked_mul(2).ok_or(PlistError::Truncated { at: start, need: usize::MAX })?;
				let refs = self.ref_table(start, total)?;
				let (keys, values) = refs.split_at(count);
				let mut entries = Vec::with_capacity(count);
				for (&key_ref, &value_ref) in keys.iter().zip(values) {
					let key = match self.value(key_ref, depth + 1)? {
						key @ Value::String(_) => key,
						_ => return Err(PlistError::NonStringKey { index: key_ref }),
					};
					entries.push((key, self.value(value_ref, depth + 1)?));
				}
				Ok(Value::Map(entries))
			}
			_ => Err(PlistError::UnknownMarker { marker, at }),
		}
	}
}

fn be_u64(bytes: &[u8]) -> u64 {
	bytes.iter().fold(0, |acc, byte| (acc << 8) | u64::from(*byte))
}

fn be_usize(bytes: &[u8]) -> Result<usize> {
	usize::try_from(be_u64(bytes)).map_err(|_| PlistError::BadTrailer { reason: "value does not fit usize" })
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
	let mut out = [0_u8; N];
	out.copy_from_slice(bytes);
	out
}
