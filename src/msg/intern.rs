//! String and object back-reference tables.
//!
//! Encoder and decoder assign ids in the same first-occurrence order, so the
//! tables never travel on the wire.

use std::collections::HashMap;

use crate::msg::{DecodeError, ObjectId};

/// Number of string ids addressable by the wide back-reference form.
pub const MAX_INTERNED_STRINGS: usize = 0x1_0000;
/// Longest string, in characters, that takes part in interning.
pub const MAX_INTERNED_LEN: usize = 255;
/// Largest id the short (10-bit) string back-reference can carry.
pub const SHORT_REF_MAX: u32 = 0x3ff;

/// Outcome of offering a key to an interner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interned {
	/// Seen before; write a back-reference to this id.
	Existing(u32),
	/// First occurrence; registered under the id when one was still free.
	New(Option<u32>),
}

/// True when `text` is 1 to 255 characters long.
pub fn is_internable(text: &str) -> bool {
	if text.is_empty() || text.len() > MAX_INTERNED_LEN * 4 {
		return false;
	}
	text.len() <= MAX_INTERNED_LEN || text.chars().count() <= MAX_INTERNED_LEN
}

/// Encode-side string table.
#[derive(Debug, Default)]
pub struct StringInterner {
	ids: HashMap<String, u32>,
}

impl StringInterner {
	/// Empty interner with room for `capacity` strings.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			ids: HashMap::with_capacity(capacity),
		}
	}

	/// Look up `text`, registering it on first occurrence.
	pub fn intern(&mut self, text: &str) -> Interned {
		if !is_internable(text) {
			return Interned::New(None);
		}
		if let Some(id) = self.ids.get(text) {
			return Interned::Existing(*id);
		}
		if self.ids.len() >= MAX_INTERNED_STRINGS {
			return Interned::New(None);
		}
		let id = self.ids.len() as u32;
		self.ids.insert(text.to_owned(), id);
		Interned::New(Some(id))
	}

	/// Number of registered strings.
	pub fn len(&self) -> usize {
		self.ids.len()
	}

	/// True when nothing was registered.
	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}
}

/// Decode-side string table.
#[derive(Debug, Default)]
pub struct StringTable {
	entries: Vec<String>,
}

impl StringTable {
	/// Empty table presized from the header hint.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: Vec::with_capacity(capacity),
		}
	}

	/// Register a decoded literal under the next id when it is eligible.
	pub fn record(&mut self, text: &str) {
		if self.entries.len() < MAX_INTERNED_STRINGS && is_internable(text) {
			self.entries.push(text.to_owned());
		}
	}

	/// Resolve a back-reference.
	pub fn get(&self, id: usize) -> Result<&str, DecodeError> {
		self.entries.get(id).map(String::as_str).ok_or(DecodeError::MalformedBackReference {
			kind: "string",
			id,
			registered: self.entries.len(),
		})
	}

	/// Number of registered strings.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when nothing was registered.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Encode-side object identity table.
#[derive(Debug, Default)]
pub struct ObjectInterner {
	ids: HashMap<ObjectId, u32>,
}

impl ObjectInterner {
	/// Look up an object by identity, registering it on first occurrence.
	pub fn intern(&mut self, id: ObjectId) -> Interned {
		if let Some(wire) = self.ids.get(&id) {
			return Interned::Existing(*wire);
		}
		let wire = self.ids.len() as u32;
		self.ids.insert(id, wire);
		Interned::New(Some(wire))
	}

	/// Number of registered objects.
	pub fn len(&self) -> usize {
		self.ids.len()
	}

	/// True when nothing was registered.
	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}
}
