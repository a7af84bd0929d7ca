use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for callers that mix codecs, files, and JSON.
#[derive(Debug, Error)]
pub enum Error {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// BinMsg buffer could not be decoded.
	#[error("decode: {0}")]
	Decode(#[from] DecodeError),
	/// Value graph could not be encoded.
	#[error("encode: {0}")]
	Encode(#[from] EncodeError),
	/// Property list could not be encoded or decoded.
	#[error("plist: {0}")]
	Plist(#[from] PlistError),
	/// JSON text was malformed.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// JSON value has no BinMsg counterpart or vice versa.
	#[error("json bridge: {reason}")]
	JsonBridge {
		/// Human-readable description of the mismatch.
		reason: String,
	},
	/// Prefs file root was not a string-keyed table.
	#[error("prefs root is not a table (found {found})")]
	PrefsNotTable {
		/// Kind label of the decoded root value.
		found: &'static str,
	},
	/// Prefs entry was expected to hold an object.
	#[error("prefs entry {key:?} is not an object (found {found})")]
	PrefsNotObject {
		/// Key or store id that was read.
		key: String,
		/// Kind label of the stored value.
		found: &'static str,
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
}

/// Errors produced while reading a BinMsg buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
	/// Buffer is too short to hold the header and one tag.
	#[error("buffer too short for header: len={len}")]
	HeaderTooShort {
		/// Total buffer length.
		len: usize,
	},
	/// Not enough bytes remained for a requested read.
	#[error("truncated buffer at offset {at}, need {need} bytes, remaining {rem}")]
	TruncatedBuffer {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Tag byte has no meaning in the position it was read.
	#[error("unknown tag 0x{tag:02x} at offset {at} ({context})")]
	UnknownTag {
		/// Offending tag byte.
		tag: u8,
		/// Byte offset of the tag.
		at: usize,
		/// Which decode step read the tag.
		context: &'static str,
	},
	/// Object type is not known to the registry.
	#[error("unresolvable type {namespace}::{name}")]
	UnresolvableType {
		/// Type namespace as written by the encoder.
		namespace: String,
		/// Type name as written by the encoder.
		name: String,
	},
	/// Decoded field is not declared by the type schema.
	#[error("type {type_name} has no field {field}")]
	UnknownField {
		/// Qualified type name.
		type_name: String,
		/// Field name read from the buffer.
		field: String,
	},
	/// String or object back-reference points past the registered entries.
	#[error("malformed {kind} back-reference {id} (registered={registered})")]
	MalformedBackReference {
		/// `"string"` or `"object"`.
		kind: &'static str,
		/// Referenced id.
		id: usize,
		/// Number of entries registered so far.
		registered: usize,
	},
	/// Typed field setter refused a decoded value.
	#[error("type {type_name} rejected field {field} holding {got}")]
	FieldRejected {
		/// Qualified type name.
		type_name: String,
		/// Field name.
		field: String,
		/// Kind of the offered value.
		got: &'static str,
	},
	/// A typed container element does not match its declared element type.
	#[error("element type mismatch at offset {at}: expected {expected}, got {got}")]
	ElementTypeMismatch {
		/// Byte offset after the element.
		at: usize,
		/// Declared element type.
		expected: String,
		/// Kind of the decoded element.
		got: &'static str,
	},
	/// A position where a string was required held another value.
	#[error("expected string at offset {at}, got {got}")]
	ExpectedString {
		/// Byte offset of the value.
		at: usize,
		/// Kind of the decoded value.
		got: &'static str,
	},
	/// Multibyte string payload is not valid UTF-8.
	#[error("invalid multibyte string at offset {at}")]
	InvalidString {
		/// Byte offset of the bad sequence.
		at: usize,
	},
	/// Char payload is a lone surrogate.
	#[error("invalid char code unit 0x{unit:04x}")]
	InvalidChar {
		/// Raw UTF-16 code unit.
		unit: u16,
	},
	/// Decoder recursion depth exceeded configured limit.
	#[error("decode depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Container length exceeded configured limit.
	#[error("decode count too large: count={count}, max={max}")]
	CountTooLarge {
		/// Declared element count.
		count: usize,
		/// Maximum permitted count.
		max: usize,
	},
	/// Multi-dimensional array rank outside 2..=4 or negative extent.
	#[error("invalid array shape at offset {at}")]
	InvalidShape {
		/// Byte offset of the shape data.
		at: usize,
	},
}

/// Errors produced while writing a value graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
	/// Value has no wire form.
	#[error("unsupported value shape: {reason}")]
	UnsupportedValueShape {
		/// Description of the offending value.
		reason: String,
	},
	/// Container or string length exceeds the widest count form.
	#[error("count {count} exceeds maximum {max}")]
	CountTooLarge {
		/// Requested count.
		count: usize,
		/// Widest encodable count.
		max: usize,
	},
	/// `Value::Object` id has no entry in the graph.
	#[error("dangling object id {id} (graph holds {len})")]
	DanglingObject {
		/// Referenced id.
		id: usize,
		/// Number of objects in the graph.
		len: usize,
	},
	/// Typed container holds an element of another type.
	#[error("element type mismatch: expected {expected}, got {got}")]
	ElementTypeMismatch {
		/// Declared element type.
		expected: String,
		/// Kind of the offending element.
		got: &'static str,
	},
}

/// Errors produced by the property-list codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlistError {
	/// Buffer does not start with `bplist00`.
	#[error("missing bplist00 magic")]
	BadMagic,
	/// Not enough bytes remained for a requested read.
	#[error("truncated plist at offset {at}, need {need} bytes")]
	Truncated {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
	},
	/// Trailer fields are inconsistent with the buffer.
	#[error("invalid plist trailer: {reason}")]
	BadTrailer {
		/// Description of the inconsistency.
		reason: &'static str,
	},
	/// Object reference outside the offset table.
	#[error("plist object ref {index} out of range (objects={count})")]
	BadRef {
		/// Referenced object index.
		index: usize,
		/// Number of objects in the table.
		count: usize,
	},
	/// Record marker is not understood.
	#[error("unknown plist marker 0x{marker:02x} at offset {at}")]
	UnknownMarker {
		/// Marker byte.
		marker: u8,
		/// Byte offset of the record.
		at: usize,
	},
	/// Dictionary key is not a string.
	#[error("plist dictionary key at object {index} is not a string")]
	NonStringKey {
		/// Object index of the key.
		index: usize,
	},
	/// String payload is not valid ASCII or UTF-16.
	#[error("invalid plist string at offset {at}")]
	BadString {
		/// Byte offset of the record.
		at: usize,
	},
	/// Nesting exceeded the configured depth.
	#[error("plist depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Value kind cannot be represented in a property list.
	#[error("value kind {kind} cannot be stored in a property list")]
	Unsupported {
		/// Kind label of the offending value.
		kind: &'static str,
	},
}
