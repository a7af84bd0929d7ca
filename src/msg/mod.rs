pub mod bytes;
mod compression;
pub mod count;
mod decode;
mod element;
mod encode;
mod error;
mod header;
pub mod intern;
pub mod json;
mod object;
pub mod plist;
mod prefs;
mod schema;
pub mod tag;
mod value;

/// Compression detection for stored buffers.
pub use compression::{Compression, compress_bytes, decode_bytes};
/// Decoding entry points and options.
pub use decode::{DecodeOptions, Decoder, decode, decode_with};
/// Container element types.
pub use element::ElementType;
/// Encoding entry points and options.
pub use encode::{EncodeOptions, Encoder, Unsupported, encode, encode_value, encode_with, encode_with_hint};
/// Error and result aliases.
pub use error::{DecodeError, EncodeError, Error, PlistError, Result};
/// Buffer header representation.
pub use header::MsgHeader;
/// Object arena types.
pub use object::{Graph, Object, ObjectId, TypeName};
/// File-backed preference table.
pub use prefs::{Prefs, PrefsDir};
/// Explicit object schemas.
pub use schema::{Serializable, TypeRegistry, TypeSchema};
/// Value model.
pub use value::{Array, Bounds, Color, MultiArray, Rect, Timestamp, Value};
