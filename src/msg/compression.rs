use std::io::Read;

use crate::msg::{Error, Result};

const MAX_DECOMPRESSED_BYTES: usize = 256 * 1024 * 1024;
/// zstd frame magic.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];
/// Level used when writing compressed buffers.
pub const DEFAULT_LEVEL: i32 = 3;

/// Compression mode detected for a stored buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Raw BinMsg bytes.
	None,
	/// zstd-compressed BinMsg bytes.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Detect and undo compression, returning `(mode, raw_bytes)`.
///
/// Anything not starting with the zstd magic is returned unchanged.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	if raw.starts_with(&ZSTD_MAGIC) {
		let out = decode_zstd(&raw)?;
		log::debug!("zstd inflated {} -> {} bytes", raw.len(), out.len());
		return Ok((Compression::Zstd, out));
	}
	Ok((Compression::None, raw))
}

/// Compress bytes as a single zstd frame.
pub fn compress_bytes(raw: &[u8]) -> Result<Vec<u8>> {
	Ok(zstd::stream::encode_all(raw, DEFAULT_LEVEL)?)
}

fn decode_zstd(raw: &[u8]) -> Result<Vec<u8>> {
	let mut decoder = zstd::stream::read::Decoder::new(raw)?;
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = decoder.read(&mut buf)?;
		if read == 0 {
			break;
		}

		if out.len() + read > MAX_DECOMPRESSED_BYTES {
			return Err(Error::DecompressedTooLarge { limit: MAX_DECOMPRESSED_BYTES });
		}

		out.extend_from_slice(&buf[..read]);
	}

	Ok(out)
}
