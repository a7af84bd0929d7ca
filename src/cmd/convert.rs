use std::fs;
use std::path::{Path, PathBuf};

use binmsg::msg::json::{from_json_str, to_json_string};
use binmsg::msg::{DecodeOptions, EncodeOptions, Graph, Result, compress_bytes, decode_with, encode_with, plist};

use crate::cmd::util::load;

/// Serialized forms the converter reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
	/// BinMsg buffer, optionally zstd-compressed.
	Binmsg,
	/// JSON text.
	Json,
	/// Binary property list.
	Plist,
}

impl Format {
	/// Guess a format from the file extension; anything unrecognized is BinMsg.
	pub fn from_path(path: &Path) -> Self {
		match path.extension().and_then(|ext| ext.to_str()) {
			Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
			Some(ext) if ext.eq_ignore_ascii_case("plist") => Self::Plist,
			_ => Self::Binmsg,
		}
	}
}

#[derive(clap::Args)]
pub struct Args {
	pub input: PathBuf,
	pub output: PathBuf,
	#[arg(long, value_enum)]
	pub from: Option<Format>,
	#[arg(long, value_enum)]
	pub to: Option<Format>,
	/// Compress BinMsg output with zstd.
	#[arg(long)]
	pub compress: bool,
	/// Write null for values BinMsg cannot represent instead of failing.
	#[arg(long)]
	pub lossy: bool,
}

/// Convert a file between BinMsg, JSON, and property-list forms.
pub fn run(args: Args) -> Result<()> {
	let Args {
		input,
		output,
		from,
		to,
		compress,
		lossy,
	} = args;

	let from = from.unwrap_or_else(|| Format::from_path(&input));
	let to = to.unwrap_or_else(|| Format::from_path(&output));

	let graph = read_graph(&input, from)?;
	let bytes = write_graph(&graph, to, compress, lossy)?;
	fs::write(&output, &bytes)?;
	log::info!("converted {} ({from:?}) -> {} ({to:?}), {} bytes", input.display(), output.display(), bytes.len());

	Ok(())
}

fn read_graph(path: &Path, format: Format) -> Result<Graph> {
	match format {
		Format::Binmsg => {
			let loaded = load(path)?;
			Ok(decode_with(&loaded.bytes, &DecodeOptions::for_inspection())?)
		}
		Format::Json => {
			let text = fs::read_to_string(path)?;
			Ok(Graph::new(from_json_str(&text)?))
		}
		Format::Plist => {
			let raw = fs::read(path)?;
			Ok(Graph::new(plist::decode(&raw)?))
		}
	}
}

fn write_graph(graph: &Graph, format: Format, compress: bool, lossy: bool) -> Result<Vec<u8>> {
	match format {
		Format::Binmsg => {
			let opt = if lossy { EncodeOptions::lossy() } else { EncodeOptions::default() };
			let bytes = encode_with(graph, &opt)?;
			if compress { compress_bytes(&bytes) } else { Ok(bytes) }
		}
		Format::Json => {
			let mut text = to_json_string(graph, true)?;
			text.push('\n');
			Ok(text.into_bytes())
		}
		Format::Plist => {
			if !graph.objects().is_empty() {
				log::warn!("{} objects cannot be stored in a property list", graph.objects().len());
			}
			Ok(plist::encode(&graph.root)?)
		}
	}
}

#[cfg(test)]
mod tests;
