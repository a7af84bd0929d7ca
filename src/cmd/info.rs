use std::path::PathBuf;

use binmsg::msg::{DecodeOptions, MsgHeader, Result, decode_with};

use crate::cmd::util::{emit_json, load, shape_label};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print header hints, sizes, and a root summary.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let loaded = load(&path)?;
	let header = MsgHeader::parse(&loaded.bytes)?;
	let graph = decode_with(&loaded.bytes, &DecodeOptions::for_inspection())?;

	let payload = InfoJson {
		path: path.display().to_string(),
		compression: loaded.compression.as_str(),
		file_size: loaded.file_size,
		payload_size: loaded.bytes.len(),
		string_hint: header.string_hint,
		object_hint: header.object_hint,
		root: shape_label(&graph.root),
		object_count: graph.objects().len(),
	};

	if json {
		return emit_json(&payload);
	}

	println!("path: {}", payload.path);
	println!("compression: {}", payload.compression);
	println!("file_size: {}", payload.file_size);
	println!("payload_size: {}", payload.payload_size);
	println!("string_hint: {} (capacity {})", header.string_hint, header.string_capacity());
	println!("object_hint: {} (capacity {})", header.object_hint, header.object_capacity());
	println!("root: {}", payload.root);
	println!("object_count: {}", payload.object_count);

	Ok(())
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	compression: &'static str,
	file_size: usize,
	payload_size: usize,
	string_hint: u8,
	object_hint: u8,
	root: String,
	object_count: usize,
}
