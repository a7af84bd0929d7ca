use std::path::PathBuf;

use binmsg::msg::json::{from_json_str, to_json, to_json_string};
use binmsg::msg::{Graph, Prefs, Result, Value};

use crate::cmd::util::{emit_json, scalar_label, shape_label};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[command(subcommand)]
	pub action: Action,
}

#[derive(clap::Subcommand)]
pub enum Action {
	/// Print one value as JSON.
	Get { key: String },
	/// Store a JSON value under a key.
	Set {
		key: String,
		value: String,
		/// Save the table zstd-compressed.
		#[arg(long)]
		compress: bool,
	},
	/// Delete a key.
	Remove { key: String },
	/// List keys with a short value summary.
	List {
		#[arg(long)]
		json: bool,
	},
}

/// Read or edit a BinMsg prefs table.
pub fn run(args: Args) -> Result<()> {
	let Args { path, action } = args;
	let mut prefs = Prefs::open(&path)?;

	match action {
		Action::Get { key } => {
			let Some(value) = prefs.get(&key) else {
				println!("null");
				return Ok(());
			};
			let graph = Graph::from_parts(value.clone(), prefs.objects().to_vec());
			println!("{}", to_json_string(&graph, true)?);
		}
		Action::Set { key, value, compress } => {
			let value = from_json_str(&value)?;
			prefs.set(key, value);
			if compress {
				prefs.save_compressed()?;
			} else {
				prefs.save()?;
			}
		}
		Action::Remove { key } => {
			if prefs.remove(&key).is_none() {
				log::info!("key {key} not present in {}", path.display());
			}
			prefs.save()?;
		}
		Action::List { json } => {
			if json {
				return emit_json(&to_json(&prefs.to_graph())?);
			}
			for key in prefs.keys() {
				let value = prefs.get(key).unwrap_or(&Value::Null);
				let summary = scalar_label(value).unwrap_or_else(|| shape_label(value));
				println!("{key}: {summary}");
			}
		}
	}

	Ok(())
}
