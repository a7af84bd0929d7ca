use std::collections::HashSet;
use std::path::PathBuf;

use binmsg::msg::json::to_json_string;
use binmsg::msg::{Array, DecodeOptions, Graph, ObjectId, Result, Value, decode_with};

use crate::cmd::util::{load, scalar_label, shape_label};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
	/// Decode unregistered object types as dynamic records.
	#[arg(long = "any-type")]
	pub any_type: bool,
	#[arg(long = "max-items", default_value_t = 64)]
	pub max_items: usize,
}

/// Decode a buffer and print its value tree.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		json,
		any_type,
		max_items,
	} = args;

	let opt = if any_type { DecodeOptions::for_inspection() } else { DecodeOptions::default() };
	let loaded = load(&path)?;
	let graph = decode_with(&loaded.bytes, &opt)?;

	if json {
		println!("{}", to_json_string(&graph, true)?);
		return Ok(());
	}

	let mut out = String::new();
	Outline {
		graph: &graph,
		max_items,
		seen: HashSet::new(),
		out: &mut out,
	}
	.value("root", &graph.root, 0);
	print!("{out}");

	Ok(())
}

/// Indented text rendering; repeated objects print as `-> #id`.
struct Outline<'a> {
	graph: &'a Graph,
	max_items: usize,
	seen: HashSet<ObjectId>,
	out: &'a mut String,
}

impl Outline<'_> {
	fn line(&mut self, depth: usize, text: &str) {
		for _ in 0..depth {
			self.out.push_str("  ");
		}
		self.out.push_str(text);
		self.out.push('\n');
	}

	fn value(&mut self, label: &str, value: &Value, depth: usize) {
		if let Some(text) = scalar_label(value) {
			self.line(depth, &format!("{label}: {text}"));
			return;
		}

		match value {
			Value::Object(id) => self.object(label, *id, depth),
			Value::Array(array) => {
				self.line(depth, &format!("{label}: {}", shape_label(value)));
				self.array(array, depth + 1);
			}
			Value::MultiArray(array) => {
				self.line(depth, &format!("{label}: {}", shape_label(value)));
				self.items(&array.items, depth + 1);
			}
			Value::List(items) | Value::TypedList { items, .. } | Value::Set { items, .. } | Value::Queue { items, .. } | Value::Stack { items, .. } => {
				self.line(depth, &format!("{label}: {}", shape_label(value)));
				self.items(items, depth + 1);
			}
			Value::Map(entries) | Value::Dictionary { entries, .. } => {
				self.line(depth, &format!("{label}: {}", shape_label(value)));
				for (index, (key, item)) in entries.iter().enumerate() {
					if index == self.max_items {
						self.line(depth + 1, &format!("... {} more", entries.len() - index));
						break;
					}
					let key = match key {
						Value::String(text) => text.clone(),
						other => scalar_label(other).unwrap_or_else(|| shape_label(other)),
					};
					self.value(&key, item, depth + 1);
				}
			}
			other => self.line(depth, &format!("{label}: {}", other.kind())),
		}
	}

	fn items(&mut self, items: &[Value], depth: usize) {
		for (index, item) in items.iter().enumerate() {
			if index == self.max_items {
				self.line(depth, &format!("... {} more", items.len() - index));
				break;
			}
			self.value(&format!("[{index}]"), item, depth);
		}
	}

	fn array(&mut self, array: &Array, depth: usize) {
		match array {
			Array::Any(items) | Array::Typed { items, .. } => self.items(items, depth),
			dense => {
				let shown = dense.len().min(self.max_items);
				let rendered = dense_labels(dense, shown);
				let mut text = rendered.join(", ");
				if dense.len() > shown {
					text.push_str(&format!(", ... {} more", dense.len() - shown));
				}
				self.line(depth, &text);
			}
		}
	}

	fn object(&mut self, label: &str, id: ObjectId, depth: usize) {
		if !self.seen.insert(id) {
			self.line(depth, &format!("{label}: -> #{}", id.0));
			return;
		}
		let graph = self.graph;
		let Some(object) = graph.get(id) else {
			self.line(depth, &format!("{label}: <dangling #{}>", id.0));
			return;
		};
		self.line(depth, &format!("{label}: {} #{}", object.type_name, id.0));
		for (name, value) in &object.fields {
			self.value(name, value, depth + 1);
		}
	}
}

fn dense_labels(array: &Array, take: usize) -> Vec<String> {
	match array {
		Array::Bool(items) => items.iter().take(take).map(ToString::to_string).collect(),
		Array::Byte(items) => items.iter().take(take).map(ToString::to_string).collect(),
		Array::Int(items) => items.iter().take(take).map(ToString::to_string).collect(),
		Array::Float(items) => items.iter().take(take).map(ToString::to_string).collect(),
		Array::Vector2(items) => items.iter().take(take).map(|v| format!("{v:?}")).collect(),
		Array::Vector3(items) => items.iter().take(take).map(|v| format!("{v:?}")).collect(),
		Array::Color(items) => items.iter().take(take).map(|c| format!("rgba({}, {}, {}, {})", c.r, c.g, c.b, c.a)).collect(),
		Array::Color32(items) => items.iter().take(take).map(|v| format!("{v:?}")).collect(),
		Array::String(items) => items.iter().take(take).map(|v| v.as_deref().map_or("null".to_owned(), |s| format!("{s:?}"))).collect(),
		Array::Any(items) | Array::Typed { items, .. } => items.iter().take(take).map(|v| scalar_label(v).unwrap_or_else(|| shape_label(v))).collect(),
	}
}
