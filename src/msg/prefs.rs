use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::msg::compression::{compress_bytes, decode_bytes};
use crate::msg::{Compression, DecodeOptions, EncodeOptions, Error, Graph, Object, Result, Serializable, Value, decode_with, encode, encode_with};

/// Capacity assumed for a store that has never been saved.
const EMPTY_SIZE: usize = 256;

/// File-backed string-keyed table persisted with BinMsg.
///
/// Changes stay in memory until [`Prefs::save`], which writes only when
/// something changed since the last load or save.
#[derive(Debug)]
pub struct Prefs {
	path: PathBuf,
	entries: Vec<(String, Value)>,
	objects: Graph,
	initial_size: usize,
	compression: Compression,
	dirty: bool,
}

impl Prefs {
	/// Load the table at `path`, or start empty when the file does not exist.
	///
	/// Object values decode as dynamic records.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Self::open_with(path, &DecodeOptions::for_inspection())
	}

	/// Load the table at `path` with explicit decode options.
	pub fn open_with(path: impl AsRef<Path>, opt: &DecodeOptions) -> Result<Self> {
		let path = path.as_ref().to_path_buf();
		let raw = match fs::read(&path) {
			Ok(raw) => raw,
			Err(err) if err.kind() == ErrorKind::NotFound => {
				log::debug!("prefs {} not found, starting empty", path.display());
				return Ok(Self {
					path,
					entries: Vec::new(),
					objects: Graph::default(),
					initial_size: EMPTY_SIZE,
					compression: Compression::None,
					dirty: false,
				});
			}
			Err(err) => return Err(err.into()),
		};

		let initial_size = raw.len();
		let (compression, bytes) = decode_bytes(raw)?;
		let (root, objects) = decode_with(&bytes, opt)?.into_parts();
		let objects = Graph::from_parts(Value::Null, objects);
		let table = match root {
			Value::Map(table) => table,
			other => return Err(Error::PrefsNotTable { found: other.kind() }),
		};

		let mut entries = Vec::with_capacity(table.len());
		for (key, value) in table {
			let Value::String(key) = key else {
				return Err(Error::PrefsNotTable { found: "map with non-string keys" });
			};
			entries.push((key, value));
		}
		log::debug!("prefs {} loaded {} keys ({})", path.display(), entries.len(), compression.as_str());

		Ok(Self {
			path,
			entries,
			objects,
			initial_size,
			compression,
			dirty: false,
		})
	}

	/// Backing file path.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Compression used when saving.
	pub fn compression(&self) -> Compression {
		self.compression
	}

	/// Whether there are unsaved changes.
	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	/// Borrow the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	/// Store `value` under `key`, replacing any previous value in place.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		let key = key.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(k, _)| *k == key) {
			Some((_, slot)) => *slot = value,
			None => self.entries.push((key, value)),
		}
		self.dirty = true;
	}

	/// Rebuild the object stored under `key` as `T`.
	///
	/// A missing key or a stored null yields `None`.
	pub fn get_as<T: Serializable>(&self, key: &str) -> Result<Option<T>> {
		match self.get(key) {
			None | Some(Value::Null) => Ok(None),
			Some(Value::Object(id)) => Ok(Some(self.objects.extract(*id)?)),
			Some(other) => Err(Error::PrefsNotObject {
				key: key.to_owned(),
				found: other.kind(),
			}),
		}
	}

	/// Store `value` as an object under `key`.
	pub fn set_object<T: Serializable>(&mut self, key: impl Into<String>, value: &T) {
		let id = self.objects.insert_serializable(value);
		self.set(key, Value::Object(id));
	}

	/// Mark the table changed so the next [`Prefs::save`] writes it.
	pub fn touch(&mut self) {
		self.dirty = true;
	}

	/// Remove `key`, returning its value.
	pub fn remove(&mut self, key: &str) -> Option<Value> {
		let idx = self.entries.iter().position(|(k, _)| k == key)?;
		self.dirty = true;
		Some(self.entries.remove(idx).1)
	}

	/// Whether `key` is present.
	pub fn contains(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	/// Remove every key.
	pub fn clear(&mut self) {
		self.entries.clear();
		self.objects = Graph::default();
		self.dirty = true;
	}

	/// Keys in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(k, _)| k.as_str())
	}

	/// Number of keys.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when the table holds no keys.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Objects referenced by stored values.
	pub fn objects(&self) -> &[Object] {
		self.objects.objects()
	}

	/// Snapshot of the table as a graph rooted at a string-keyed map.
	pub fn to_graph(&self) -> Graph {
		let root = Value::Map(self.entries.iter().map(|(k, v)| (Value::String(k.clone()), v.clone())).collect());
		Graph::from_parts(root, self.objects.objects().to_vec())
	}

	/// Write the table if it changed; returns whether a write happened.
	pub fn save(&mut self) -> Result<bool> {
		if !self.dirty {
			return Ok(false);
		}

		let opt = EncodeOptions::with_size_hint(self.initial_size + 32);
		let mut bytes = encode_with(&self.to_graph(), &opt)?;
		if self.compression == Compression::Zstd {
			bytes = compress_bytes(&bytes)?;
		}
		fs::write(&self.path, &bytes)?;
		log::debug!("prefs {} saved {} keys in {} bytes", self.path.display(), self.entries.len(), bytes.len());

		self.initial_size = bytes.len();
		self.dirty = false;
		Ok(true)
	}

	/// Switch to zstd compression and write the table.
	pub fn save_compressed(&mut self) -> Result<()> {
		if self.compression != Compression::Zstd {
			self.compression = Compression::Zstd;
			self.dirty = true;
		}
		self.save().map(|_| ())
	}
}

/// Directory of standalone BinMsg files addressed by id.
///
/// Id `None` names the default table `prefs.bin`; any other id maps to
/// `prefs-<id>.bin`.
#[derive(Debug, Clone)]
pub struct PrefsDir {
	root: PathBuf,
}

impl PrefsDir {
	/// Store rooted at `root`.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// File backing `id`.
	pub fn path(&self, id: Option<&str>) -> PathBuf {
		match id {
			Some(id) if !id.is_empty() => self.root.join(format!("prefs-{id}.bin")),
			_ => self.root.join("prefs.bin"),
		}
	}

	/// Open the key table stored under `id`.
	pub fn open(&self, id: Option<&str>) -> Result<Prefs> {
		Prefs::open(self.path(id))
	}

	/// Decode the object saved under `id`; `None` when nothing was saved or the root is null.
	pub fn load<T: Serializable>(&self, id: &str) -> Result<Option<T>> {
		let path = self.path(Some(id));
		let raw = match fs::read(&path) {
			Ok(raw) => raw,
			Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(err.into()),
		};
		let (_, bytes) = decode_bytes(raw)?;
		let graph = decode_with(&bytes, &DecodeOptions::for_inspection())?;
		match &graph.root {
			Value::Null => Ok(None),
			Value::Object(root) => Ok(Some(graph.extract(*root)?)),
			other => Err(Error::PrefsNotObject {
				key: id.to_owned(),
				found: other.kind(),
			}),
		}
	}

	/// Encode `value` as the whole file for `id`.
	pub fn save<T: Serializable>(&self, id: &str, value: &T) -> Result<()> {
		let mut graph = Graph::default();
		graph.root = Value::Object(graph.insert_serializable(value));
		let path = self.path(Some(id));
		fs::write(&path, encode(&graph)?)?;
		log::debug!("prefs object {} saved to {}", T::type_name(), path.display());
		Ok(())
	}

	/// Delete the file for `id`; returns whether one existed.
	pub fn remove(&self, id: &str) -> Result<bool> {
		if id.is_empty() {
			return Ok(false);
		}
		match fs::remove_file(self.path(Some(id))) {
			Ok(()) => Ok(true),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
			Err(err) => Err(err.into()),
		}
	}
}

#[cfg(test)]
mod tests;
