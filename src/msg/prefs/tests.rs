use super::{Prefs, PrefsDir};
use crate::msg::{Compression, Error, Graph, Serializable, Value, compression::ZSTD_MAGIC, encode};

#[derive(Debug, Default, PartialEq)]
struct Window {
	title: String,
	width: i32,
}

impl Serializable for Window {
	const NAMESPACE: &'static str = "Ui";
	const TYPE_NAME: &'static str = "Window";

	fn to_fields(&self) -> Vec<(&'static str, Value)> {
		vec![("title", Value::from(self.title.as_str())), ("width", Value::I32(self.width))]
	}

	fn set_field(&mut self, name: &str, value: Value) -> bool {
		match (name, value) {
			("title", Value::String(title)) => self.title = title,
			("width", Value::I32(width)) => self.width = width,
			_ => return false,
		}
		true
	}
}

fn main_window() -> Window {
	Window {
		title: "main".to_owned(),
		width: 640,
	}
}

#[test]
fn missing_file_starts_empty_and_clean() {
	let dir = tempfile::tempdir().expect("tempdir");
	let mut prefs = Prefs::open(dir.path().join("prefs.bin")).expect("opens");
	assert!(prefs.is_empty());
	assert!(!prefs.save().expect("save is a no-op"));
	assert!(!dir.path().join("prefs.bin").exists());
}

#[test]
fn set_save_reopen_keeps_values_and_order() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("prefs.bin");

	let mut prefs = Prefs::open(&path).expect("opens");
	prefs.set("volume", 0.5_f32);
	prefs.set("name", "Ada");
	prefs.set("volume", 0.75_f32);
	assert!(prefs.save().expect("saves"));
	assert!(!prefs.is_dirty());

	let reopened = Prefs::open(&path).expect("reopens");
	assert_eq!(reopened.keys().collect::<Vec<_>>(), ["volume", "name"]);
	assert_eq!(reopened.get("volume"), Some(&Value::F32(0.75)));
	assert_eq!(reopened.get("name"), Some(&Value::from("Ada")));
}

#[test]
fn remove_and_clear_mark_dirty() {
	let dir = tempfile::tempdir().expect("tempdir");
	let mut prefs = Prefs::open(dir.path().join("prefs.bin")).expect("opens");
	prefs.set("a", 1);
	prefs.save().expect("saves");

	assert_eq!(prefs.remove("missing"), None);
	assert!(!prefs.is_dirty());
	assert_eq!(prefs.remove("a"), Some(Value::I32(1)));
	assert!(prefs.is_dirty());
	assert!(!prefs.contains("a"));

	prefs.set("b", true);
	prefs.save().expect("saves");
	prefs.clear();
	assert!(prefs.is_dirty());
	assert_eq!(prefs.len(), 0);
}

#[test]
fn compressed_store_round_trips() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("prefs.zst");
	let mut prefs = Prefs::open(&path).expect("opens");
	prefs.set("motd", "hello ".repeat(40));
	prefs.save_compressed().expect("saves");

	let raw = std::fs::read(&path).expect("file written");
	assert!(raw.starts_with(&ZSTD_MAGIC));
	let reopened = Prefs::open(&path).expect("reopens");
	assert_eq!(reopened.compression(), Compression::Zstd);
	assert_eq!(reopened.get("motd"), prefs.get("motd"));
}

#[test]
fn non_table_root_is_rejected() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("prefs.bin");
	std::fs::write(&path, encode(&Graph::new(Value::I32(5))).expect("encodes")).expect("writes");
	let err = Prefs::open(&path).expect_err("int root");
	assert!(matches!(err, Error::PrefsNotTable { found: "i32" }));
}

#[test]
fn typed_objects_survive_save_and_reopen() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("prefs.bin");
	let mut prefs = Prefs::open(&path).expect("opens");
	prefs.set("volume", 3);
	prefs.set_object("window", &main_window());
	assert_eq!(prefs.get_as::<Window>("window").expect("extracts"), Some(main_window()));
	prefs.save().expect("saves");

	let reopened = Prefs::open(&path).expect("reopens");
	assert_eq!(reopened.get_as::<Window>("window").expect("extracts"), Some(main_window()));
	assert_eq!(reopened.get_as::<Window>("missing").expect("absent"), None);
	let err = reopened.get_as::<Window>("volume").expect_err("int is not an object");
	assert!(matches!(err, Error::PrefsNotObject { found: "i32", .. }));
}

#[test]
fn touch_forces_a_write() {
	let dir = tempfile::tempdir().expect("tempdir");
	let mut prefs = Prefs::open(dir.path().join("prefs.bin")).expect("opens");
	assert!(!prefs.save().expect("nothing to write"));
	prefs.touch();
	assert!(prefs.save().expect("writes"));
	assert!(dir.path().join("prefs.bin").exists());
}

#[test]
fn prefs_dir_saves_objects_by_id() {
	let dir = tempfile::tempdir().expect("tempdir");
	let store = PrefsDir::new(dir.path());
	assert_eq!(store.path(None), dir.path().join("prefs.bin"));
	assert_eq!(store.path(Some("layout")), dir.path().join("prefs-layout.bin"));

	assert_eq!(store.load::<Window>("layout").expect("nothing saved"), None);
	store.save("layout", &main_window()).expect("saves");
	assert_eq!(store.load::<Window>("layout").expect("loads"), Some(main_window()));

	assert!(store.remove("layout").expect("removes"));
	assert!(!store.remove("layout").expect("already gone"));
	assert_eq!(store.load::<Window>("layout").expect("gone"), None);
}

#[test]
fn prefs_dir_rejects_non_object_files() {
	let dir = tempfile::tempdir().expect("tempdir");
	let store = PrefsDir::new(dir.path());
	std::fs::write(store.path(Some("n")), encode(&Graph::new(Value::I32(5))).expect("encodes")).expect("writes");
	let err = store.load::<Window>("n").expect_err("int root");
	assert!(matches!(err, Error::PrefsNotObject { found: "i32", .. }));

	let mut table = store.open(None).expect("opens default table");
	table.set("k", "v");
	table.save().expect("saves");
	assert!(store.path(None).exists());
}
