#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use binmsg::msg::{Value, decode, encode_value};
use binmsg_testkit::{run, run_json, scratch_dir};
use serde_json::json;

fn bin() -> PathBuf {
	PathBuf::from(env!("CARGO_BIN_EXE_binmsg"))
}

fn arg(path: &Path) -> String {
	path.display().to_string()
}

fn ada_map() -> Value {
	Value::Map(vec![
		(Value::from("name"), Value::from("Ada")),
		(Value::from("tags"), Value::List(vec![Value::from("x"), Value::from("x"), Value::from("y")])),
		(Value::from("count"), Value::I32(42)),
	])
}

#[test]
fn info_json_reports_header_and_root() {
	let dir = scratch_dir();
	let path = dir.path().join("ada.bin");
	fs::write(&path, encode_value(&ada_map()).expect("encodes")).expect("write buffer");

	let json = run_json(&bin(), &["info", &arg(&path), "--json"]);
	assert_eq!(json["compression"], "none");
	assert_eq!(json["root"], "map[3]");
	assert_eq!(json["object_count"], 0);
	assert_eq!(json["string_hint"], 0);
	assert_eq!(json["payload_size"], json["file_size"]);
}

#[test]
fn dump_json_renders_scenario_value() {
	let dir = scratch_dir();
	let path = dir.path().join("ada.bin");
	fs::write(&path, encode_value(&ada_map()).expect("encodes")).expect("write buffer");

	let json = run_json(&bin(), &["dump", &arg(&path), "--json"]);
	assert_eq!(json, json!({ "name": "Ada", "tags": ["x", "x", "y"], "count": 42 }));
}

#[test]
fn convert_chain_through_json_and_plist_preserves_value() {
	let dir = scratch_dir();
	let source = dir.path().join("ada.bin");
	let as_json = dir.path().join("ada.json");
	let as_plist = dir.path().join("ada.plist");
	let back = dir.path().join("back.bin");
	fs::write(&source, encode_value(&ada_map()).expect("encodes")).expect("write buffer");

	for (from, to) in [(&source, &as_json), (&as_json, &as_plist), (&as_plist, &back)] {
		let output = run(&bin(), &["convert", &arg(from), &arg(to)]);
		assert!(output.status.success(), "convert failed: {}", String::from_utf8_lossy(&output.stderr));
	}

	let text = fs::read_to_string(&as_json).expect("json written");
	assert!(text.contains("\"Ada\""));
	assert!(fs::read(&as_plist).expect("plist written").starts_with(b"bplist00"));
	let graph = decode(&fs::read(&back).expect("binmsg written")).expect("decodes");
	assert_eq!(graph.root, ada_map());
}

#[test]
fn convert_honours_explicit_formats_and_compression() {
	let dir = scratch_dir();
	let source = dir.path().join("input.txt");
	let packed = dir.path().join("packed.out");
	fs::write(&source, r#"{"level": 3, "names": ["a", "b", "a"]}"#).expect("write json");

	let output = run(&bin(), &["convert", &arg(&source), &arg(&packed), "--from", "json", "--to", "binmsg", "--compress"]);
	assert!(output.status.success(), "convert failed: {}", String::from_utf8_lossy(&output.stderr));

	let json = run_json(&bin(), &["info", &arg(&packed), "--json"]);
	assert_eq!(json["compression"], "zstd");
	let json = run_json(&bin(), &["dump", &arg(&packed), "--json"]);
	assert_eq!(json, json!({ "level": 3, "names": ["a", "b", "a"] }));
}

#[test]
fn prefs_set_get_remove_list() {
	let dir = scratch_dir();
	let path = dir.path().join("prefs.bin");
	let file = arg(&path);

	for (key, value) in [("volume", "0.5"), ("name", "\"Ada\""), ("recent", "[\"a.txt\", \"b.txt\"]")] {
		let output = run(&bin(), &["prefs", &file, "set", key, value]);
		assert!(output.status.success(), "set {key} failed: {}", String::from_utf8_lossy(&output.stderr));
	}

	assert_eq!(run_json(&bin(), &["prefs", &file, "get", "name"]), json!("Ada"));
	assert_eq!(run_json(&bin(), &["prefs", &file, "get", "missing"]), json!(null));

	let output = run(&bin(), &["prefs", &file, "remove", "volume"]);
	assert!(output.status.success());

	let listed = run_json(&bin(), &["prefs", &file, "list", "--json"]);
	assert_eq!(listed, json!({ "name": "Ada", "recent": ["a.txt", "b.txt"] }));
}

#[test]
fn malformed_input_fails_with_error_prefix() {
	let dir = scratch_dir();
	let path = dir.path().join("broken.bin");
	// list of three with only one element present
	fs::write(&path, [0x00, 0x00, 0x83, 0x07, 0x01]).expect("write buffer");

	let output = run(&bin(), &["dump", &arg(&path)]);
	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.starts_with("error: decode: truncated buffer"), "stderr was {stderr:?}");
}
