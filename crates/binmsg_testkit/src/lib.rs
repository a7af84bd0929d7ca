//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Fresh temporary directory removed on drop.
pub fn scratch_dir() -> tempfile::TempDir {
	tempfile::Builder::new().prefix("binmsg-test-").tempdir().expect("create scratch dir")
}

/// Lowercase hex with a space between bytes, e.g. `"00 00 2a"`.
pub fn hex(bytes: &[u8]) -> String {
	bytes.iter().map(|byte| format!("{byte:02x}")).collect::<Vec<_>>().join(" ")
}

/// Parse whitespace-separated hex bytes.
pub fn unhex(text: &str) -> Vec<u8> {
	text.split_whitespace()
		.map(|pair| u8::from_str_radix(pair, 16).unwrap_or_else(|_| panic!("bad hex byte {pair:?}")))
		.collect()
}

/// Every strict prefix of `bytes`, shortest first.
pub fn truncations(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
	(0..bytes.len()).map(move |len| &bytes[..len])
}

/// Run a binary and return its raw output.
pub fn run(bin: &Path, args: &[&str]) -> Output {
	Command::new(bin).args(args).output().expect("command executes")
}

/// Run a binary, assert success, and parse stdout as JSON.
pub fn run_json(bin: &Path, args: &[&str]) -> serde_json::Value {
	let output = run(bin, args);
	assert!(
		output.status.success(),
		"{} failed with status={}: {}",
		bin.display(),
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}
