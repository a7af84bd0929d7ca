use std::path::Path;

use super::Format;

#[test]
fn format_from_extension() {
	assert_eq!(Format::from_path(Path::new("settings.json")), Format::Json);
	assert_eq!(Format::from_path(Path::new("Info.PLIST")), Format::Plist);
	assert_eq!(Format::from_path(Path::new("prefs.bytes")), Format::Binmsg);
	assert_eq!(Format::from_path(Path::new("no_extension")), Format::Binmsg);
}
