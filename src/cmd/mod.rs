/// Format conversion command.
pub mod convert;
/// Decoded value dump command.
pub mod dump;
/// Buffer summary command.
pub mod info;
/// Prefs table editing command.
pub mod prefs;
pub(crate) mod util;
