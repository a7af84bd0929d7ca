//! Public library API for the BinMsg binary object-graph codec and its sibling formats.

/// BinMsg encoding and decoding, property lists, the JSON bridge, and the prefs store.
pub mod msg;
