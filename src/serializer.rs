//! Snapshot encoding. Defaults to JSON via serde_json; [`BincodeSerializer`]
//! writes a compact binary snapshot and accepts keys JSON can't express.
//!
//! Implement [`Serializer`] if you need a different format (RON, MessagePack, etc.).

use crate::error::{Error, Result};
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Converts map snapshots to/from bytes for persistence.
pub trait Serializer {
    /// Encode a map to bytes.
    fn serialize<K, V>(&self, data: &HashMap<K, V>) -> Result<Vec<u8>>
    where
        K: Serialize,
        V: Serialize;

    /// Decode bytes back into a map. Anything that doesn't decode is
    /// [`Error::CorruptData`].
    fn deserialize<K, V>(&self, bytes: &[u8]) -> Result<HashMap<K, V>>
    where
        K: for<'de> Deserialize<'de> + Eq + std::hash::Hash,
        V: for<'de> Deserialize<'de>;

    /// Short format name, used in logs and `Debug` output.
    fn name(&self) -> &'static str;
}

/// JSON serializer with optional pretty-printing.
///
/// Keys have to serialize as JSON object keys: strings, integers, chars and
/// unit enum variants work, tuples and structs don't.
///
/// JSON has no NaN or infinity. serde_json writes non-finite floats as
/// `null`, so the flush succeeds but the snapshot no longer loads back into
/// an `f32`/`f64`. Use [`BincodeSerializer`] if you store such values.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with indentation, easier to read by hand.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn serialize<K, V>(&self, data: &HashMap<K, V>) -> Result<Vec<u8>>
    where
        K: Serialize,
        V: Serialize,
    {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(data)
        } else {
            serde_json::to_vec(data)
        };
        bytes.map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize<K, V>(&self, bytes: &[u8]) -> Result<HashMap<K, V>>
    where
        K: for<'de> Deserialize<'de> + Eq + std::hash::Hash,
        V: for<'de> Deserialize<'de>,
    {
        serde_json::from_slice(bytes).map_err(|e| Error::CorruptData(e.to_string()))
    }

    fn name(&self) -> &'static str {
        if self.pretty {
            "json-pretty"
        } else {
            "json"
        }
    }
}

/// Binary snapshot via bincode. Not self-describing, so a file written with
/// one `K`/`V` pair must be read back with the same types.
///
/// Bytes left over after the map decodes are rejected as corrupt.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeSerializer;

impl BincodeSerializer {
    /// Create a bincode serializer.
    pub fn new() -> Self {
        Self
    }
}

impl Serializer for BincodeSerializer {
    fn serialize<K, V>(&self, data: &HashMap<K, V>) -> Result<Vec<u8>>
    where
        K: Serialize,
        V: Serialize,
    {
        bincode_options()
            .serialize(data)
            .map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize<K, V>(&self, bytes: &[u8]) -> Result<HashMap<K, V>>
    where
        K: for<'de> Deserialize<'de> + Eq + std::hash::Hash,
        V: for<'de> Deserialize<'de>,
    {
        bincode_options()
            .deserialize(bytes)
            .map_err(|e| Error::CorruptData(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "bincode"
    }
}

// Fixed-width integers, same layout as `bincode::serialize`, but strict about
// trailing bytes.
fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}
