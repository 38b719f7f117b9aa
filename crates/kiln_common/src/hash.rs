//! Hashes of round text and compiler settings.
//!
//! The source cache stores the hash of the text each parse was built from,
//! so a later round can tell a stale parse apart from an unchanged file
//! without keeping the old text around. Settings fingerprints reuse the same
//! hash over the serialized options.

use serde::{Deserialize, Serialize};
use std::fmt;

/// XXH3-128 digest of a file's text or of serialized settings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Hashes raw bytes. Settings fingerprints go through here.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(data).to_le_bytes())
    }

    /// Hashes the text of a source file as it appears in a round snapshot.
    pub fn of_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}

// Cache trace lines only need enough of the digest to tell entries apart.
impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
