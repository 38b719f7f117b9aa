//! Fingerprints of compilation settings.

use crate::error::CacheError;
use kiln_common::ContentHash;
use serde::Serialize;
use std::fmt;

/// A hash of the compilation settings active when an entry was produced.
///
/// Two settings values with the same serialized form share a fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct SettingsFingerprint(pub ContentHash);

impl SettingsFingerprint {
    /// Computes the fingerprint of any serializable settings value.
    pub fn of<T: Serialize + ?Sized>(settings: &T) -> Result<Self, CacheError> {
        let bytes = serde_json::to_vec(settings).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        Ok(Self(ContentHash::from_bytes(&bytes)))
    }
}

impl fmt::Display for SettingsFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
