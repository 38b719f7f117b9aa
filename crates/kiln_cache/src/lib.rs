//! Harness-lifetime caches shared by every round.
//!
//! [`SourceCache`] holds one parsed representation per file path and settings
//! fingerprint; [`ProjectCache`] holds the latest build handle per project key
//! so the next round's build can be seeded with it. Both are constructed once
//! and passed explicitly to whoever needs them.

#![warn(missing_docs)]

pub mod error;
pub mod fingerprint;
pub mod project_cache;
pub mod source_cache;

pub use error::CacheError;
pub use fingerprint::SettingsFingerprint;
pub use project_cache::ProjectCache;
pub use source_cache::{CacheStats, SourceCache, SourceCacheEntry, SourceKey};
