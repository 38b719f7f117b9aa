//! Per-file parsed-representation cache keyed by path and settings fingerprint.

use crate::error::CacheError;
use crate::fingerprint::SettingsFingerprint;
use kiln_common::ContentHash;
use kiln_source::{FileSystemHost, SourceFile};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Cache key: a path plus the fingerprint of the settings it was parsed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    /// Absolute file path.
    pub path: String,
    /// Settings fingerprint, or `None` for settings-independent entries.
    pub fingerprint: Option<SettingsFingerprint>,
}

/// One cached parse.
#[derive(Debug)]
pub struct SourceCacheEntry<P> {
    /// The shared parsed representation.
    pub parsed: Rc<P>,
    /// Settings fingerprint the entry was produced under.
    pub fingerprint: Option<SettingsFingerprint>,
    /// Hash of the text that was parsed.
    pub content_hash: ContentHash,
}

/// Hit/miss counters for a [`SourceCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Lookups that parsed because no entry existed.
    pub misses: usize,
    /// Lookups that parsed over an existing entry because of `force_new`.
    pub replacements: usize,
}

/// Caches one parsed representation per `(path, fingerprint)`.
///
/// Entries are never evicted by size. A cached entry is returned as-is even
/// if the file's content has changed since; callers decide staleness and
/// pass `force_new` to replace it. The same path under two fingerprints is
/// two independent entries.
#[derive(Debug)]
pub struct SourceCache<P> {
    entries: HashMap<SourceKey, SourceCacheEntry<P>>,
    stats: CacheStats,
}

impl<P> Default for SourceCache<P> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }
}

impl<P> SourceCache<P> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached parse of `path`, parsing it with `parse` if needed.
    ///
    /// Fails with [`CacheError::NotFound`] if `path` is not in `host`, even
    /// when an entry for it is cached.
    pub fn get_or_parse(
        &mut self,
        host: &dyn FileSystemHost,
        path: &str,
        fingerprint: Option<SettingsFingerprint>,
        force_new: bool,
        parse: impl FnOnce(SourceFile) -> P,
    ) -> Result<Rc<P>, CacheError> {
        let Some(text) = host.read_file(path) else {
            return Err(CacheError::NotFound {
                path: path.to_string(),
            });
        };

        let key = SourceKey {
            path: path.to_string(),
            fingerprint,
        };
        let existing = match self.entries.get(&key) {
            Some(entry) if !force_new => {
                self.stats.hits += 1;
                debug!(path, "source cache hit");
                return Ok(Rc::clone(&entry.parsed));
            }
            entry => entry.is_some(),
        };

        let file = SourceFile::new(path, text);
        let content_hash = file.content_hash;
        let parsed = Rc::new(parse(file));
        if existing {
            self.stats.replacements += 1;
            debug!(path, "source cache replace");
        } else {
            self.stats.misses += 1;
            debug!(path, "source cache miss");
        }
        self.entries.insert(
            key,
            SourceCacheEntry {
                parsed: Rc::clone(&parsed),
                fingerprint,
                content_hash,
            },
        );
        Ok(parsed)
    }

    /// Returns the cached entry for `(path, fingerprint)` without parsing.
    pub fn peek(
        &self,
        path: &str,
        fingerprint: Option<SettingsFingerprint>,
    ) -> Option<&SourceCacheEntry<P>> {
        self.entries.get(&SourceKey {
            path: path.to_string(),
            fingerprint,
        })
    }

    /// Returns `true` if the cached entry no longer matches the text in `host`.
    ///
    /// A missing entry or a file absent from `host` counts as stale.
    pub fn is_stale(
        &self,
        host: &dyn FileSystemHost,
        path: &str,
        fingerprint: Option<SettingsFingerprint>,
    ) -> bool {
        match (self.peek(path, fingerprint), host.read_file(path)) {
            (Some(entry), Some(text)) => entry.content_hash != ContentHash::of_text(text),
            _ => true,
        }
    }

    /// Drops every entry for `path`, across all fingerprints.
    pub fn invalidate(&mut self, path: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.path != path);
        before - self.entries.len()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookup counters since creation.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
