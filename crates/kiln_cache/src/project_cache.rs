//! Latest build handle per project key.

use std::collections::BTreeMap;
use tracing::debug;

/// Holds at most one build handle per project key.
///
/// The cache does not decide what is reusable; it only hands the previous
/// handle for a key back so the engine can do its own incremental reuse.
/// Keys are independent reuse chains.
#[derive(Debug)]
pub struct ProjectCache<H> {
    handles: BTreeMap<String, H>,
}

impl<H> Default for ProjectCache<H> {
    fn default() -> Self {
        Self {
            handles: BTreeMap::new(),
        }
    }
}

impl<H> ProjectCache<H> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle last stored under `key`.
    pub fn get(&self, key: &str) -> Option<&H> {
        self.handles.get(key)
    }

    /// Stores `handle` under `key`, returning the handle it replaced.
    pub fn put(&mut self, key: impl Into<String>, handle: H) -> Option<H> {
        let key = key.into();
        let previous = self.handles.insert(key.clone(), handle);
        debug!(project = %key, replaced = previous.is_some(), "project handle stored");
        previous
    }

    /// Removes and returns the handle under `key`.
    pub fn remove(&mut self, key: &str) -> Option<H> {
        self.handles.remove(key)
    }

    /// Iterates over the live project keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.handles.keys().map(String::as_str)
    }

    /// Number of live project keys.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if no handle is stored.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_latest_put() {
        let mut cache = ProjectCache::new();
        assert!(cache.get("A").is_none());
        assert_eq!(cache.put("A", 1), None);
        assert_eq!(cache.put("A", 2), Some(1));
        assert_eq!(cache.get("A"), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn keys_are_independent() {
        let mut cache = ProjectCache::new();
        cache.put("B", "b1");
        cache.put("A", "a1");
        cache.put("B", "b2");
        assert_eq!(cache.get("A"), Some(&"a1"));
        assert_eq!(cache.get("B"), Some(&"b2"));
        assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(cache.remove("A"), Some("a1"));
        assert!(!cache.is_empty());
    }
}
