//! Immutable per-round file mappings.

use std::collections::BTreeMap;
use std::sync::Arc;

/// A single file in a round: its absolute path and full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute, case-sensitive path.
    pub path: String,
    /// The file's text.
    pub content: Arc<str>,
}

impl FileRecord {
    /// Creates a record for `path` with the given content.
    pub fn new(path: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// The complete file set of one round.
///
/// A snapshot is never merged into the previous one: applying it to a
/// [`VirtualFileStore`](crate::VirtualFileStore) replaces the whole mapping.
/// The builder methods consume `self` and return a new snapshot, so a
/// snapshot that has been handed to a round cannot change underneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundSnapshot {
    files: BTreeMap<String, FileRecord>,
}

impl RoundSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from `(path, content)` pairs. Later duplicates win.
    pub fn from_pairs<P, C, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<Arc<str>>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |snapshot, (path, content)| {
                snapshot.with_file(path, content)
            })
    }

    /// Returns a snapshot with `path` added or replaced.
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        let record = FileRecord::new(path, content);
        self.files.insert(record.path.clone(), record);
        self
    }

    /// Returns a snapshot with `path` removed. Removing an absent path is a no-op.
    pub fn without_file(mut self, path: &str) -> Self {
        self.files.remove(path);
        self
    }

    /// Returns the record at `path`, if present.
    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.files.get(path)
    }

    /// Returns `true` if `path` is part of this snapshot.
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Iterates over all paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Iterates over all records in path order.
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.values()
    }

    /// Returns the number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the snapshot holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_adds_and_removes() {
        let snap = RoundSnapshot::new()
            .with_file("/a.ts", "a")
            .with_file("/b.ts", "b")
            .without_file("/a.ts");
        assert!(!snap.contains("/a.ts"));
        assert_eq!(snap.get("/b.ts").unwrap().content.as_ref(), "b");
        assert_eq!(snap.len(), 1);
    }

    #[test]
    fn from_pairs_later_duplicate_wins() {
        let snap = RoundSnapshot::from_pairs([("/a.ts", "one"), ("/a.ts", "two")]);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.get("/a.ts").unwrap().content.as_ref(), "two");
    }

    #[test]
    fn paths_are_sorted() {
        let snap = RoundSnapshot::from_pairs([("/z.ts", ""), ("/a.ts", ""), ("/m/b.ts", "")]);
        let paths: Vec<&str> = snap.paths().collect();
        assert_eq!(paths, vec!["/a.ts", "/m/b.ts", "/z.ts"]);
    }

    #[test]
    fn removing_absent_path_is_noop() {
        let snap = RoundSnapshot::from_pairs([("/a.ts", "")]).without_file("/missing.ts");
        assert_eq!(snap.len(), 1);
    }
}
