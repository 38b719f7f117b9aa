//! The virtual file store and round-to-round change detection.
//!
//! The store holds exactly one [`RoundSnapshot`] at a time. Applying the next
//! round's snapshot replaces it wholesale and reports which paths appeared and
//! which disappeared. Paths present in both rounds are never reported here,
//! even if their text changed: content-level staleness is decided by whoever
//! re-parses (see the source cache's `force_new` flag).

use std::collections::BTreeSet;

use crate::host::FileSystemHost;
use crate::snapshot::RoundSnapshot;

/// Result of comparing two round snapshots by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDiff {
    /// Paths present in the new snapshot but not the old one.
    pub created: BTreeSet<String>,
    /// Paths present in the old snapshot but not the new one.
    pub deleted: BTreeSet<String>,
}

impl FileDiff {
    /// Returns `true` if no path was created or deleted.
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty()
    }

    /// Returns the total number of created and deleted paths.
    pub fn len(&self) -> usize {
        self.created.len() + self.deleted.len()
    }
}

/// Computes the symmetric path difference between two snapshots.
///
/// `created = keys(new) \ keys(old)` and `deleted = keys(old) \ keys(new)`.
/// Neither snapshot is modified.
pub fn diff(old: &RoundSnapshot, new: &RoundSnapshot) -> FileDiff {
    let created = new
        .paths()
        .filter(|p| !old.contains(p))
        .map(str::to_string)
        .collect();
    let deleted = old
        .paths()
        .filter(|p| !new.contains(p))
        .map(str::to_string)
        .collect();
    FileDiff { created, deleted }
}

/// Holds the file mapping of the round currently being processed.
#[derive(Debug, Default)]
pub struct VirtualFileStore {
    current: RoundSnapshot,
}

impl VirtualFileStore {
    /// Creates an empty store. The first applied round reports every path as created.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current mapping with `next` and returns what changed.
    pub fn apply(&mut self, next: RoundSnapshot) -> FileDiff {
        let changes = diff(&self.current, &next);
        self.current = next;
        changes
    }

    /// Returns the current round's snapshot.
    pub fn current(&self) -> &RoundSnapshot {
        &self.current
    }
}

impl FileSystemHost for VirtualFileStore {
    fn file_exists(&self, path: &str) -> bool {
        self.current.contains(path)
    }

    fn read_file(&self, path: &str) -> Option<&str> {
        self.current.get(path).map(|record| record.content.as_ref())
    }
}
