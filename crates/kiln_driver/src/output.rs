//! In-memory output sink that only writes changed bytes.

use kiln_engine::OutputSink;
use std::collections::BTreeMap;
use tracing::debug;

/// Stands in for the output directory on disk.
///
/// A write whose text equals what is already stored at the path is dropped,
/// so anything watching emitted files sees no change.
#[derive(Debug, Default)]
pub struct DedupOutputSink {
    files: BTreeMap<String, String>,
    writes: usize,
    skipped: usize,
}

impl DedupOutputSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last text written to `path`.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Every written path with its current text, sorted by path.
    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, t)| (p.as_str(), t.as_str()))
    }

    /// Writes that changed stored bytes.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Writes dropped because the bytes were unchanged.
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }
}

impl OutputSink for DedupOutputSink {
    fn write_output(&mut self, path: &str, text: &str) {
        if self.files.get(path).is_some_and(|existing| existing == text) {
            self.skipped += 1;
            debug!(path, "output unchanged");
            return;
        }
        self.files.insert(path.to_string(), text.to_string());
        self.writes += 1;
        debug!(path, bytes = text.len(), "output written");
    }
}
