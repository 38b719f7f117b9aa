//! Source text with line-start indexing for fast line/column lookup.

use std::sync::Arc;

use kiln_common::ContentHash;

use crate::resolved_span::ResolvedSpan;
use crate::span::Span;

/// The text of one file as read at parse time.
///
/// Stores the content along with precomputed line-start offsets for
/// diagnostic rendering and a content hash the caches compare against the
/// store to detect stale parses.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// The absolute path this text was read from.
    pub path: String,
    /// The full text content of the file.
    pub content: Arc<str>,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
    /// Hash of the file content.
    pub content_hash: ContentHash,
}

impl SourceFile {
    /// Creates a new `SourceFile` with precomputed line starts and content hash.
    pub fn new(path: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        let content = content.into();
        let line_starts = compute_line_starts(&content);
        let content_hash = ContentHash::of_text(&content);
        Self {
            path: path.into(),
            content,
            line_starts,
            content_hash,
        }
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Returns the text between byte offsets.
    pub fn snippet(&self, span: Span) -> &str {
        &self.content[span.start as usize..span.end as usize]
    }

    /// Returns the full line containing `byte_offset`, without its newline.
    pub fn line_text(&self, byte_offset: u32) -> &str {
        let offset = (byte_offset as usize).min(self.content.len());
        let start = self.content[..offset].rfind('\n').map_or(0, |pos| pos + 1);
        let end = self.content[offset..]
            .find('\n')
            .map_or(self.content.len(), |pos| offset + pos);
        &self.content[start..end]
    }

    /// Resolves a span in this file to line/column coordinates.
    pub fn resolve_span(&self, span: Span) -> ResolvedSpan {
        let (start_line, start_col) = self.line_col(span.start);
        let (end_line, end_col) = self.line_col(span.end.saturating_sub(1).max(span.start));
        ResolvedSpan {
            file_path: self.path.clone(),
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Iterates over `(line_start_offset, line_text)` pairs.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &str)> {
        self.line_starts.iter().map(move |&start| {
            let rest = &self.content[start as usize..];
            let line = rest.split('\n').next().unwrap_or("");
            (start, line.strip_suffix('\r').unwrap_or(line))
        })
    }
}

/// Computes the byte offsets of each line start in the given content.
fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}
