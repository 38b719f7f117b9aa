//! Virtual file store, round snapshots, and source text with span tracking.
//!
//! This crate provides the [`VirtualFileStore`] holding the current round's
//! path → content mapping and computing created/deleted diffs between rounds,
//! the [`FileSystemHost`] capability interface the type-checking engine reads
//! through, and [`SourceFile`]/[`Span`] for resolving byte offsets to
//! line/column coordinates in diagnostics.

#![warn(missing_docs)]

pub mod file_store;
pub mod host;
pub mod resolved_span;
pub mod snapshot;
pub mod source_file;
pub mod span;

pub use file_store::{diff, FileDiff, VirtualFileStore};
pub use host::{Capability, FileSystemHost};
pub use resolved_span::ResolvedSpan;
pub use snapshot::{FileRecord, RoundSnapshot};
pub use source_file::SourceFile;
pub use span::Span;
