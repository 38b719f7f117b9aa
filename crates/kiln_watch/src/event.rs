//! Event and subscription kinds.

use std::fmt;

/// What happened to a watched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchEventKind {
    /// The file appeared.
    Created,
    /// The file's content changed.
    Changed,
    /// The file disappeared.
    Deleted,
}

impl fmt::Display for WatchEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchEventKind::Created => write!(f, "Created"),
            WatchEventKind::Changed => write!(f, "Changed"),
            WatchEventKind::Deleted => write!(f, "Deleted"),
        }
    }
}

/// The namespace a subscription lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchKind {
    /// A watch on one exact file path.
    File,
    /// A watch on a directory, optionally covering all descendants.
    Directory,
}

impl fmt::Display for WatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchKind::File => write!(f, "file"),
            WatchKind::Directory => write!(f, "directory"),
        }
    }
}
