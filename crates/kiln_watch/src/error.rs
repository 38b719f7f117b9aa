//! Error types for watch registration.

/// Programmer errors raised by [`WatchRegistry`](crate::WatchRegistry).
///
/// These are not diagnostics: a caller that triggers one has a bug and the
/// current run should stop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatchError {
    /// A file watcher already exists for this exact path.
    #[error("file '{path}' is already being watched")]
    DuplicateFileWatcher {
        /// The watched path.
        path: String,
    },

    /// A directory watcher already exists for this exact path.
    #[error("directory '{path}' is already being watched")]
    DuplicateDirectoryWatcher {
        /// The watched path.
        path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_duplicates() {
        let err = WatchError::DuplicateFileWatcher {
            path: "/a.ts".to_string(),
        };
        assert_eq!(format!("{err}"), "file '/a.ts' is already being watched");
        let err = WatchError::DuplicateDirectoryWatcher {
            path: "/m".to_string(),
        };
        assert_eq!(format!("{err}"), "directory '/m' is already being watched");
    }
}
