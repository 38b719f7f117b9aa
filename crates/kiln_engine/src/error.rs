//! Error types for engine operations.

use kiln_cache::CacheError;
use kiln_watch::WatchError;

/// Failures of the engine itself, as opposed to diagnostics about the code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A watcher could not be registered.
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// The source cache failed for a reason other than a missing file.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The watch program was queried after being closed.
    #[error("watch program has been closed")]
    Closed,
}
