//! Error types for round driving.

use kiln_engine::EngineError;

/// Failures that stop a run. Diagnostics never end up here.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DriverError {
    /// The engine failed in a way that leaves no usable program.
    #[error("round {round} aborted: {source}")]
    Fatal {
        /// Zero-based index of the round that failed.
        round: usize,
        /// What went wrong.
        #[source]
        source: EngineError,
    },
}
