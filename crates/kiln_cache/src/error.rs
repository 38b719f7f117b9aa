//! Error types for cache operations.

/// Errors that can occur during cache operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The requested path does not exist in the current file store.
    #[error("file '{path}' not found")]
    NotFound {
        /// The path that was requested.
        path: String,
    },

    /// Compilation settings could not be serialized for fingerprinting.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_found() {
        let err = CacheError::NotFound {
            path: "/module/b.d.ts".to_string(),
        };
        assert_eq!(format!("{err}"), "file '/module/b.d.ts' not found");
    }

    #[test]
    fn display_serialization() {
        let err = CacheError::Serialization {
            reason: "key must be a string".to_string(),
        };
        assert_eq!(format!("{err}"), "serialization error: key must be a string");
    }
}
