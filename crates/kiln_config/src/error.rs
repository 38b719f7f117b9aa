//! Error types for scenario loading and validation.

/// Errors that can occur when loading or validating a `kiln.toml` scenario.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the scenario file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A round removes a path that is not part of the base file set.
    #[error("round '{round}' removes unknown file '{path}'")]
    UnknownFile {
        /// The name of the offending round.
        round: String,
        /// The path that was not found.
        path: String,
    },

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
