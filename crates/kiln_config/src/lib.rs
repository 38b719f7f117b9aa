//! Parsing and validation of `kiln.toml` scenario files.
//!
//! A scenario names a base file set, the compiler options to build it with,
//! and a sequence of rounds that each mutate the base set. This crate reads the
//! file into a strongly-typed [`HarnessConfig`] and resolves every round into
//! an independent [`RoundSnapshot`](kiln_source::RoundSnapshot).

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, validate_config};
pub use resolve::{resolve_rounds, ResolvedRound};
pub use types::*;
