//! The type-checking engine boundary and the reference engine.
//!
//! The harness drives any [`Engine`]: a batch build from a [`BuildRequest`]
//! seeded with the previous handle, or a long-lived [`WatchProgram`] fed by
//! change notifications. [`ReferenceEngine`] implements both for a small
//! TypeScript subset so the harness can be exercised end to end.

#![warn(missing_docs)]

pub mod api;
pub mod ast;
pub mod checker;
pub mod emitter;
pub mod error;
pub mod parser;
pub mod program;
pub mod reference;
pub mod resolver;
pub mod watch;

pub use api::{BuildRequest, EmitResult, Engine, OutputSink, Program, WatchProgram, WatchRequest};
pub use ast::ParsedSource;
pub use error::EngineError;
pub use program::ReferenceProgram;
pub use reference::ReferenceEngine;
pub use watch::ReferenceWatchProgram;
