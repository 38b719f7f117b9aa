//! Diagnostic data, per-round accumulation, and rendering.
//!
//! Type-checking, option, and emission problems are data, not failures. This
//! crate provides the structured [`Diagnostic`], the [`DiagnosticPhase`] it was
//! produced in, a [`DiagnosticSink`] that collects one round's results, and
//! [`DiagnosticRenderer`] implementations that format them for a terminal,
//! as compact one-liners, or as JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod phase;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::DiagnosticCode;
pub use diagnostic::Diagnostic;
pub use phase::DiagnosticPhase;
pub use renderer::{
    format_diagnostics, CompactRenderer, DiagnosticRenderer, JsonRenderer, TerminalRenderer,
};
pub use severity::Severity;
pub use sink::DiagnosticSink;
