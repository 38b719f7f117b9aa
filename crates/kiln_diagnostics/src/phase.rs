//! The build phase a diagnostic was produced in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which diagnostics accessor of a build produced a diagnostic.
///
/// Declaration order is the order a round queries them in.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticPhase {
    /// Problems with the compilation settings themselves.
    Options,
    /// Program-wide problems not tied to one file.
    Global,
    /// Per-file parse errors.
    Syntactic,
    /// Per-file type and resolution errors.
    Semantic,
    /// Problems writing output files.
    Emit,
}

impl fmt::Display for DiagnosticPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticPhase::Options => "options",
            DiagnosticPhase::Global => "global",
            DiagnosticPhase::Syntactic => "syntactic",
            DiagnosticPhase::Semantic => "semantic",
            DiagnosticPhase::Emit => "emit",
        };
        f.write_str(name)
    }
}
