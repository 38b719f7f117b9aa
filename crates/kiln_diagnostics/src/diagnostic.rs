//! Structured diagnostic messages.

use crate::code::DiagnosticCode;
use crate::phase::DiagnosticPhase;
use crate::severity::Severity;
use kiln_source::Span;
use serde::{Deserialize, Serialize};

/// A single problem reported by a build.
///
/// Diagnostics are produced fresh each round and never carried across rounds.
/// `file` is `None` for global and options diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The category of this diagnostic.
    pub severity: Severity,
    /// The numeric code identifying the kind of problem.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The build phase that produced it.
    pub phase: DiagnosticPhase,
    /// The file the problem is in, if it is tied to one.
    pub file: Option<String>,
    /// The byte range within `file`, if known.
    pub span: Option<Span>,
    /// Explanatory footnotes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic not yet tied to a file.
    pub fn error(phase: DiagnosticPhase, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, phase, code, message)
    }

    /// Creates a new warning diagnostic not yet tied to a file.
    pub fn warning(
        phase: DiagnosticPhase,
        code: DiagnosticCode,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, phase, code, message)
    }

    fn new(
        severity: Severity,
        phase: DiagnosticPhase,
        code: DiagnosticCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            phase,
            file: None,
            span: None,
            notes: Vec::new(),
        }
    }

    /// Attaches the diagnostic to a location in `file`.
    pub fn at(mut self, file: impl Into<String>, span: Span) -> Self {
        self.file = Some(file.into());
        self.span = Some(span);
        self
    }

    /// Attaches the diagnostic to `file` without a specific location.
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Returns `true` if the diagnostic is not tied to a file.
    pub fn is_global(&self) -> bool {
        self.file.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_error() {
        let diag = Diagnostic::error(
            DiagnosticPhase::Global,
            DiagnosticCode::FILE_NOT_FOUND,
            "File '/x.ts' not found.",
        );
        assert_eq!(diag.severity, Severity::Error);
        assert!(diag.is_global());
        assert_eq!(format!("{}", diag.code), "TS6053");
    }

    #[test]
    fn at_attaches_location() {
        let diag = Diagnostic::error(
            DiagnosticPhase::Semantic,
            DiagnosticCode::CANNOT_FIND_MODULE,
            "Cannot find module './module/b' or its corresponding type declarations.",
        )
        .at("/a.ts", Span::new(19, 31));
        assert_eq!(diag.file.as_deref(), Some("/a.ts"));
        assert_eq!(diag.span, Some(Span::new(19, 31)));
        assert!(!diag.is_global());
    }

    #[test]
    fn builder_notes() {
        let diag = Diagnostic::warning(
            DiagnosticPhase::Emit,
            DiagnosticCode::OVERWRITES_INPUT,
            "overwrite",
        )
        .in_file("/a.ts")
        .with_note("outDir points into the sources");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.notes.len(), 1);
        assert!(diag.span.is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let diag = Diagnostic::error(
            DiagnosticPhase::Syntactic,
            DiagnosticCode::STATEMENT_EXPECTED,
            "Declaration or statement expected.",
        )
        .at("/a.ts", Span::new(0, 3));
        let json = serde_json::to_string(&diag).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(diag, back);
    }
}
