//! Per-round diagnostic accumulator.

use crate::diagnostic::Diagnostic;
use crate::phase::DiagnosticPhase;

/// Collects one round's diagnostics in the order the phases produced them.
///
/// The harness is single-threaded, so this is a plain vector with a running
/// error count. A round owns its sink and consumes it when reporting.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    errors: usize,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one diagnostic.
    pub fn emit(&mut self, diag: Diagnostic) {
        if diag.severity.is_error() {
            self.errors += 1;
        }
        self.diagnostics.push(diag);
    }

    /// Appends every diagnostic from `diags`, preserving order.
    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.emit(diag);
        }
    }

    /// Returns `true` if any error was emitted.
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Number of diagnostics from `phase`.
    pub fn phase_count(&self, phase: DiagnosticPhase) -> usize {
        self.diagnostics.iter().filter(|d| d.phase == phase).count()
    }

    /// Number of diagnostics held.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns `true` if nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The diagnostics emitted so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the sink, returning its diagnostics in emission order.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::DiagnosticCode;
    use crate::severity::Severity;

    fn missing_module() -> Diagnostic {
        Diagnostic::error(
            DiagnosticPhase::Semantic,
            DiagnosticCode::CANNOT_FIND_MODULE,
            "Cannot find module './b' or its corresponding type declarations.",
        )
    }

    fn emit_warning() -> Diagnostic {
        Diagnostic::warning(
            DiagnosticPhase::Emit,
            DiagnosticCode::OVERWRITES_INPUT,
            "output skipped",
        )
    }

    #[test]
    fn empty_sink() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        assert!(sink.is_empty());
        assert!(sink.into_diagnostics().is_empty());
    }

    #[test]
    fn warnings_are_not_errors() {
        let mut sink = DiagnosticSink::new();
        sink.emit(emit_warning());
        assert!(!sink.has_errors());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn extend_preserves_order_and_counts_phases() {
        let mut sink = DiagnosticSink::new();
        sink.extend([emit_warning(), missing_module(), missing_module()]);
        assert_eq!(sink.diagnostics()[0].severity, Severity::Warning);
        assert_eq!(sink.error_count(), 2);
        assert_eq!(sink.phase_count(DiagnosticPhase::Semantic), 2);
        assert_eq!(sink.phase_count(DiagnosticPhase::Syntactic), 0);
        assert_eq!(sink.into_diagnostics().len(), 3);
    }
}
