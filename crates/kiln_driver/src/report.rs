//! Per-round results and their textual rendering.

use kiln_config::BuildMode;
use kiln_diagnostics::{format_diagnostics, Diagnostic, DiagnosticRenderer};
use kiln_source::{FileDiff, FileSystemHost};

/// Everything one round produced.
///
/// Diagnostics are the complete, independent result of this round's file
/// state; nothing is carried over from earlier rounds.
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// Zero-based round index.
    pub index: usize,
    /// Round display name.
    pub name: String,
    /// Project key the round ran under.
    pub project: String,
    /// How the round was driven.
    pub mode: BuildMode,
    /// Paths created and deleted relative to the previous round.
    pub diff: FileDiff,
    /// Paths present in both rounds whose content differs.
    pub changed: Vec<String>,
    /// Watcher callbacks invoked while notifying the changes.
    pub notifications: usize,
    /// Options, global, syntactic, semantic and emit diagnostics, in that order.
    pub diagnostics: Vec<Diagnostic>,
    /// `true` if emission was skipped because of earlier diagnostics.
    pub emit_skipped: bool,
    /// Output paths handed to the sink.
    pub emitted: Vec<String>,
}

impl RoundReport {
    /// Number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_error())
            .count()
    }

    /// Returns `true` if the round produced any error.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Diagnostic code numbers in report order.
    pub fn codes(&self) -> Vec<u32> {
        self.diagnostics.iter().map(|d| d.code.number()).collect()
    }

    /// Renders the `ROUND <i> START` header followed by the diagnostics, if any.
    ///
    /// `host` must hold the files of this round for spans to resolve.
    pub fn render(&self, renderer: &dyn DiagnosticRenderer, host: &dyn FileSystemHost) -> String {
        let mut out = format!("ROUND {} START\n", self.index);
        if !self.diagnostics.is_empty() {
            out.push_str(&format_diagnostics(&self.diagnostics, renderer, host));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_diagnostics::{CompactRenderer, DiagnosticCode, DiagnosticPhase};
    use kiln_source::VirtualFileStore;

    fn report(diagnostics: Vec<Diagnostic>) -> RoundReport {
        RoundReport {
            index: 1,
            name: "deleted".into(),
            project: "default".into(),
            mode: BuildMode::Watch,
            diff: FileDiff::default(),
            changed: Vec::new(),
            notifications: 0,
            diagnostics,
            emit_skipped: false,
            emitted: Vec::new(),
        }
    }

    #[test]
    fn clean_round_renders_header_only() {
        let out = report(Vec::new()).render(&CompactRenderer, &VirtualFileStore::new());
        assert_eq!(out, "ROUND 1 START\n");
    }

    #[test]
    fn diagnostics_follow_header() {
        let diag = Diagnostic::error(
            DiagnosticPhase::Global,
            DiagnosticCode::FILE_NOT_FOUND,
            "File '/a.ts' not found.",
        );
        let r = report(vec![diag]);
        assert_eq!(r.error_count(), 1);
        assert_eq!(r.codes(), vec![6053]);
        let out = r.render(&CompactRenderer, &VirtualFileStore::new());
        assert_eq!(out, "ROUND 1 START\nerror TS6053: File '/a.ts' not found.\n");
    }
}
