//! Diagnostic rendering backends for human-readable and machine-readable output.

use crate::diagnostic::Diagnostic;
use kiln_source::{FileSystemHost, ResolvedSpan, SourceFile};

/// Trait for rendering diagnostics into formatted output strings.
///
/// The host is the file store of the round that produced the diagnostic; it
/// is used to turn byte spans into line/column positions and source excerpts.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic, host: &dyn FileSystemHost) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[TS2307]: Cannot find module './module/b' or its corresponding type declarations.
///   --> /a.ts:1:20
///   |
/// 1 | import * as b from "./module/b";
///   |                    ^^^^^^^^^^^^
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        if self.color {
            let color = if diag.severity.is_error() { "31" } else { "33" };
            format!(
                "\x1b[1;{color}m{}[{}]\x1b[0m\x1b[1m: {}\x1b[0m\n",
                diag.severity, diag.code, diag.message
            )
        } else {
            format!("{}[{}]: {}\n", diag.severity, diag.code, diag.message)
        }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, host: &dyn FileSystemHost) -> String {
        let mut out = self.header(diag);

        match (&diag.file, diag.span, load(diag, host)) {
            (Some(_), Some(span), Some(file)) => {
                let resolved = file.resolve_span(span);
                out.push_str(&format!("  --> {resolved}\n"));

                let line_num = resolved.start_line.to_string();
                let padding = " ".repeat(line_num.len());
                let line_content = file.line_text(span.start);

                out.push_str(&format!("{padding} |\n"));
                out.push_str(&format!("{line_num} | {line_content}\n"));

                // Underline, clipped to the first line of the span.
                let line_rest = line_content
                    .len()
                    .saturating_sub((resolved.start_col as usize).saturating_sub(1));
                let span_len = (span.len() as usize).min(line_rest).max(1);
                let carets = "^".repeat(span_len);
                let col_padding = " ".repeat((resolved.start_col as usize).saturating_sub(1));
                out.push_str(&format!("{padding} | {col_padding}{carets}\n"));
            }
            (Some(path), _, _) => {
                out.push_str(&format!("  --> {path}\n"));
            }
            _ => {}
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        out
    }
}

/// Renders one diagnostic per line in the `path(line,col): error TS1234: msg` form.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompactRenderer;

impl DiagnosticRenderer for CompactRenderer {
    fn render(&self, diag: &Diagnostic, host: &dyn FileSystemHost) -> String {
        let prefix = match (&diag.file, position(diag, host)) {
            (Some(_), Some(resolved)) => format!(
                "{}({},{}): ",
                resolved.file_path, resolved.start_line, resolved.start_col
            ),
            (Some(path), None) => format!("{path}: "),
            (None, _) => String::new(),
        };
        format!(
            "{prefix}{} {}: {}",
            diag.severity, diag.code, diag.message
        )
    }
}

/// Renders each diagnostic as a single JSON object.
///
/// Positions are included as 1-indexed `line`/`column` fields when the span
/// can be resolved against the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic, host: &dyn FileSystemHost) -> String {
        let mut value = match serde_json::to_value(diag) {
            Ok(value) => value,
            Err(_) => return String::from("{}"),
        };
        if let (Some(resolved), Some(obj)) = (position(diag, host), value.as_object_mut()) {
            obj.insert("line".into(), resolved.start_line.into());
            obj.insert("column".into(), resolved.start_col.into());
        }
        value.to_string()
    }
}

/// Renders every diagnostic with `renderer`, one entry per line.
pub fn format_diagnostics(
    diags: &[Diagnostic],
    renderer: &dyn DiagnosticRenderer,
    host: &dyn FileSystemHost,
) -> String {
    let mut out = String::new();
    for diag in diags {
        let rendered = renderer.render(diag, host);
        out.push_str(rendered.trim_end_matches('\n'));
        out.push('\n');
    }
    out
}

fn load(diag: &Diagnostic, host: &dyn FileSystemHost) -> Option<SourceFile> {
    let path = diag.file.as_deref()?;
    let text = host.read_file(path)?;
    Some(SourceFile::new(path, text))
}

fn position(diag: &Diagnostic, host: &dyn FileSystemHost) -> Option<ResolvedSpan> {
    let span = diag.span?;
    let file = load(diag, host)?;
    Some(file.resolve_span(span))
}
