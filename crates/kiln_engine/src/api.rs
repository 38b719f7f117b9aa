//! The contract between the harness and a type-checking engine.

use crate::error::EngineError;
use kiln_cache::SourceCache;
use kiln_config::CompilerOptions;
use kiln_diagnostics::Diagnostic;
use kiln_source::FileSystemHost;
use kiln_watch::WatchRegistry;

/// Destination of emitted files.
///
/// Implementations standing in for a real disk must only write when the
/// bytes differ from what was previously written at `path`.
pub trait OutputSink {
    /// Writes `text` to `path`.
    fn write_output(&mut self, path: &str, text: &str);
}

/// Everything a batch build needs.
pub struct BuildRequest<'a, P, H> {
    /// Root files in order.
    pub root_paths: &'a [String],
    /// Active compilation settings.
    pub options: &'a CompilerOptions,
    /// The current round's files.
    pub host: &'a dyn FileSystemHost,
    /// Shared parsed-file cache.
    pub sources: &'a mut SourceCache<P>,
    /// The previous handle for the same project key, as a reuse hint.
    pub previous: Option<&'a H>,
}

/// Everything needed to start a watch program.
pub struct WatchRequest<'a, P> {
    /// Root files in order.
    pub root_paths: &'a [String],
    /// Active compilation settings.
    pub options: &'a CompilerOptions,
    /// The current round's files.
    pub host: &'a dyn FileSystemHost,
    /// Shared parsed-file cache.
    pub sources: &'a mut SourceCache<P>,
    /// Registry the program subscribes its own watchers in.
    pub registry: &'a WatchRegistry,
}

/// Result of emitting one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitResult {
    /// Emit-phase diagnostics.
    pub diagnostics: Vec<Diagnostic>,
    /// Output paths handed to the sink.
    pub emitted: Vec<String>,
    /// `true` if the file produces no output (declaration files, unknown paths).
    pub skipped: bool,
}

/// A built program: the handle returned by a build and its diagnostics accessors.
pub trait Program {
    /// Root files the program was built from.
    fn root_paths(&self) -> &[String];

    /// Every file in the program, roots and their imports.
    fn source_paths(&self) -> Vec<&str>;

    /// Problems with the compilation settings.
    fn options_diagnostics(&self) -> Vec<Diagnostic>;

    /// Problems not tied to one file.
    fn global_diagnostics(&self) -> Vec<Diagnostic>;

    /// Parse problems in `path`.
    fn syntactic_diagnostics(&self, path: &str) -> Vec<Diagnostic>;

    /// Type and resolution problems in `path`.
    fn semantic_diagnostics(&self, path: &str) -> Vec<Diagnostic>;

    /// Emits the output for `path` into `sink`.
    fn emit(&self, path: &str, sink: &mut dyn OutputSink) -> EmitResult;
}

/// A long-lived program that rebuilds from change notifications.
pub trait WatchProgram {
    /// Parsed representation stored in the source cache.
    type Parsed;
    /// The program type handed out by [`program`](WatchProgram::program).
    type Handle: Program;

    /// Replaces the root file list. Unchanged roots do not trigger a rebuild.
    fn update_root_file_names(&mut self, roots: &[String]);

    /// Returns the current program, rebuilding first if notifications or
    /// root changes arrived since the last build.
    fn program(
        &mut self,
        host: &dyn FileSystemHost,
        sources: &mut SourceCache<Self::Parsed>,
    ) -> Result<&Self::Handle, EngineError>;

    /// Closes every watcher the program registered.
    fn close(&mut self);
}

/// A type-checking engine the harness can drive.
pub trait Engine {
    /// Parsed representation stored in the source cache.
    type Parsed;
    /// Reusable build state.
    type Handle: Program;
    /// Watch-mode program.
    type Watch: WatchProgram<Parsed = Self::Parsed, Handle = Self::Handle>;

    /// Builds a program from scratch, reusing what `request.previous` allows.
    fn build(
        &self,
        request: BuildRequest<'_, Self::Parsed, Self::Handle>,
    ) -> Result<Self::Handle, EngineError>;

    /// Starts a watch program and performs its initial build.
    fn create_watch_program(
        &self,
        request: WatchRequest<'_, Self::Parsed>,
    ) -> Result<Self::Watch, EngineError>;
}
