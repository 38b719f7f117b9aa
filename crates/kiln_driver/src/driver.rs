//! The per-round state machine.

use crate::error::DriverError;
use crate::output::DedupOutputSink;
use crate::report::RoundReport;
use kiln_cache::{ProjectCache, SourceCache};
use kiln_config::{BuildMode, CompilerOptions, HarnessSettings, ResolvedRound};
use kiln_diagnostics::{Diagnostic, DiagnosticRenderer, DiagnosticSink};
use kiln_engine::{BuildRequest, Engine, Program, WatchProgram, WatchRequest};
use kiln_source::{RoundSnapshot, VirtualFileStore};
use kiln_watch::{WatchEventKind, WatchRegistry};
use tracing::{debug, info, info_span, warn};

/// Whether emission runs when earlier phases reported diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitPolicy {
    /// Skip emission if any diagnostic was reported before the emit phase.
    SkipOnError,
    /// Always emit.
    Always,
}

impl EmitPolicy {
    /// Maps the `emit_on_error` configuration flag to a policy.
    pub fn from_emit_on_error(emit_on_error: bool) -> Self {
        if emit_on_error {
            EmitPolicy::Always
        } else {
            EmitPolicy::SkipOnError
        }
    }
}

/// How a [`RoundDriver`] runs rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSettings {
    /// Watch or batch.
    pub mode: BuildMode,
    /// Emission policy.
    pub emit_policy: EmitPolicy,
}

impl From<&HarnessSettings> for DriverSettings {
    fn from(settings: &HarnessSettings) -> Self {
        Self {
            mode: settings.mode,
            emit_policy: EmitPolicy::from_emit_on_error(settings.emit_on_error),
        }
    }
}

/// Where the driver is in its per-round state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// No round has started.
    Init,
    /// Applying the round's file set to the store.
    Mutate,
    /// Delivering change notifications (watch mode).
    Notify,
    /// Looking up the previous handle (batch mode).
    Seed,
    /// Building and collecting diagnostics.
    Build,
    /// The round finished; its report was produced.
    Report,
    /// The run is over and the watch program closed.
    Done,
}

/// Drives an [`Engine`] through a sequence of rounds.
///
/// The file store, watch registry, source cache and project cache live as
/// long as the driver and are shared by every round and project key.
pub struct RoundDriver<E: Engine> {
    engine: E,
    settings: DriverSettings,
    store: VirtualFileStore,
    registry: WatchRegistry,
    sources: SourceCache<E::Parsed>,
    projects: ProjectCache<E::Handle>,
    watch: Option<E::Watch>,
    watch_options: Option<CompilerOptions>,
    output: DedupOutputSink,
    state: RoundState,
}

impl<E: Engine> RoundDriver<E> {
    /// Creates a driver with empty caches and an empty file store.
    pub fn new(engine: E, settings: DriverSettings) -> Self {
        Self {
            engine,
            settings,
            store: VirtualFileStore::new(),
            registry: WatchRegistry::new(),
            sources: SourceCache::new(),
            projects: ProjectCache::new(),
            watch: None,
            watch_options: None,
            output: DedupOutputSink::new(),
            state: RoundState::Init,
        }
    }

    /// Runs every round in order, stopping at the first fatal error.
    ///
    /// The watch program, if any, is closed afterwards.
    pub fn run_all(&mut self, rounds: &[ResolvedRound]) -> Result<Vec<RoundReport>, DriverError> {
        let mut reports = Vec::with_capacity(rounds.len());
        for round in rounds {
            match self.run_round(round) {
                Ok(report) => reports.push(report),
                Err(err) => {
                    self.finish();
                    return Err(err);
                }
            }
        }
        self.finish();
        Ok(reports)
    }

    /// Runs one round: mutate, notify or seed, build, report.
    pub fn run_round(&mut self, round: &ResolvedRound) -> Result<RoundReport, DriverError> {
        let span = info_span!("round", index = round.index, name = %round.name);
        let _enter = span.enter();

        self.state = RoundState::Mutate;
        let previous = self.store.current().clone();
        let diff = self.store.apply(round.snapshot.clone());
        let changed = changed_paths(&previous, self.store.current());
        debug!(
            created = diff.created.len(),
            deleted = diff.deleted.len(),
            changed = changed.len(),
            "file set applied"
        );

        let fatal = |source| DriverError::Fatal {
            round: round.index,
            source,
        };
        let policy = self.settings.emit_policy;
        let mut notifications = 0;

        let outcome = match self.settings.mode {
            BuildMode::Watch => {
                self.state = RoundState::Notify;
                if self.watch_options.as_ref() != Some(&round.options) {
                    if let Some(mut watch) = self.watch.take() {
                        debug!("compiler options changed; recreating watch program");
                        watch.close();
                    }
                }
                for path in &diff.deleted {
                    notifications += self.registry.notify(path, WatchEventKind::Deleted);
                }
                for path in &diff.created {
                    notifications += self.registry.notify(path, WatchEventKind::Created);
                }
                for path in &changed {
                    notifications += self.registry.notify(path, WatchEventKind::Changed);
                }

                let watch = match &mut self.watch {
                    Some(watch) => {
                        watch.update_root_file_names(&round.roots);
                        watch
                    }
                    empty => {
                        let created = self
                            .engine
                            .create_watch_program(WatchRequest {
                                root_paths: &round.roots,
                                options: &round.options,
                                host: &self.store,
                                sources: &mut self.sources,
                                registry: &self.registry,
                            })
                            .map_err(fatal)?;
                        self.watch_options = Some(round.options.clone());
                        empty.insert(created)
                    }
                };

                self.state = RoundState::Build;
                let program = watch
                    .program(&self.store, &mut self.sources)
                    .map_err(fatal)?;
                collect(program, &round.roots, policy, &mut self.output)
            }
            BuildMode::Batch => {
                self.state = RoundState::Seed;
                let previous = self.projects.get(&round.project);
                debug!(project = %round.project, seeded = previous.is_some(), "build seeded");

                self.state = RoundState::Build;
                let handle = self
                    .engine
                    .build(BuildRequest {
                        root_paths: &round.roots,
                        options: &round.options,
                        host: &self.store,
                        sources: &mut self.sources,
                        previous,
                    })
                    .map_err(fatal)?;
                let outcome = collect(&handle, &round.roots, policy, &mut self.output);
                self.projects.put(round.project.clone(), handle);
                outcome
            }
        };

        self.state = RoundState::Report;
        info!(
            diagnostics = outcome.diagnostics.len(),
            emitted = outcome.emitted.len(),
            "round finished"
        );
        Ok(RoundReport {
            index: round.index,
            name: round.name.clone(),
            project: round.project.clone(),
            mode: self.settings.mode,
            diff,
            changed,
            notifications,
            diagnostics: outcome.diagnostics,
            emit_skipped: outcome.emit_skipped,
            emitted: outcome.emitted,
        })
    }

    /// Closes the watch program, if any, and marks the run as done.
    pub fn finish(&mut self) {
        if let Some(mut watch) = self.watch.take() {
            watch.close();
        }
        self.watch_options = None;
        self.state = RoundState::Done;
    }

    /// Renders `report` against the current file store.
    ///
    /// Spans only resolve correctly for the most recent round.
    pub fn render_report(&self, report: &RoundReport, renderer: &dyn DiagnosticRenderer) -> String {
        report.render(renderer, &self.store)
    }

    /// Current state of the round state machine.
    pub fn state(&self) -> RoundState {
        self.state
    }

    /// The virtual file store.
    pub fn store(&self) -> &VirtualFileStore {
        &self.store
    }

    /// The watch registry shared with the engine.
    pub fn registry(&self) -> &WatchRegistry {
        &self.registry
    }

    /// The shared parsed-file cache.
    pub fn sources(&self) -> &SourceCache<E::Parsed> {
        &self.sources
    }

    /// The per-project handle cache.
    pub fn projects(&self) -> &ProjectCache<E::Handle> {
        &self.projects
    }

    /// The in-memory output directory.
    pub fn output(&self) -> &DedupOutputSink {
        &self.output
    }

    /// The live watch program, in watch mode after the first round.
    pub fn watch_program(&self) -> Option<&E::Watch> {
        self.watch.as_ref()
    }
}

struct Outcome {
    diagnostics: Vec<Diagnostic>,
    emit_skipped: bool,
    emitted: Vec<String>,
}

/// Collects a round's diagnostics in phase order and emits per `policy`.
fn collect(
    program: &impl Program,
    roots: &[String],
    policy: EmitPolicy,
    output: &mut DedupOutputSink,
) -> Outcome {
    let mut sink = DiagnosticSink::new();
    sink.extend(program.options_diagnostics());
    sink.extend(program.global_diagnostics());

    let main_files: Vec<&String> = roots
        .iter()
        .filter(|path| !path.starts_with("/node_modules/"))
        .collect();
    for path in &main_files {
        sink.extend(program.syntactic_diagnostics(path));
        sink.extend(program.semantic_diagnostics(path));
    }

    if policy == EmitPolicy::SkipOnError && !sink.is_empty() {
        warn!(
            diagnostics = sink.len(),
            errors = sink.error_count(),
            "emit skipped because of earlier diagnostics"
        );
        return Outcome {
            diagnostics: sink.into_diagnostics(),
            emit_skipped: true,
            emitted: Vec::new(),
        };
    }

    let mut emitted = Vec::new();
    for path in &main_files {
        let result = program.emit(path, &mut *output);
        sink.extend(result.diagnostics);
        emitted.extend(result.emitted);
    }
    Outcome {
        diagnostics: sink.into_diagnostics(),
        emit_skipped: false,
        emitted,
    }
}

/// Paths present in both snapshots whose text differs.
fn changed_paths(old: &RoundSnapshot, new: &RoundSnapshot) -> Vec<String> {
    new.records()
        .filter(|record| {
            old.get(&record.path)
                .is_some_and(|previous| previous.content != record.content)
        })
        .map(|record| record.path.clone())
        .collect()
}
