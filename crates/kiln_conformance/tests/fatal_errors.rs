//! Duplicate watcher registration aborts the run.

use kiln_config::BuildMode;
use kiln_conformance::{load_scenario, DELETE_RESTORE};
use kiln_driver::{DriverError, RoundDriver};
use kiln_engine::{
    BuildRequest, Engine, EngineError, ParsedSource, ReferenceEngine, ReferenceProgram,
    ReferenceWatchProgram, WatchRequest,
};
use kiln_watch::{WatchError, WatchEventKind};

/// Registers a file watcher on the first root before delegating, so the
/// reference watch program's own registration collides with it.
struct DoubleWatchEngine;

impl Engine for DoubleWatchEngine {
    type Parsed = ParsedSource;
    type Handle = ReferenceProgram;
    type Watch = ReferenceWatchProgram;

    fn build(
        &self,
        request: BuildRequest<'_, ParsedSource, ReferenceProgram>,
    ) -> Result<ReferenceProgram, EngineError> {
        ReferenceEngine.build(request)
    }

    fn create_watch_program(
        &self,
        request: WatchRequest<'_, ParsedSource>,
    ) -> Result<ReferenceWatchProgram, EngineError> {
        let _held = request
            .registry
            .watch_file(&request.root_paths[0], |_: &str, _: WatchEventKind| {})?;
        ReferenceEngine.create_watch_program(request)
    }
}

#[test]
fn duplicate_file_watcher_is_fatal() {
    let (mut settings, rounds) = load_scenario(DELETE_RESTORE);
    settings.mode = BuildMode::Watch;
    let mut driver = RoundDriver::new(DoubleWatchEngine, settings);

    let err = driver.run_all(&rounds).unwrap_err();
    assert_eq!(
        err,
        DriverError::Fatal {
            round: 0,
            source: EngineError::Watch(WatchError::DuplicateFileWatcher {
                path: "/a.ts".into()
            }),
        }
    );
    assert_eq!(
        err.to_string(),
        "round 0 aborted: file '/a.ts' is already being watched"
    );
}

#[test]
fn batch_mode_never_registers_watchers() {
    let (mut settings, rounds) = load_scenario(DELETE_RESTORE);
    settings.mode = BuildMode::Batch;
    let mut driver = RoundDriver::new(DoubleWatchEngine, settings);
    assert_eq!(driver.run_all(&rounds).unwrap().len(), 3);
    assert_eq!(driver.registry().file_watcher_count(), 0);
}
