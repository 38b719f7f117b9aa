//! Scenario helpers for the kiln conformance tests.
//!
//! Each helper loads a `kiln.toml` scenario from text, runs every round
//! through a [`RoundDriver`] backed by the reference engine, and hands the
//! per-round reports back for assertion.

#![warn(missing_docs)]

use kiln_config::{load_config_from_str, resolve_rounds, BuildMode, ResolvedRound};
use kiln_diagnostics::CompactRenderer;
use kiln_driver::{DriverError, DriverSettings, RoundDriver, RoundReport};
use kiln_engine::ReferenceEngine;

/// `a.ts` imports `module/b.d.ts`; round 1 deletes it and round 2 restores it.
pub const DELETE_RESTORE: &str = r#"
root_files = ["/a.ts"]

[compiler]
no_lib = true
out_dir = "/out"

[files]
"/a.ts" = "import * as b from \"./module/b\";\nconsole.log(b.GLOBAL_VAR);\n"
"/module/b.d.ts" = "export declare const GLOBAL_VAR: string;\n"

[[rounds]]
name = "initial"

[[rounds]]
name = "deleted"
remove = ["/module/b.d.ts"]

[[rounds]]
name = "restored"
"#;

/// Like [`DELETE_RESTORE`], but the importer sits in `/src` and reaches the
/// declaration file through `../module/b`.
pub const DELETE_RESTORE_UPWARD: &str = r#"
root_files = ["/src/a.ts"]

[compiler]
no_lib = true
out_dir = "/out"

[files]
"/src/a.ts" = "import * as b from \"../module/b\";\nconsole.log(b.GLOBAL_VAR);\n"
"/module/b.d.ts" = "export declare const GLOBAL_VAR: string;\n"

[[rounds]]
name = "initial"

[[rounds]]
name = "deleted"
remove = ["/module/b.d.ts"]

[[rounds]]
name = "restored"
"#;

/// `lib.d.ts` re-exports `./transitive_lib`, which resolves to a number
/// export when `transitive_lib.d.ts` exists and to a string export through
/// `transitive_lib/index.d.ts` otherwise.
///
/// Rounds: A with the full set, B without `transitive_lib.d.ts`, B with the
/// full set again, then A once more.
pub const TRANSITIVE: &str = r#"
root_files = ["/a.ts"]

[harness]
mode = "batch"

[compiler]
no_lib = true

[files]
"/a.ts" = "import * as lib from \"./m/lib\";\nconsole.log(lib.VALUE.toUpperCase());\n"
"/m/lib.d.ts" = "export * from \"./transitive_lib\";\n"
"/m/transitive_lib.d.ts" = "export declare const VALUE: number;\n"
"/m/transitive_lib/index.d.ts" = "export declare const VALUE: string;\n"

[[rounds]]
name = "a-number"
project = "A"

[[rounds]]
name = "b-index"
project = "B"
remove = ["/m/transitive_lib.d.ts"]

[[rounds]]
name = "b-stale"
project = "B"

[[rounds]]
name = "a-again"
project = "A"
"#;

/// Outcome of running a scenario to completion.
pub struct ScenarioRun {
    /// One report per round, in order.
    pub reports: Vec<RoundReport>,
    /// Rendered output of every round, `ROUND <i> START` headers included.
    pub transcript: String,
    /// The driver after [`RoundDriver::finish`].
    pub driver: RoundDriver<ReferenceEngine>,
}

impl ScenarioRun {
    /// Diagnostic codes of every round.
    pub fn codes(&self) -> Vec<Vec<u32>> {
        self.reports.iter().map(RoundReport::codes).collect()
    }
}

/// Parses and resolves a scenario, panicking on invalid input.
pub fn load_scenario(toml: &str) -> (DriverSettings, Vec<ResolvedRound>) {
    let config = load_config_from_str(toml).expect("scenario must be valid");
    let rounds = resolve_rounds(&config).expect("rounds must resolve");
    (DriverSettings::from(&config.harness), rounds)
}

/// Runs every round of `toml` in the given mode.
pub fn run_scenario_in(toml: &str, mode: BuildMode) -> Result<ScenarioRun, DriverError> {
    let (mut settings, rounds) = load_scenario(toml);
    settings.mode = mode;
    run_rounds(settings, &rounds)
}

/// Runs every round of `toml` with the scenario's own settings.
pub fn run_scenario(toml: &str) -> Result<ScenarioRun, DriverError> {
    let (settings, rounds) = load_scenario(toml);
    run_rounds(settings, &rounds)
}

/// Runs `rounds` in order, rendering each report before the next round
/// replaces the file store.
pub fn run_rounds(
    settings: DriverSettings,
    rounds: &[ResolvedRound],
) -> Result<ScenarioRun, DriverError> {
    let mut driver = RoundDriver::new(ReferenceEngine::new(), settings);
    let mut reports = Vec::with_capacity(rounds.len());
    let mut transcript = String::new();
    for round in rounds {
        let report = match driver.run_round(round) {
            Ok(report) => report,
            Err(err) => {
                driver.finish();
                return Err(err);
            }
        };
        transcript.push_str(&driver.render_report(&report, &CompactRenderer));
        reports.push(report);
    }
    driver.finish();
    Ok(ScenarioRun {
        reports,
        transcript,
        driver,
    })
}
