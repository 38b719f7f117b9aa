//! `kiln run`: drive every round and report diagnostics.

use crate::scenario::load_rounds;
use crate::{GlobalArgs, ModeArg, ReportFormat, RunArgs};
use kiln_config::BuildMode;
use kiln_diagnostics::{CompactRenderer, DiagnosticRenderer, JsonRenderer, TerminalRenderer};
use kiln_driver::{DriverSettings, RoundDriver};
use kiln_engine::ReferenceEngine;
use tracing::debug;

/// Runs the scenario. Exits 1 if the final round reported an error.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (config, rounds) = load_rounds(&args.scenario)?;

    let mut settings = DriverSettings::from(&config.harness);
    if let Some(mode) = args.mode {
        settings.mode = match mode {
            ModeArg::Watch => BuildMode::Watch,
            ModeArg::Batch => BuildMode::Batch,
        };
    }
    debug!(?settings, rounds = rounds.len(), "running scenario");

    let renderer: Box<dyn DiagnosticRenderer> = match args.format {
        ReportFormat::Terminal => Box::new(TerminalRenderer::new(global.color)),
        ReportFormat::Compact => Box::new(CompactRenderer),
        ReportFormat::Json => Box::new(JsonRenderer),
    };

    let mut driver = RoundDriver::new(ReferenceEngine::new(), settings);
    let mut final_errors = false;
    let mut result = Ok(());
    for round in &rounds {
        match driver.run_round(round) {
            Ok(report) => {
                // Render before the next round replaces the file store.
                print!("{}", driver.render_report(&report, renderer.as_ref()));
                final_errors = report.has_errors();
            }
            Err(err) => {
                result = Err(err);
                break;
            }
        }
    }
    driver.finish();
    result?;

    if args.show_output {
        for (path, text) in driver.output().files() {
            println!("//// {path}");
            print!("{text}");
        }
    }
    if global.verbose {
        let stats = driver.sources().stats();
        eprintln!(
            "source cache: {} hits, {} misses, {} replacements",
            stats.hits, stats.misses, stats.replacements
        );
    }

    Ok(if final_errors { 1 } else { 0 })
}
