//! `kiln check`: load and validate a scenario.

use crate::scenario::load_rounds;
use crate::ScenarioArgs;

/// Validates the scenario and prints a one-line summary per round.
pub fn run(args: &ScenarioArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (config, rounds) = load_rounds(&args.scenario)?;
    println!(
        "scenario ok: {} base files, {} rounds, mode {:?}",
        config.files.len(),
        rounds.len(),
        config.harness.mode
    );
    for round in &rounds {
        println!(
            "  {} {} [{}]: {} files, {} roots",
            round.index,
            round.name,
            round.project,
            round.snapshot.len(),
            round.roots.len()
        );
    }
    Ok(0)
}
