//! Locating and loading scenario files.

use kiln_config::{load_config, load_config_file, resolve_rounds, HarnessConfig, ResolvedRound};
use std::path::Path;

/// Loads a scenario from a `kiln.toml` path or a directory containing one.
pub fn load(scenario: &str) -> Result<HarnessConfig, Box<dyn std::error::Error>> {
    let path = Path::new(scenario);
    let config = if path.is_dir() {
        load_config(path)?
    } else {
        load_config_file(path)?
    };
    Ok(config)
}

/// Loads a scenario and resolves every round's file set.
pub fn load_rounds(
    scenario: &str,
) -> Result<(HarnessConfig, Vec<ResolvedRound>), Box<dyn std::error::Error>> {
    let config = load(scenario)?;
    let rounds = resolve_rounds(&config)?;
    Ok((config, rounds))
}
