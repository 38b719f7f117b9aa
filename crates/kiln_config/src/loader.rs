//! Scenario file loading and validation.

use crate::error::ConfigError;
use crate::types::HarnessConfig;
use kiln_common::is_absolute;
use std::path::Path;

/// The scenario file name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "kiln.toml";

/// Loads and validates a `kiln.toml` scenario from a directory.
pub fn load_config(scenario_dir: &Path) -> Result<HarnessConfig, ConfigError> {
    load_config_file(&scenario_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a scenario from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<HarnessConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a scenario from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<HarnessConfig, ConfigError> {
    let config: HarnessConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and every path is absolute.
pub fn validate_config(config: &HarnessConfig) -> Result<(), ConfigError> {
    if config.rounds.is_empty() {
        return Err(ConfigError::MissingField("rounds".to_string()));
    }
    if config.root_files.is_empty() && config.rounds.iter().any(|r| r.roots.is_none()) {
        return Err(ConfigError::MissingField("root_files".to_string()));
    }

    check_absolute("root file", config.root_files.iter())?;
    check_absolute("file", config.files.keys())?;

    for round in &config.rounds {
        if round.project.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "round '{}' has an empty project key",
                round.name
            )));
        }
        if let Some(roots) = &round.roots {
            if roots.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "round '{}' has an empty root list",
                    round.name
                )));
            }
            check_absolute("root file", roots.iter())?;
        }
        check_absolute("removed file", round.remove.iter())?;
        check_absolute("added file", round.add.keys())?;
    }
    Ok(())
}

fn check_absolute<'a>(
    what: &str,
    paths: impl Iterator<Item = &'a String>,
) -> Result<(), ConfigError> {
    for path in paths {
        if !is_absolute(path) {
            return Err(ConfigError::ValidationError(format!(
                "{what} '{path}' must be an absolute path"
            )));
        }
    }
    Ok(())
}
