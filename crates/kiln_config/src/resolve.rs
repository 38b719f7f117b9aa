//! Round resolution: expanding each round into a complete file mapping.

use crate::error::ConfigError;
use crate::types::{CompilerOptions, HarnessConfig};
use kiln_source::RoundSnapshot;

/// A round with its file set, roots and options fully resolved.
///
/// Each resolved round is independent of the others: its snapshot is the
/// base file set minus the round's removals plus its additions, never the
/// previous round's state.
#[derive(Debug, Clone)]
pub struct ResolvedRound {
    /// Zero-based position of the round in the scenario.
    pub index: usize,
    /// Display name (defaults to `round-<index>`).
    pub name: String,
    /// Project key for the project cache.
    pub project: String,
    /// Ordered root files for the build.
    pub roots: Vec<String>,
    /// Compiler options after applying round overrides.
    pub options: CompilerOptions,
    /// The full file mapping of this round.
    pub snapshot: RoundSnapshot,
}

/// Resolves every round of `config` in order.
pub fn resolve_rounds(config: &HarnessConfig) -> Result<Vec<ResolvedRound>, ConfigError> {
    let base = RoundSnapshot::from_pairs(
        config
            .files
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_str())),
    );

    config
        .rounds
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let name = if spec.name.is_empty() {
                format!("round-{index}")
            } else {
                spec.name.clone()
            };

            let mut snapshot = base.clone();
            for path in &spec.remove {
                if !snapshot.contains(path) {
                    return Err(ConfigError::UnknownFile {
                        round: name,
                        path: path.clone(),
                    });
                }
                snapshot = snapshot.without_file(path);
            }
            for (path, content) in &spec.add {
                snapshot = snapshot.with_file(path.as_str(), content.as_str());
            }

            let options = match &spec.compiler {
                Some(overrides) => config.compiler.with_overrides(overrides),
                None => config.compiler.clone(),
            };

            Ok(ResolvedRound {
                index,
                name,
                project: spec.project.clone(),
                roots: spec.roots.clone().unwrap_or_else(|| config.root_files.clone()),
                options,
                snapshot,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;
    use crate::types::ModuleResolution;

    const SCENARIO: &str = r#"
root_files = ["/a.ts"]

[compiler]
out_dir = "/out"

[files]
"/a.ts" = "a"
"/module/b.d.ts" = "b"

[[rounds]]
name = "initial"

[[rounds]]
remove = ["/module/b.d.ts"]
[rounds.add]
"/module/c.d.ts" = "c"

[[rounds]]
project = "classic"
roots = ["/a.ts", "/module/b.d.ts"]
[rounds.add]
"/a.ts" = "a2"
[rounds.compiler]
module_resolution = "classic"
"#;

    #[test]
    fn rounds_are_independent_of_each_other() {
        let config = load_config_from_str(SCENARIO).unwrap();
        let rounds = resolve_rounds(&config).unwrap();
        assert_eq!(rounds.len(), 3);

        assert_eq!(rounds[0].name, "initial");
        assert_eq!(rounds[0].snapshot.len(), 2);

        assert_eq!(rounds[1].name, "round-1");
        assert!(!rounds[1].snapshot.contains("/module/b.d.ts"));
        assert!(rounds[1].snapshot.contains("/module/c.d.ts"));

        // The third round starts from the base set again, not from round 1.
        assert!(rounds[2].snapshot.contains("/module/b.d.ts"));
        assert!(!rounds[2].snapshot.contains("/module/c.d.ts"));
        assert_eq!(&*rounds[2].snapshot.get("/a.ts").unwrap().content, "a2");
    }

    #[test]
    fn roots_and_options_per_round() {
        let config = load_config_from_str(SCENARIO).unwrap();
        let rounds = resolve_rounds(&config).unwrap();
        assert_eq!(rounds[0].roots, vec!["/a.ts"]);
        assert_eq!(rounds[2].roots.len(), 2);
        assert_eq!(rounds[0].options.module_resolution, ModuleResolution::Node);
        assert_eq!(rounds[2].options.module_resolution, ModuleResolution::Classic);
        assert_eq!(rounds[2].options.out_dir.as_deref(), Some("/out"));
        assert_eq!(rounds[2].project, "classic");
    }

    #[test]
    fn removing_unknown_file_errors() {
        let toml = r#"
root_files = ["/a.ts"]
[[rounds]]
name = "bad"
remove = ["/nope.ts"]
"#;
        let config = load_config_from_str(toml).unwrap();
        let err = resolve_rounds(&config).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFile { ref path, .. } if path == "/nope.ts"));
    }
}
