//! Configuration types deserialized from `kiln.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The top-level scenario configuration parsed from `kiln.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HarnessConfig {
    /// Root files handed to every build unless a round overrides them.
    #[serde(default)]
    pub root_files: Vec<String>,
    /// How the rounds are driven.
    #[serde(default)]
    pub harness: HarnessSettings,
    /// Compilation settings shared by all rounds.
    #[serde(default)]
    pub compiler: CompilerOptions,
    /// The base file set, path to content.
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    /// The rounds to run, in order.
    #[serde(default)]
    pub rounds: Vec<RoundSpec>,
}

/// Round driving policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HarnessSettings {
    /// Watch mode or batch mode.
    #[serde(default)]
    pub mode: BuildMode,
    /// Emit even when earlier phases reported diagnostics.
    #[serde(default)]
    pub emit_on_error: bool,
}

/// Whether rounds are driven through file-change notifications or by
/// rebuilding from the previous handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// A long-lived watch program fed by change notifications.
    #[default]
    Watch,
    /// A fresh build per round seeded with the previous handle.
    Batch,
}

/// Compilation settings passed to the engine.
///
/// The serialized form of this struct is what settings fingerprints are
/// computed from, so every field takes part in cache keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompilerOptions {
    /// Module system for emitted code.
    #[serde(default)]
    pub module: ModuleKind,
    /// Module resolution strategy.
    #[serde(default)]
    pub module_resolution: ModuleResolution,
    /// Language level for emitted code.
    #[serde(default)]
    pub target: ScriptTarget,
    /// Enables strict checking.
    #[serde(default)]
    pub strict: bool,
    /// Skips the default library typings.
    #[serde(default)]
    pub no_lib: bool,
    /// Output directory for emitted files.
    #[serde(default)]
    pub out_dir: Option<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            module: ModuleKind::default(),
            module_resolution: ModuleResolution::default(),
            target: ScriptTarget::default(),
            strict: false,
            no_lib: false,
            out_dir: None,
        }
    }
}

impl CompilerOptions {
    /// Returns a copy with every field set in `overrides` replaced.
    pub fn with_overrides(&self, overrides: &CompilerOverrides) -> CompilerOptions {
        CompilerOptions {
            module: overrides.module.unwrap_or(self.module),
            module_resolution: overrides
                .module_resolution
                .unwrap_or(self.module_resolution),
            target: overrides.target.unwrap_or(self.target),
            strict: overrides.strict.unwrap_or(self.strict),
            no_lib: overrides.no_lib.unwrap_or(self.no_lib),
            out_dir: overrides.out_dir.clone().or_else(|| self.out_dir.clone()),
        }
    }
}

/// Per-round replacements for [`CompilerOptions`] fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompilerOverrides {
    /// Replacement module system.
    #[serde(default)]
    pub module: Option<ModuleKind>,
    /// Replacement resolution strategy.
    #[serde(default)]
    pub module_resolution: Option<ModuleResolution>,
    /// Replacement language level.
    #[serde(default)]
    pub target: Option<ScriptTarget>,
    /// Replacement strictness.
    #[serde(default)]
    pub strict: Option<bool>,
    /// Replacement library switch.
    #[serde(default)]
    pub no_lib: Option<bool>,
    /// Replacement output directory.
    #[serde(default)]
    pub out_dir: Option<String>,
}

/// Module system of emitted JavaScript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// `require`/`exports` lowering.
    #[default]
    CommonJs,
    /// Native `import`/`export` syntax.
    Es2015,
}

/// How import specifiers are mapped to files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleResolution {
    /// Extension probing followed by directory `index` lookup.
    #[default]
    Node,
    /// Extension probing only.
    Classic,
}

/// Language level of emitted JavaScript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptTarget {
    /// ES5 (`var` bindings).
    Es5,
    /// ES2015.
    Es2015,
    /// ES2020.
    #[default]
    Es2020,
    /// Latest supported level.
    EsNext,
}

/// One round of a scenario as written in the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoundSpec {
    /// Display name of the round.
    #[serde(default)]
    pub name: String,
    /// Project key whose reuse chain this round continues.
    #[serde(default = "default_project")]
    pub project: String,
    /// Root files for this round, replacing the top-level list.
    #[serde(default)]
    pub roots: Option<Vec<String>>,
    /// Paths removed from the base file set.
    #[serde(default)]
    pub remove: Vec<String>,
    /// Paths added to, or overridden in, the base file set.
    #[serde(default)]
    pub add: BTreeMap<String, String>,
    /// Compiler option overrides for this round.
    #[serde(default)]
    pub compiler: Option<CompilerOverrides>,
}

fn default_project() -> String {
    "default".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_set_fields() {
        let base = CompilerOptions {
            strict: true,
            out_dir: Some("/out".into()),
            ..CompilerOptions::default()
        };
        let merged = base.with_overrides(&CompilerOverrides {
            module_resolution: Some(ModuleResolution::Classic),
            ..CompilerOverrides::default()
        });
        assert_eq!(merged.module_resolution, ModuleResolution::Classic);
        assert!(merged.strict);
        assert_eq!(merged.out_dir.as_deref(), Some("/out"));
        assert_eq!(merged.module, ModuleKind::CommonJs);
    }

    #[test]
    fn empty_overrides_are_identity() {
        let base = CompilerOptions::default();
        assert_eq!(base.with_overrides(&CompilerOverrides::default()), base);
    }

    #[test]
    fn enum_names_are_lowercase() {
        let opts: CompilerOptions =
            toml::from_str("module = \"es2015\"\ntarget = \"esnext\"\n").unwrap();
        assert_eq!(opts.module, ModuleKind::Es2015);
        assert_eq!(opts.target, ScriptTarget::EsNext);
    }
}
