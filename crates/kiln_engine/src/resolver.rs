//! Module specifier resolution against the host's files.

use kiln_common::{ancestors, join, parent_dir};
use kiln_config::ModuleResolution;
use kiln_source::FileSystemHost;

/// Returns `true` for `./x`, `../x` and `/x` specifiers.
pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
}

/// Resolves `specifier` imported from `containing_file` to a file in `host`.
///
/// Relative specifiers are looked up next to the importing file. Non-relative
/// specifiers are looked up in `node_modules` directories (node) or in
/// each ancestor directory (classic), nearest first.
pub fn resolve_module(
    specifier: &str,
    containing_file: &str,
    strategy: ModuleResolution,
    host: &dyn FileSystemHost,
) -> Option<String> {
    let dir = parent_dir(containing_file);
    if is_relative(specifier) {
        return first_existing(&join(dir, specifier), strategy, host);
    }

    let mut search_dirs = std::iter::once(dir).chain(ancestors(dir));
    match strategy {
        ModuleResolution::Node => search_dirs
            .map(|d| join(d, "node_modules"))
            // Hosts that cannot answer directory queries are assumed to have the directory.
            .filter(|modules| host.directory_exists(modules).unwrap_or(true))
            .find_map(|modules| first_existing(&join(&modules, specifier), strategy, host)),
        ModuleResolution::Classic => {
            search_dirs.find_map(|d| first_existing(&join(d, specifier), strategy, host))
        }
    }
}

/// Directory whose subtree holds every candidate of a failed lookup.
///
/// A relative specifier is looked up below the directory of its base path. A
/// non-relative one is searched for up every ancestor, so the outermost
/// searched directory covers all candidates.
pub fn failed_lookup_location(specifier: &str, containing_file: &str) -> String {
    let dir = parent_dir(containing_file);
    if is_relative(specifier) {
        return parent_dir(&join(dir, specifier)).to_string();
    }
    ancestors(dir).last().unwrap_or(dir).to_string()
}

/// Candidate files for the extensionless path `base`, in lookup order.
pub fn candidates(base: &str, strategy: ModuleResolution) -> Vec<String> {
    let mut out = vec![format!("{base}.ts"), format!("{base}.d.ts")];
    if strategy == ModuleResolution::Node {
        out.push(format!("{base}/index.ts"));
        out.push(format!("{base}/index.d.ts"));
    }
    out
}

fn first_existing(base: &str, strategy: ModuleResolution, host: &dyn FileSystemHost) -> Option<String> {
    candidates(base, strategy)
        .into_iter()
        .find(|candidate| host.file_exists(candidate))
}
