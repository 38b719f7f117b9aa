//! Program construction with resolution reuse from the previous handle.

use crate::api::{EmitResult, OutputSink, Program};
use crate::ast::ParsedSource;
use crate::error::EngineError;
use crate::resolver::{failed_lookup_location, resolve_module};
use crate::{checker, emitter, parser};
use kiln_cache::{CacheError, SettingsFingerprint, SourceCache};
use kiln_common::{file_name, is_absolute};
use kiln_config::CompilerOptions;
use kiln_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticPhase};
use kiln_source::FileSystemHost;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::rc::Rc;
use tracing::debug;

/// How one module specifier of a file was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    /// The specifier as written.
    pub specifier: String,
    /// The file it resolved to, or `None` if resolution failed.
    pub resolved: Option<String>,
    /// `true` if the result was carried over from the previous program.
    pub reused: bool,
}

/// Inputs to [`build_program`].
pub struct ProgramInputs<'a> {
    /// Root files in order.
    pub roots: &'a [String],
    /// Active compilation settings.
    pub options: &'a CompilerOptions,
    /// The current round's files.
    pub host: &'a dyn FileSystemHost,
    /// Shared parsed-file cache.
    pub sources: &'a mut SourceCache<ParsedSource>,
    /// The program this build may reuse resolutions from.
    pub previous: Option<&'a ReferenceProgram>,
    /// Paths that must be re-parsed even if the cached text looks current.
    pub force: &'a BTreeSet<String>,
}

/// A built program of the reference engine.
#[derive(Debug)]
pub struct ReferenceProgram {
    options: CompilerOptions,
    fingerprint: SettingsFingerprint,
    roots: Vec<String>,
    files: BTreeMap<String, Rc<ParsedSource>>,
    load_order: Vec<String>,
    imports: HashMap<String, Vec<ResolvedImport>>,
    missing_roots: Vec<String>,
}

/// Loads the roots and everything they import, parsing through the cache.
///
/// A file whose parse is the very same cached value as in `previous` keeps
/// its earlier successful resolutions while their targets still exist;
/// failed resolutions are always retried. A target that changed meaning
/// without disappearing is therefore not noticed.
pub fn build_program(inputs: ProgramInputs<'_>) -> Result<ReferenceProgram, EngineError> {
    let ProgramInputs {
        roots,
        options,
        host,
        sources,
        previous,
        force,
    } = inputs;
    let fingerprint = SettingsFingerprint::of(options)?;
    let previous = previous.filter(|p| p.fingerprint == fingerprint);

    let mut queue: VecDeque<String> = roots.iter().cloned().collect();
    let mut files = BTreeMap::new();
    let mut load_order = Vec::new();
    let mut imports = HashMap::new();
    let mut missing_roots = Vec::new();

    while let Some(path) = queue.pop_front() {
        if files.contains_key(&path) || missing_roots.contains(&path) {
            continue;
        }
        let force_new =
            force.contains(&path) || sources.is_stale(host, &path, Some(fingerprint));
        let parsed = match sources.get_or_parse(
            host,
            &path,
            Some(fingerprint),
            force_new,
            parser::parse,
        ) {
            Ok(parsed) => parsed,
            Err(CacheError::NotFound { .. }) => {
                missing_roots.push(path);
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let unchanged = previous
            .and_then(|p| p.files.get(&path))
            .is_some_and(|old| Rc::ptr_eq(old, &parsed));

        let mut resolved_imports = Vec::new();
        for specifier in parsed.specifiers() {
            let carried = previous
                .filter(|_| unchanged)
                .and_then(|p| p.resolution(&path, &specifier.value))
                .filter(|target| host.file_exists(target))
                .map(str::to_string);
            let reused = carried.is_some();
            let resolved = match carried {
                Some(target) => {
                    debug!(file = %path, specifier = %specifier.value, %target, "reusing resolution");
                    Some(target)
                }
                None => resolve_module(&specifier.value, &path, options.module_resolution, host),
            };
            if let Some(target) = &resolved {
                queue.push_back(target.clone());
            }
            resolved_imports.push(ResolvedImport {
                specifier: specifier.value.clone(),
                resolved,
                reused,
            });
        }

        imports.insert(path.clone(), resolved_imports);
        files.insert(path.clone(), parsed);
        load_order.push(path);
    }

    debug!(
        files = files.len(),
        missing = missing_roots.len(),
        "program built"
    );
    Ok(ReferenceProgram {
        options: options.clone(),
        fingerprint,
        roots: roots.to_vec(),
        files,
        load_order,
        imports,
        missing_roots,
    })
}

impl ReferenceProgram {
    /// The settings the program was built with.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Fingerprint of [`options`](ReferenceProgram::options).
    pub fn fingerprint(&self) -> SettingsFingerprint {
        self.fingerprint
    }

    /// The parsed file at `path`, if it is part of the program.
    pub fn file(&self, path: &str) -> Option<&Rc<ParsedSource>> {
        self.files.get(path)
    }

    /// Files in the order they were loaded.
    pub fn load_order(&self) -> &[String] {
        &self.load_order
    }

    /// Resolution records of `path`, in specifier order.
    pub fn imports(&self, path: &str) -> &[ResolvedImport] {
        self.imports.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The file `specifier` resolved to when imported from `path`.
    pub fn resolution(&self, path: &str, specifier: &str) -> Option<&str> {
        self.imports(path)
            .iter()
            .find(|import| import.specifier == specifier)
            .and_then(|import| import.resolved.as_deref())
    }

    /// Root files that were not found in the host.
    pub fn missing_roots(&self) -> &[String] {
        &self.missing_roots
    }

    /// Directories where a file could appear that satisfies a failed import.
    pub fn failed_lookup_locations(&self) -> BTreeSet<String> {
        self.load_order
            .iter()
            .flat_map(|path| {
                self.imports(path)
                    .iter()
                    .filter(|import| import.resolved.is_none())
                    .map(move |import| failed_lookup_location(&import.specifier, path))
            })
            .collect()
    }

    /// Number of resolutions carried over from the previous program.
    pub fn reused_resolution_count(&self) -> usize {
        self.imports
            .values()
            .flatten()
            .filter(|import| import.reused)
            .count()
    }

    /// Returns `true` if this program has the given roots and settings.
    pub fn matches(&self, roots: &[String], options: &CompilerOptions) -> bool {
        self.roots == roots && &self.options == options
    }
}

impl Program for ReferenceProgram {
    fn root_paths(&self) -> &[String] {
        &self.roots
    }

    fn source_paths(&self) -> Vec<&str> {
        self.load_order.iter().map(String::as_str).collect()
    }

    fn options_diagnostics(&self) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        if let Some(out_dir) = &self.options.out_dir {
            if !is_absolute(out_dir) {
                diags.push(Diagnostic::error(
                    DiagnosticPhase::Options,
                    DiagnosticCode::OPTION_NOT_ABSOLUTE,
                    format!("Option 'outDir' must be an absolute path, got '{out_dir}'."),
                ));
            }
        }
        diags
    }

    fn global_diagnostics(&self) -> Vec<Diagnostic> {
        let mut diags: Vec<Diagnostic> = self
            .missing_roots
            .iter()
            .map(|path| {
                Diagnostic::error(
                    DiagnosticPhase::Global,
                    DiagnosticCode::FILE_NOT_FOUND,
                    format!("File '{path}' not found."),
                )
            })
            .collect();

        let has_lib = self.load_order.iter().any(|path| {
            let name = file_name(path);
            name.starts_with("lib.") && name.ends_with(".d.ts")
        });
        if !self.options.no_lib && !has_lib {
            diags.push(Diagnostic::error(
                DiagnosticPhase::Global,
                DiagnosticCode::CANNOT_FIND_GLOBAL_TYPE,
                "Cannot find global type 'Array'.",
            ));
        }
        diags
    }

    fn syntactic_diagnostics(&self, path: &str) -> Vec<Diagnostic> {
        self.files
            .get(path)
            .map(|file| file.diagnostics.clone())
            .unwrap_or_default()
    }

    fn semantic_diagnostics(&self, path: &str) -> Vec<Diagnostic> {
        checker::check(self, path)
    }

    fn emit(&self, path: &str, sink: &mut dyn OutputSink) -> EmitResult {
        emitter::emit_file(self, path, sink)
    }
}
