//! Watch-mode program for the reference engine.
//!
//! The program subscribes a file watcher for every file it loaded (and for
//! every missing root) and a recursive directory watcher on every failed
//! lookup location, the directory below which an unresolved import could
//! still appear. Callbacks only record what changed;
//! the rebuild happens on the next [`WatchProgram::program`] query.

use crate::api::WatchProgram;
use crate::ast::ParsedSource;
use crate::error::EngineError;
use crate::program::{build_program, ProgramInputs, ReferenceProgram};
use kiln_cache::SourceCache;
use kiln_config::CompilerOptions;
use kiln_source::FileSystemHost;
use kiln_watch::{WatchCloser, WatchEventKind, WatchRegistry};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use tracing::debug;

/// Changes recorded by watcher callbacks since the last build.
#[derive(Debug, Default)]
struct PendingChanges {
    /// Files whose watcher fired; re-parsed on the next build.
    files: BTreeSet<String>,
    /// Set when a directory watcher fired; failed lookups are retried.
    rescan: bool,
}

impl PendingChanges {
    fn is_empty(&self) -> bool {
        self.files.is_empty() && !self.rescan
    }
}

/// A reference-engine program kept current by change notifications.
pub struct ReferenceWatchProgram {
    registry: WatchRegistry,
    roots: Vec<String>,
    options: CompilerOptions,
    pending: Rc<RefCell<PendingChanges>>,
    roots_changed: bool,
    file_watchers: BTreeMap<String, WatchCloser>,
    directory_watchers: BTreeMap<String, WatchCloser>,
    program: Option<ReferenceProgram>,
    builds: usize,
}

impl ReferenceWatchProgram {
    /// Creates the program, performs the initial build and subscribes watchers.
    pub fn create(
        roots: &[String],
        options: &CompilerOptions,
        host: &dyn FileSystemHost,
        sources: &mut SourceCache<ParsedSource>,
        registry: &WatchRegistry,
    ) -> Result<Self, EngineError> {
        let mut watch = Self {
            registry: registry.clone(),
            roots: roots.to_vec(),
            options: options.clone(),
            pending: Rc::default(),
            roots_changed: false,
            file_watchers: BTreeMap::new(),
            directory_watchers: BTreeMap::new(),
            program: None,
            builds: 0,
        };
        watch.rebuild(host, sources, BTreeSet::new())?;
        Ok(watch)
    }

    /// The settings this program was created with.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Number of builds performed, the initial one included.
    pub fn build_count(&self) -> usize {
        self.builds
    }

    /// Paths with a live file watcher owned by this program.
    pub fn watched_files(&self) -> impl Iterator<Item = &str> {
        self.file_watchers.keys().map(String::as_str)
    }

    /// Paths with a live directory watcher owned by this program.
    pub fn watched_directories(&self) -> impl Iterator<Item = &str> {
        self.directory_watchers.keys().map(String::as_str)
    }

    fn rebuild(
        &mut self,
        host: &dyn FileSystemHost,
        sources: &mut SourceCache<ParsedSource>,
        force: BTreeSet<String>,
    ) -> Result<(), EngineError> {
        let previous = self.program.take();
        let program = build_program(ProgramInputs {
            roots: &self.roots,
            options: &self.options,
            host,
            sources,
            previous: previous.as_ref(),
            force: &force,
        });
        let program = match program {
            Ok(program) => program,
            Err(err) => {
                self.program = previous;
                return Err(err);
            }
        };
        self.builds += 1;
        self.roots_changed = false;
        debug!(build = self.builds, forced = force.len(), "watch program rebuilt");
        self.reconcile_watchers(&program)?;
        self.program = Some(program);
        Ok(())
    }

    fn reconcile_watchers(&mut self, program: &ReferenceProgram) -> Result<(), EngineError> {
        let wanted_files: BTreeSet<String> = program
            .load_order()
            .iter()
            .chain(program.missing_roots())
            .cloned()
            .collect();
        let wanted_dirs = program.failed_lookup_locations();

        self.file_watchers.retain(|path, closer| {
            let keep = wanted_files.contains(path);
            if !keep {
                closer.close();
            }
            keep
        });
        self.directory_watchers.retain(|path, closer| {
            let keep = wanted_dirs.contains(path);
            if !keep {
                closer.close();
            }
            keep
        });

        for path in wanted_files {
            if self.file_watchers.contains_key(&path) {
                continue;
            }
            let pending = Rc::clone(&self.pending);
            let closer = self.registry.watch_file(&path, move |changed, kind| {
                debug!(path = changed, %kind, "source changed");
                let mut pending = pending.borrow_mut();
                pending.files.insert(changed.to_string());
                if kind != WatchEventKind::Changed {
                    pending.rescan = true;
                }
            })?;
            self.file_watchers.insert(path, closer);
        }
        for dir in wanted_dirs {
            if self.directory_watchers.contains_key(&dir) {
                continue;
            }
            let pending = Rc::clone(&self.pending);
            let closer = self.registry.watch_directory(
                &dir,
                move |changed| {
                    debug!(path = changed, "failed lookup location changed");
                    pending.borrow_mut().rescan = true;
                },
                true,
            )?;
            self.directory_watchers.insert(dir, closer);
        }
        Ok(())
    }
}

impl WatchProgram for ReferenceWatchProgram {
    type Parsed = ParsedSource;
    type Handle = ReferenceProgram;

    fn update_root_file_names(&mut self, roots: &[String]) {
        if self.roots != roots {
            self.roots = roots.to_vec();
            self.roots_changed = true;
        }
    }

    fn program(
        &mut self,
        host: &dyn FileSystemHost,
        sources: &mut SourceCache<ParsedSource>,
    ) -> Result<&ReferenceProgram, EngineError> {
        if self.program.is_none() {
            return Err(EngineError::Closed);
        }
        let changes = std::mem::take(&mut *self.pending.borrow_mut());
        if !changes.is_empty() || self.roots_changed {
            self.rebuild(host, sources, changes.files)?;
        }
        self.program.as_ref().ok_or(EngineError::Closed)
    }

    fn close(&mut self) {
        for closer in self.file_watchers.values() {
            closer.close();
        }
        for closer in self.directory_watchers.values() {
            closer.close();
        }
        self.file_watchers.clear();
        self.directory_watchers.clear();
        self.program = None;
        debug!("watch program closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Program;
    use kiln_source::{RoundSnapshot, VirtualFileStore};

    const A: &str = "import * as b from \"./module/b\";\nconsole.log(b.GLOBAL_VAR);\n";
    const B: &str = "export declare const GLOBAL_VAR: string;\n";

    fn options() -> CompilerOptions {
        CompilerOptions {
            no_lib: true,
            ..CompilerOptions::default()
        }
    }

    #[test]
    fn initial_build_subscribes_loaded_files() {
        let mut host = VirtualFileStore::new();
        host.apply(RoundSnapshot::from_pairs([("/a.ts", A), ("/module/b.d.ts", B)]));
        let registry = WatchRegistry::new();
        let mut sources = SourceCache::new();
        let roots = vec!["/a.ts".to_string()];
        let watch =
            ReferenceWatchProgram::create(&roots, &options(), &host, &mut sources, &registry)
                .unwrap();
        assert_eq!(
            watch.watched_files().collect::<Vec<_>>(),
            vec!["/a.ts", "/module/b.d.ts"]
        );
        assert_eq!(watch.watched_directories().count(), 0);
        assert!(registry.is_watching_file("/module/b.d.ts"));
    }

    #[test]
    fn no_notification_means_no_rebuild() {
        let mut host = VirtualFileStore::new();
        host.apply(RoundSnapshot::from_pairs([("/a.ts", A), ("/module/b.d.ts", B)]));
        let registry = WatchRegistry::new();
        let mut sources = SourceCache::new();
        let roots = vec!["/a.ts".to_string()];
        let mut watch =
            ReferenceWatchProgram::create(&roots, &options(), &host, &mut sources, &registry)
                .unwrap();
        watch.update_root_file_names(&roots);
        watch.program(&host, &mut sources).unwrap();
        assert_eq!(watch.build_count(), 1);
    }

    #[test]
    fn delete_then_restore_through_notifications() {
        let mut host = VirtualFileStore::new();
        host.apply(RoundSnapshot::from_pairs([("/a.ts", A), ("/module/b.d.ts", B)]));
        let registry = WatchRegistry::new();
        let mut sources = SourceCache::new();
        let roots = vec!["/a.ts".to_string()];
        let mut watch =
            ReferenceWatchProgram::create(&roots, &options(), &host, &mut sources, &registry)
                .unwrap();

        host.apply(RoundSnapshot::from_pairs([("/a.ts", A)]));
        registry.notify("/module/b.d.ts", WatchEventKind::Deleted);
        let program = watch.program(&host, &mut sources).unwrap();
        assert_eq!(program.semantic_diagnostics("/a.ts").len(), 1);
        assert!(!registry.is_watching_file("/module/b.d.ts"));
        assert!(registry.directory_watcher("/module").unwrap().recursive);

        host.apply(RoundSnapshot::from_pairs([("/a.ts", A), ("/module/b.d.ts", B)]));
        registry.notify("/module/b.d.ts", WatchEventKind::Created);
        let program = watch.program(&host, &mut sources).unwrap();
        assert!(program.semantic_diagnostics("/a.ts").is_empty());
        assert_eq!(watch.build_count(), 3);
        assert!(!registry.is_watching_directory("/module"));
    }

    #[test]
    fn close_releases_every_watcher() {
        let mut host = VirtualFileStore::new();
        host.apply(RoundSnapshot::from_pairs([("/a.ts", A)]));
        let registry = WatchRegistry::new();
        let mut sources = SourceCache::new();
        let roots = vec!["/a.ts".to_string()];
        let mut watch =
            ReferenceWatchProgram::create(&roots, &options(), &host, &mut sources, &registry)
                .unwrap();
        assert_eq!(registry.directory_watcher_count(), 1);
        watch.close();
        assert_eq!(registry.file_watcher_count(), 0);
        assert_eq!(registry.directory_watcher_count(), 0);
        assert_eq!(
            watch.program(&host, &mut sources).unwrap_err(),
            EngineError::Closed
        );
    }

    #[test]
    fn upward_import_is_watched_where_it_resolves() {
        const SRC_A: &str = "import * as b from \"../module/b\";\nconsole.log(b.GLOBAL_VAR);\n";
        let mut host = VirtualFileStore::new();
        host.apply(RoundSnapshot::from_pairs([("/src/a.ts", SRC_A)]));
        let registry = WatchRegistry::new();
        let mut sources = SourceCache::new();
        let roots = vec!["/src/a.ts".to_string()];
        let mut watch =
            ReferenceWatchProgram::create(&roots, &options(), &host, &mut sources, &registry)
                .unwrap();
        assert_eq!(watch.watched_directories().collect::<Vec<_>>(), vec!["/module"]);
        assert!(!registry.is_watching_directory("/src"));

        host.apply(RoundSnapshot::from_pairs([("/src/a.ts", SRC_A), ("/module/b.d.ts", B)]));
        assert_eq!(registry.notify("/module/b.d.ts", WatchEventKind::Created), 1);
        let program = watch.program(&host, &mut sources).unwrap();
        assert!(program.semantic_diagnostics("/src/a.ts").is_empty());
        assert_eq!(watch.watched_directories().count(), 0);
    }
}