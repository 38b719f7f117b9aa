//! The reference engine: the subset parser, resolver and checker behind the
//! [`Engine`] boundary.

use crate::api::{BuildRequest, Engine, WatchRequest};
use crate::ast::ParsedSource;
use crate::error::EngineError;
use crate::program::{build_program, ProgramInputs, ReferenceProgram};
use crate::watch::ReferenceWatchProgram;
use std::collections::BTreeSet;

/// Engine for the supported TypeScript subset.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceEngine;

impl ReferenceEngine {
    /// Creates the engine.
    pub fn new() -> Self {
        Self
    }
}

impl Engine for ReferenceEngine {
    type Parsed = ParsedSource;
    type Handle = ReferenceProgram;
    type Watch = ReferenceWatchProgram;

    fn build(
        &self,
        request: BuildRequest<'_, ParsedSource, ReferenceProgram>,
    ) -> Result<ReferenceProgram, EngineError> {
        build_program(ProgramInputs {
            roots: request.root_paths,
            options: request.options,
            host: request.host,
            sources: request.sources,
            previous: request.previous,
            force: &BTreeSet::new(),
        })
    }

    fn create_watch_program(
        &self,
        request: WatchRequest<'_, ParsedSource>,
    ) -> Result<ReferenceWatchProgram, EngineError> {
        ReferenceWatchProgram::create(
            request.root_paths,
            request.options,
            request.host,
            request.sources,
            request.registry,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{OutputSink, Program, WatchProgram};
    use kiln_cache::SourceCache;
    use kiln_config::CompilerOptions;
    use kiln_source::{RoundSnapshot, VirtualFileStore};
    use kiln_watch::WatchRegistry;

    #[derive(Default)]
    struct Collect(Vec<(String, String)>);

    impl OutputSink for Collect {
        fn write_output(&mut self, path: &str, text: &str) {
            self.0.push((path.to_string(), text.to_string()));
        }
    }

    fn host() -> VirtualFileStore {
        let mut host = VirtualFileStore::new();
        host.apply(RoundSnapshot::from_pairs([
            ("/a.ts", "import * as b from \"./b\";\nconsole.log(b.X);\n"),
            ("/b.ts", "export const X = \"x\";\n"),
        ]));
        host
    }

    #[test]
    fn batch_build_and_emit() {
        let host = host();
        let mut sources = SourceCache::new();
        let options = CompilerOptions {
            no_lib: true,
            out_dir: Some("/out".into()),
            ..CompilerOptions::default()
        };
        let roots = vec!["/a.ts".to_string(), "/b.ts".to_string()];
        let program = ReferenceEngine
            .build(BuildRequest {
                root_paths: &roots,
                options: &options,
                host: &host,
                sources: &mut sources,
                previous: None,
            })
            .unwrap();
        assert!(program.semantic_diagnostics("/a.ts").is_empty());

        let mut sink = Collect::default();
        let result = program.emit("/a.ts", &mut sink);
        assert_eq!(result.emitted, vec!["/out/a.js"]);
        assert_eq!(sink.0[0].0, "/out/a.js");
    }

    #[test]
    fn emit_over_input_is_reported() {
        let mut host = host();
        host.apply(RoundSnapshot::from_pairs([
            ("/a.ts", "console.log(b.X);\n"),
            ("/a.js", ""),
        ]));
        let mut sources = SourceCache::new();
        let options = CompilerOptions {
            no_lib: true,
            ..CompilerOptions::default()
        };
        let roots = vec!["/a.ts".to_string(), "/a.js".to_string()];
        let program = ReferenceEngine
            .build(BuildRequest {
                root_paths: &roots,
                options: &options,
                host: &host,
                sources: &mut sources,
                previous: None,
            })
            .unwrap();
        let mut sink = Collect::default();
        let result = program.emit("/a.ts", &mut sink);
        assert_eq!(result.diagnostics[0].code.number(), 5055);
        assert!(sink.0.is_empty());
        assert!(program.emit("/nope.ts", &mut sink).skipped);
    }

    #[test]
    fn watch_program_through_engine() {
        let host = host();
        let registry = WatchRegistry::new();
        let mut sources = SourceCache::new();
        let options = CompilerOptions {
            no_lib: true,
            ..CompilerOptions::default()
        };
        let roots = vec!["/a.ts".to_string()];
        let mut watch = ReferenceEngine
            .create_watch_program(WatchRequest {
                root_paths: &roots,
                options: &options,
                host: &host,
                sources: &mut sources,
                registry: &registry,
            })
            .unwrap();
        let program = watch.program(&host, &mut sources).unwrap();
        assert_eq!(program.source_paths(), vec!["/a.ts", "/b.ts"]);
        watch.close();
        assert_eq!(registry.file_watcher_count(), 0);
    }
}
