//! JavaScript emission for root files.

use crate::api::{EmitResult, OutputSink};
use crate::ast::{Literal, MemberExpr, ParsedSource, Statement};
use crate::program::ReferenceProgram;
use kiln_common::join;
use kiln_config::{CompilerOptions, ModuleKind, ScriptTarget};
use kiln_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticPhase};

/// Output path of the source file `path`.
///
/// With an `out_dir` the source's absolute path is re-rooted under it;
/// otherwise the output sits next to the source.
pub fn output_path(path: &str, out_dir: Option<&str>) -> String {
    let stem = path.strip_suffix(".ts").unwrap_or(path);
    let js = format!("{stem}.js");
    match out_dir {
        Some(dir) => join(dir, js.trim_start_matches('/')),
        None => js,
    }
}

/// Emits `path` from `program` into `sink`.
///
/// Declaration files and paths outside the program are skipped. An output
/// that would overwrite a program input is reported and not written.
pub fn emit_file(program: &ReferenceProgram, path: &str, sink: &mut dyn OutputSink) -> EmitResult {
    let Some(file) = program.file(path).filter(|f| !f.is_declaration()) else {
        return EmitResult {
            skipped: true,
            ..EmitResult::default()
        };
    };
    let options = program.options();
    let out = output_path(path, options.out_dir.as_deref());

    if program.file(&out).is_some() {
        return EmitResult {
            diagnostics: vec![Diagnostic::error(
                DiagnosticPhase::Emit,
                DiagnosticCode::OVERWRITES_INPUT,
                format!("Cannot write file '{out}' because it would overwrite input file."),
            )
            .in_file(path)],
            ..EmitResult::default()
        };
    }

    sink.write_output(&out, &lower(file, options));
    EmitResult {
        emitted: vec![out],
        ..EmitResult::default()
    }
}

/// Renders `file` as JavaScript for the module system and target in `options`.
pub fn lower(file: &ParsedSource, options: &CompilerOptions) -> String {
    let binding = if options.target == ScriptTarget::Es5 {
        "var"
    } else {
        "const"
    };
    let commonjs = options.module == ModuleKind::CommonJs;
    let is_module = file.statements.iter().any(|s| {
        matches!(
            s,
            Statement::Import { .. } | Statement::ExportStar { .. } | Statement::ExportConst { .. }
        )
    });

    let mut out = String::new();
    if commonjs {
        out.push_str("\"use strict\";\n");
        if is_module {
            out.push_str("Object.defineProperty(exports, \"__esModule\", { value: true });\n");
        }
    }

    for stmt in &file.statements {
        let line = match stmt {
            Statement::Import {
                namespace,
                specifier,
                ..
            } => {
                let spec = quote(&specifier.value);
                if commonjs {
                    format!("{binding} {} = require({spec});", namespace.name)
                } else {
                    format!("import * as {} from {spec};", namespace.name)
                }
            }
            Statement::ExportStar { specifier, .. } => {
                let spec = quote(&specifier.value);
                if commonjs {
                    format!("Object.assign(exports, require({spec}));")
                } else {
                    format!("export * from {spec};")
                }
            }
            Statement::ExportConst {
                name,
                declare: false,
                init: Some(init),
                ..
            } => {
                let value = literal(init);
                if commonjs {
                    format!("exports.{} = {value};", name.name)
                } else {
                    format!("export {binding} {} = {value};", name.name)
                }
            }
            Statement::ExportConst { .. } => continue,
            Statement::Expression { expr, logged, .. } => {
                if *logged {
                    format!("console.log({});", member(expr))
                } else {
                    format!("{};", member(expr))
                }
            }
        };
        out.push_str(&line);
        out.push('\n');
    }

    if !commonjs && !is_module {
        out.push_str("export {};\n");
    }
    out
}

fn member(expr: &MemberExpr) -> String {
    match &expr.method {
        Some(method) => format!(
            "{}.{}.{}()",
            expr.namespace.name, expr.member.name, method.name
        ),
        None => format!("{}.{}", expr.namespace.name, expr.member.name),
    }
}

fn literal(lit: &Literal) -> String {
    match lit {
        Literal::String(s) => quote(&s.value),
        Literal::Number { text, .. } => text.clone(),
    }
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use kiln_source::SourceFile;

    fn lowered(text: &str, options: &CompilerOptions) -> String {
        lower(&parse(SourceFile::new("/a.ts", text)), options)
    }

    #[test]
    fn output_paths() {
        assert_eq!(output_path("/a.ts", Some("/out")), "/out/a.js");
        assert_eq!(output_path("/src/m/x.ts", Some("/dist/")), "/dist/src/m/x.js");
        assert_eq!(output_path("/a.ts", None), "/a.js");
    }

    #[test]
    fn commonjs_lowering() {
        let js = lowered(
            "import * as b from \"./module/b\";\nexport const N = 3;\nconsole.log(b.X.trim());\n",
            &CompilerOptions::default(),
        );
        assert_eq!(
            js,
            "\"use strict\";\n\
             Object.defineProperty(exports, \"__esModule\", { value: true });\n\
             const b = require(\"./module/b\");\n\
             exports.N = 3;\n\
             console.log(b.X.trim());\n"
        );
    }

    #[test]
    fn es2015_module_with_es5_target() {
        let options = CompilerOptions {
            module: ModuleKind::Es2015,
            target: ScriptTarget::Es5,
            ..CompilerOptions::default()
        };
        let js = lowered("export * from './x';\nexport const S = 'q\"';\n", &options);
        assert_eq!(js, "export * from \"./x\";\nexport var S = \"q\\\"\";\n");
    }

    #[test]
    fn declare_consts_emit_nothing() {
        let options = CompilerOptions {
            module: ModuleKind::Es2015,
            ..CompilerOptions::default()
        };
        let js = lowered("export declare const X: string;\n", &options);
        assert_eq!(js, "");
    }
}
