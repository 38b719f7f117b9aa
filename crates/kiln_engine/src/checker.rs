//! Semantic checks: module resolution, export lookup and method existence.

use crate::ast::{PrimitiveType, Statement};
use crate::program::ReferenceProgram;
use kiln_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticPhase};
use std::collections::HashSet;

/// Computes the semantic diagnostics of `path` in `program`.
///
/// Returns nothing for files outside the program.
pub fn check(program: &ReferenceProgram, path: &str) -> Vec<Diagnostic> {
    let Some(file) = program.file(path) else {
        return Vec::new();
    };
    let strict = program.options().strict;
    let mut diags = Vec::new();

    for stmt in &file.statements {
        match stmt {
            Statement::Import { specifier, .. } | Statement::ExportStar { specifier, .. } => {
                if program.resolution(path, &specifier.value).is_none() {
                    diags.push(
                        semantic(
                            DiagnosticCode::CANNOT_FIND_MODULE,
                            format!(
                                "Cannot find module '{}' or its corresponding type declarations.",
                                specifier.value
                            ),
                        )
                        .at(path, specifier.span),
                    );
                }
            }
            Statement::ExportConst {
                name,
                annotation,
                init,
                ..
            } => match (annotation, init) {
                (Some(annotation), Some(init))
                    if annotation.ty != PrimitiveType::Any && annotation.ty != init.ty() =>
                {
                    diags.push(
                        semantic(
                            DiagnosticCode::NOT_ASSIGNABLE,
                            format!(
                                "Type '{}' is not assignable to type '{}'.",
                                init.ty(),
                                annotation.ty
                            ),
                        )
                        .at(path, init.span()),
                    );
                }
                (None, None) if strict => {
                    diags.push(
                        semantic(
                            DiagnosticCode::IMPLICIT_ANY,
                            format!("Variable '{}' implicitly has an 'any' type.", name.name),
                        )
                        .at(path, name.span),
                    );
                }
                _ => {}
            },
            Statement::Expression { expr, .. } => {
                let binding = file.statements.iter().find_map(|s| match s {
                    Statement::Import {
                        namespace,
                        specifier,
                        ..
                    } if namespace.name == expr.namespace.name => Some(specifier),
                    _ => None,
                });
                let Some(specifier) = binding else {
                    diags.push(
                        semantic(
                            DiagnosticCode::CANNOT_FIND_NAME,
                            format!("Cannot find name '{}'.", expr.namespace.name),
                        )
                        .at(path, expr.namespace.span),
                    );
                    continue;
                };
                // An unresolved import has already been reported.
                let Some(target) = program.resolution(path, &specifier.value) else {
                    continue;
                };
                let Some(ty) = export_type(program, target, &expr.member.name) else {
                    diags.push(
                        semantic(
                            DiagnosticCode::PROPERTY_DOES_NOT_EXIST,
                            format!(
                                "Property '{}' does not exist on type 'typeof import(\"{}\")'.",
                                expr.member.name, specifier.value
                            ),
                        )
                        .at(path, expr.member.span),
                    );
                    continue;
                };
                if let Some(method) = &expr.method {
                    if !ty.has_method(&method.name) {
                        diags.push(
                            semantic(
                                DiagnosticCode::PROPERTY_DOES_NOT_EXIST,
                                format!(
                                    "Property '{}' does not exist on type '{ty}'.",
                                    method.name
                                ),
                            )
                            .at(path, method.span),
                        );
                    }
                }
            }
        }
    }
    diags
}

/// Looks up the type of export `name` of `module`, following `export *`.
pub fn export_type(program: &ReferenceProgram, module: &str, name: &str) -> Option<PrimitiveType> {
    let mut visited = HashSet::new();
    lookup(program, module, name, &mut visited)
}

fn lookup<'p>(
    program: &'p ReferenceProgram,
    module: &'p str,
    name: &str,
    visited: &mut HashSet<&'p str>,
) -> Option<PrimitiveType> {
    if !visited.insert(module) {
        return None;
    }
    let file = program.file(module)?;
    for stmt in &file.statements {
        if let Statement::ExportConst {
            name: export,
            annotation,
            init,
            ..
        } = stmt
        {
            if export.name == name {
                let ty = annotation
                    .as_ref()
                    .map(|a| a.ty)
                    .or_else(|| init.as_ref().map(|i| i.ty()))
                    .unwrap_or(PrimitiveType::Any);
                return Some(ty);
            }
        }
    }
    file.statements
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::ExportStar { specifier, .. } => program.resolution(module, &specifier.value),
            _ => None,
        })
        .find_map(|target| lookup(program, target, name, visited))
}

fn semantic(code: DiagnosticCode, message: String) -> Diagnostic {
    Diagnostic::error(DiagnosticPhase::Semantic, code, message)
}
