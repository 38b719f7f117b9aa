//! Syntax tree of the supported TypeScript subset.

use kiln_diagnostics::Diagnostic;
use kiln_source::{SourceFile, Span};
use std::fmt;

/// An identifier with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    /// The identifier text.
    pub name: String,
    /// Location in the file.
    pub span: Span,
}

/// A string literal; the span covers the quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLit {
    /// The unquoted value.
    pub value: String,
    /// Location in the file.
    pub span: Span,
}

/// A primitive type as written in an annotation or inferred from a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    /// `string`
    String,
    /// `number`
    Number,
    /// No annotation and no initializer.
    Any,
}

impl PrimitiveType {
    /// Returns `true` if values of this type have the method `name`.
    pub fn has_method(self, name: &str) -> bool {
        const SHARED: &[&str] = &["toString", "valueOf"];
        const STRING: &[&str] = &["toUpperCase", "toLowerCase", "trim", "charAt"];
        const NUMBER: &[&str] = &["toFixed", "toPrecision"];
        match self {
            PrimitiveType::Any => true,
            PrimitiveType::String => SHARED.contains(&name) || STRING.contains(&name),
            PrimitiveType::Number => SHARED.contains(&name) || NUMBER.contains(&name),
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::String => write!(f, "string"),
            PrimitiveType::Number => write!(f, "number"),
            PrimitiveType::Any => write!(f, "any"),
        }
    }
}

/// A type annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAnnotation {
    /// The annotated type.
    pub ty: PrimitiveType,
    /// Location of the type name.
    pub span: Span,
}

/// A literal initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// A string literal.
    String(StringLit),
    /// A numeric literal, kept as written.
    Number {
        /// Source text of the number.
        text: String,
        /// Location in the file.
        span: Span,
    },
}

impl Literal {
    /// The type of the literal.
    pub fn ty(&self) -> PrimitiveType {
        match self {
            Literal::String(_) => PrimitiveType::String,
            Literal::Number { .. } => PrimitiveType::Number,
        }
    }

    /// Location of the literal.
    pub fn span(&self) -> Span {
        match self {
            Literal::String(lit) => lit.span,
            Literal::Number { span, .. } => *span,
        }
    }
}

/// `NS.NAME` optionally followed by `.method()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberExpr {
    /// The namespace binding.
    pub namespace: Ident,
    /// The accessed export.
    pub member: Ident,
    /// A zero-argument method called on the export.
    pub method: Option<Ident>,
}

/// One statement of the subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `import * as NS from "SPEC";`
    Import {
        /// The namespace binding.
        namespace: Ident,
        /// The module specifier.
        specifier: StringLit,
        /// Whole statement.
        span: Span,
    },
    /// `export * from "SPEC";`
    ExportStar {
        /// The module specifier.
        specifier: StringLit,
        /// Whole statement.
        span: Span,
    },
    /// `export [declare] const NAME[: T][ = LIT];`
    ExportConst {
        /// The exported name.
        name: Ident,
        /// Whether the declaration is ambient.
        declare: bool,
        /// Type annotation, if written.
        annotation: Option<TypeAnnotation>,
        /// Initializer, if written.
        init: Option<Literal>,
        /// Whole statement.
        span: Span,
    },
    /// `console.log(EXPR);` or `EXPR;`
    Expression {
        /// The evaluated expression.
        expr: MemberExpr,
        /// Whether the expression is wrapped in `console.log`.
        logged: bool,
        /// Whole statement.
        span: Span,
    },
}

impl Statement {
    /// The module specifier of an import or re-export.
    pub fn specifier(&self) -> Option<&StringLit> {
        match self {
            Statement::Import { specifier, .. } | Statement::ExportStar { specifier, .. } => {
                Some(specifier)
            }
            _ => None,
        }
    }
}

/// The parsed representation stored in the source cache.
#[derive(Debug)]
pub struct ParsedSource {
    /// The text that was parsed.
    pub file: SourceFile,
    /// Statements in source order.
    pub statements: Vec<Statement>,
    /// Syntactic diagnostics found while parsing.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedSource {
    /// The path the text was read from.
    pub fn path(&self) -> &str {
        &self.file.path
    }

    /// Returns `true` for `.d.ts` declaration files.
    pub fn is_declaration(&self) -> bool {
        self.file.path.ends_with(".d.ts")
    }

    /// Module specifiers in source order, imports and re-exports alike.
    pub fn specifiers(&self) -> impl Iterator<Item = &StringLit> {
        self.statements.iter().filter_map(Statement::specifier)
    }
}
