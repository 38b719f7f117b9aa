//! Line-oriented parser for the supported TypeScript subset.
//!
//! Each non-blank line holds one statement. A line that matches no statement
//! form yields a `Declaration or statement expected.` diagnostic covering the
//! line and is otherwise skipped.

use crate::ast::{
    Ident, Literal, MemberExpr, ParsedSource, PrimitiveType, Statement, StringLit,
    TypeAnnotation,
};
use kiln_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticPhase};
use kiln_source::{SourceFile, Span};

/// Parses `file` into statements and syntactic diagnostics.
pub fn parse(file: SourceFile) -> ParsedSource {
    let mut statements = Vec::new();
    let mut diagnostics = Vec::new();

    for (start, line) in file.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        let lead = (line.len() - line.trim_start().len()) as u32;
        let mut cursor = Cursor::new(trimmed, start + lead);
        let line_span = Span::new(start + lead, start + lead + trimmed.len() as u32);

        match parse_statement(&mut cursor, &mut diagnostics, &file.path) {
            Some(stmt) if cursor.at_statement_end() => statements.push(stmt),
            _ => diagnostics.push(
                Diagnostic::error(
                    DiagnosticPhase::Syntactic,
                    DiagnosticCode::STATEMENT_EXPECTED,
                    "Declaration or statement expected.",
                )
                .at(file.path.as_str(), line_span),
            ),
        }
    }

    ParsedSource {
        file,
        statements,
        diagnostics,
    }
}

fn parse_statement(
    cursor: &mut Cursor<'_>,
    diagnostics: &mut Vec<Diagnostic>,
    path: &str,
) -> Option<Statement> {
    let start = cursor.pos;
    if cursor.eat_word("import") {
        cursor.expect('*')?;
        cursor.eat_word("as").then_some(())?;
        let namespace = cursor.ident()?;
        cursor.eat_word("from").then_some(())?;
        let specifier = cursor.string()?;
        return Some(Statement::Import {
            namespace,
            specifier,
            span: cursor.span_from(start),
        });
    }

    if cursor.eat_word("export") {
        if cursor.eat('*') {
            cursor.eat_word("from").then_some(())?;
            let specifier = cursor.string()?;
            return Some(Statement::ExportStar {
                specifier,
                span: cursor.span_from(start),
            });
        }
        let declare = cursor.eat_word("declare");
        cursor.eat_word("const").then_some(())?;
        let name = cursor.ident()?;
        let annotation = if cursor.eat(':') {
            Some(parse_type(cursor, diagnostics, path)?)
        } else {
            None
        };
        let init = if cursor.eat('=') {
            let literal = cursor.literal()?;
            if declare {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticPhase::Syntactic,
                        DiagnosticCode::AMBIENT_INITIALIZER,
                        "Initializers are not allowed in ambient contexts.",
                    )
                    .at(path, literal.span()),
                );
            }
            Some(literal)
        } else {
            None
        };
        return Some(Statement::ExportConst {
            name,
            declare,
            annotation,
            init,
            span: cursor.span_from(start),
        });
    }

    let checkpoint = cursor.pos;
    let logged = cursor.eat_word("console")
        && cursor.eat('.')
        && cursor.eat_word("log")
        && cursor.eat('(');
    if !logged {
        cursor.pos = checkpoint;
    }
    let expr = parse_member(cursor)?;
    if logged {
        cursor.expect(')')?;
    }
    Some(Statement::Expression {
        expr,
        logged,
        span: cursor.span_from(start),
    })
}

fn parse_type(
    cursor: &mut Cursor<'_>,
    diagnostics: &mut Vec<Diagnostic>,
    path: &str,
) -> Option<TypeAnnotation> {
    let type_expected = |span: Span| {
        Diagnostic::error(
            DiagnosticPhase::Syntactic,
            DiagnosticCode::TYPE_EXPECTED,
            "Type expected.",
        )
        .at(path, span)
    };
    let Some(ident) = cursor.ident() else {
        diagnostics.push(type_expected(cursor.span_from(cursor.pos)));
        return None;
    };
    let ty = match ident.name.as_str() {
        "string" => PrimitiveType::String,
        "number" => PrimitiveType::Number,
        "any" => PrimitiveType::Any,
        _ => {
            diagnostics.push(type_expected(ident.span));
            return None;
        }
    };
    Some(TypeAnnotation {
        ty,
        span: ident.span,
    })
}

fn parse_member(cursor: &mut Cursor<'_>) -> Option<MemberExpr> {
    let namespace = cursor.ident()?;
    cursor.expect('.')?;
    let member = cursor.ident()?;
    let method = if cursor.eat('.') {
        let method = cursor.ident()?;
        cursor.expect('(')?;
        cursor.expect(')')?;
        Some(method)
    } else {
        None
    };
    Some(MemberExpr {
        namespace,
        member,
        method,
    })
}

/// A scanner over one trimmed line; offsets are absolute in the file.
struct Cursor<'a> {
    text: &'a str,
    base: u32,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, base: u32) -> Self {
        Self { text, base, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.base + start as u32, self.base + self.pos as u32)
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, ch: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ch: char) -> Option<()> {
        self.eat(ch).then_some(())
    }

    fn eat_word(&mut self, word: &str) -> bool {
        self.skip_ws();
        let rest = self.rest();
        let matched = rest.starts_with(word)
            && rest[word.len()..]
                .chars()
                .next()
                .map_or(true, |c| !is_ident_char(c));
        if matched {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<Ident> {
        self.skip_ws();
        let rest = self.rest();
        let first = rest.chars().next()?;
        if !(first.is_alphabetic() || first == '_' || first == '$') {
            return None;
        }
        let len = rest
            .char_indices()
            .find(|&(_, c)| !is_ident_char(c))
            .map_or(rest.len(), |(i, _)| i);
        let start = self.pos;
        self.pos += len;
        Some(Ident {
            name: rest[..len].to_string(),
            span: self.span_from(start),
        })
    }

    fn string(&mut self) -> Option<StringLit> {
        self.skip_ws();
        let rest = self.rest();
        let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let mut value = String::new();
        let mut escaped = false;
        for (i, c) in rest.char_indices().skip(1) {
            if escaped {
                value.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                let start = self.pos;
                self.pos += i + 1;
                return Some(StringLit {
                    value,
                    span: self.span_from(start),
                });
            } else {
                value.push(c);
            }
        }
        None
    }

    fn number(&mut self) -> Option<Literal> {
        self.skip_ws();
        let rest = self.rest();
        let sign = usize::from(rest.starts_with('-'));
        let digits = rest[sign..]
            .char_indices()
            .find(|&(_, c)| !(c.is_ascii_digit() || c == '.'))
            .map_or(rest.len() - sign, |(i, _)| i);
        let text = &rest[..sign + digits];
        if digits == 0 || text.ends_with('.') || text.matches('.').count() > 1 {
            return None;
        }
        let start = self.pos;
        self.pos += text.len();
        Some(Literal::Number {
            text: text.to_string(),
            span: self.span_from(start),
        })
    }

    fn literal(&mut self) -> Option<Literal> {
        match self.string() {
            Some(lit) => Some(Literal::String(lit)),
            None => self.number(),
        }
    }

    /// Accepts an optional `;` followed by nothing or a line comment.
    fn at_statement_end(&mut self) -> bool {
        self.eat(';');
        self.skip_ws();
        let rest = self.rest();
        rest.is_empty() || rest.starts_with("//")
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
