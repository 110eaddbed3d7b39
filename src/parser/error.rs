//! Parse error taxonomy and conversion from pest errors.

use core::ops::Range;

use thiserror::Error;

use crate::parser::Rule;

/// A byte range in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span(pub Range<usize>);

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self(start..end)
    }

    pub fn str_of<'a>(&self, source: &'a str) -> &'a str {
        &source[self.0.start..self.0.end]
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(s: pest::Span<'_>) -> Self {
        Self(s.start()..s.end())
    }
}

/// A character the tokenizer has no pattern for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid character `{character}` at position {position}")]
pub struct LexError {
    pub character: char,
    pub position: usize,
}

/// Specific kinds of parse failures.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error(transparent)]
    Lex(#[from] LexError),
    /// A well-formed token in a position no production allows.
    #[error("unexpected `{found}`, expected {expected}")]
    UnexpectedToken { expected: String, found: String },
    /// Input ended in the middle of a production.
    #[error("incomplete expression")]
    IncompleteExpression,
    #[error("invalid number literal `{text}`")]
    InvalidNumber { text: String },
    /// Nesting too deep for the configured recursion limit.
    #[error("expression nesting depth exceeds the maximum of {max_depth}")]
    MaxDepthExceeded { max_depth: usize },
}

/// Parse error with the offending location.
#[derive(Debug, Error)]
#[error("{kind} (at offset {})", .span.0.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Characters that can begin or continue some token of the language. An
/// error positioned on anything else is a tokenizer failure, not a grammar
/// one.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '_' | '+' | '-' | '*' | '/' | '^' | '(' | ')' | '<' | '>' | '=' | '!' | ',' | '.'
                | '"' | ' ' | '\t'
        )
}

/// Human-readable name for a grammar rule, for "expected ..." messages.
fn rule_name(rule: &Rule) -> &'static str {
    match rule {
        Rule::EOI => "end of input",
        Rule::expression | Rule::main => "an expression",
        Rule::primary | Rule::grouped => "an expression",
        Rule::number | Rule::real => "a number",
        Rule::text => "a text literal",
        Rule::boolean => "a boolean",
        Rule::ident | Rule::variable | Rule::call => "an identifier",
        Rule::argument_list => "an argument list",
        Rule::conditional | Rule::kw_if => "IF",
        Rule::kw_then => "THEN",
        Rule::kw_else => "ELSE",
        Rule::infix | Rule::add | Rule::sub | Rule::mul | Rule::div | Rule::pow => "an operator",
        Rule::and | Rule::or | Rule::eq | Rule::ne | Rule::lt | Rule::le | Rule::gt | Rule::ge => {
            "an operator"
        }
        Rule::prefix | Rule::neg | Rule::not => "an operator",
        _ => "an expression",
    }
}

fn format_expected(positives: &[Rule]) -> String {
    let mut names: Vec<&'static str> = Vec::new();
    for rule in positives {
        let name = rule_name(rule);
        if !names.contains(&name) {
            names.push(name);
        }
    }
    if names.is_empty() {
        "an expression".to_string()
    } else {
        names.join(" or ")
    }
}

/// Convert a pest error into the crate's taxonomy: end-of-input becomes
/// `IncompleteExpression`, an illegal character becomes `Lex`, anything
/// else an `UnexpectedToken` at the reported offset.
pub(super) fn convert_pest_error(err: pest::error::Error<Rule>, source: &str) -> ParseError {
    use pest::error::{ErrorVariant, InputLocation};

    let (start, end) = match err.location {
        InputLocation::Pos(pos) => (pos, pos),
        InputLocation::Span((s, e)) => (s, e),
    };
    let span = Span::new(start, end.max(start));

    if start >= source.len() {
        return ParseError::new(ParseErrorKind::IncompleteExpression, span);
    }

    if let Some(character) = source[start..].chars().next() {
        if !is_token_char(character) {
            return ParseError::new(
                ParseErrorKind::Lex(LexError {
                    character,
                    position: start,
                }),
                span,
            );
        }
    }

    let kind = match err.variant {
        ErrorVariant::ParsingError { positives, .. } => {
            let found: String = source[start..]
                .chars()
                .take_while(|c| !c.is_whitespace())
                .take(12)
                .collect();
            ParseErrorKind::UnexpectedToken {
                expected: format_expected(&positives),
                found,
            }
        }
        ErrorVariant::CustomError { message } => ParseErrorKind::UnexpectedToken {
            expected: "an expression".to_string(),
            found: message,
        },
    };
    ParseError::new(kind, span)
}
