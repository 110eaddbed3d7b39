//! Tokenization and parsing.

pub mod error;
pub mod parser;

pub use error::{LexError, ParseError, ParseErrorKind, Span};
pub use parser::{parse, parse_with_max_depth, FormulaParser, Rule, DEFAULT_MAX_DEPTH};


#[cfg(test)]
mod precedence_test;
