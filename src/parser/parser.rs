//! Grammar-driven parsing into expression trees.
//!
//! The grammar lives in `expression.pest`; precedence and associativity are
//! declared on the Pratt table below, lowest binding power first. Each
//! reduction builds its node through the [`Expr`] combinators, so the parser
//! and host code composing expressions programmatically go through the same
//! constructors.

use lazy_static::lazy_static;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;
use tracing::trace;

use crate::ast::Expr;
use crate::parser::error::{convert_pest_error, ParseError, ParseErrorKind, Span};
use crate::values::Number;

/// Recursion limit for nested expressions, shared by the nesting pre-check
/// and the tree-building walk.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Parser)]
#[grammar = "parser/expression.pest"]
pub struct FormulaParser;

lazy_static! {
    // Note: precedence is declared lowest to highest. The table deliberately
    // keeps the source language's unusual shape: comparisons bind tighter
    // than NOT and arithmetic, and unary minus binds tightest of all, so
    // `-2 ^ 2` is `(-2) ^ 2`. Exponentiation is right-associative.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::add, Assoc::Left)
            | Op::infix(Rule::sub, Assoc::Left)
            | Op::infix(Rule::or, Assoc::Left))
        .op(Op::infix(Rule::mul, Assoc::Left)
            | Op::infix(Rule::div, Assoc::Left)
            | Op::infix(Rule::and, Assoc::Left))
        .op(Op::infix(Rule::pow, Assoc::Right))
        .op(Op::prefix(Rule::not))
        .op(Op::infix(Rule::eq, Assoc::Left)
            | Op::infix(Rule::ne, Assoc::Left)
            | Op::infix(Rule::lt, Assoc::Left)
            | Op::infix(Rule::le, Assoc::Left)
            | Op::infix(Rule::gt, Assoc::Left)
            | Op::infix(Rule::ge, Assoc::Left))
        .op(Op::prefix(Rule::neg));
        // (highest precedence)
}

/// Parse source text into an expression tree.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    parse_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

/// Parse with an explicit nesting limit. Exceeding the limit fails with
/// [`ParseErrorKind::MaxDepthExceeded`] instead of exhausting the stack.
pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<Expr, ParseError> {
    trace!(source, "parsing expression");
    check_nesting(source, max_depth)?;

    let mut pairs =
        FormulaParser::parse(Rule::main, source).map_err(|e| convert_pest_error(e, source))?;
    let main = pairs.next().ok_or_else(|| {
        ParseError::new(ParseErrorKind::IncompleteExpression, Span::new(0, 0))
    })?;
    let expr_pair = main.into_inner().next().ok_or_else(|| {
        ParseError::new(ParseErrorKind::IncompleteExpression, Span::new(0, 0))
    })?;
    build_expr(expr_pair, 0, max_depth)
}

/// Reject pathological nesting before handing the text to the
/// recursive-descent machinery, which recurses once per level for every
/// recursive construct. Three budgets share `max_depth`: parenthesis
/// depth, `IF` occurrences (counted cumulatively, so sibling conditionals
/// draw on the same budget) and runs of consecutive prefix operators.
/// Quoted text is skipped.
fn check_nesting(source: &str, max_depth: usize) -> Result<(), ParseError> {
    let too_deep = |offset: usize| {
        ParseError::new(
            ParseErrorKind::MaxDepthExceeded { max_depth },
            Span::new(offset, offset + 1),
        )
    };

    let mut paren_depth = 0usize;
    let mut conditionals = 0usize;
    let mut prefix_run = 0usize;
    let mut in_text = false;
    // Whether the last significant token completed a value; a `-` in that
    // position is a subtraction, otherwise a prefix negation.
    let mut after_value = false;
    let mut chars = source.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        if in_text {
            if c == '"' {
                in_text = false;
                after_value = true;
            }
            continue;
        }
        match c {
            ' ' | '\t' => continue,
            '"' => {
                in_text = true;
                prefix_run = 0;
            }
            '(' => {
                paren_depth += 1;
                if paren_depth > max_depth {
                    return Err(too_deep(offset));
                }
                prefix_run = 0;
                after_value = false;
            }
            ')' => {
                paren_depth = paren_depth.saturating_sub(1);
                prefix_run = 0;
                after_value = true;
            }
            '-' => {
                if after_value {
                    prefix_run = 0;
                } else {
                    prefix_run += 1;
                    if prefix_run > max_depth {
                        return Err(too_deep(offset));
                    }
                }
                after_value = false;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = offset + c.len_utf8();
                while let Some(&(j, d)) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        chars.next();
                        end = j + d.len_utf8();
                    } else {
                        break;
                    }
                }
                match &source[offset..end] {
                    "IF" => {
                        conditionals += 1;
                        if conditionals > max_depth {
                            return Err(too_deep(offset));
                        }
                        prefix_run = 0;
                        after_value = false;
                    }
                    "NOT" => {
                        prefix_run += 1;
                        if prefix_run > max_depth {
                            return Err(too_deep(offset));
                        }
                        after_value = false;
                    }
                    "THEN" | "ELSE" | "AND" | "OR" => {
                        prefix_run = 0;
                        after_value = false;
                    }
                    _ => {
                        // TRUE, FALSE, or an identifier.
                        prefix_run = 0;
                        after_value = true;
                    }
                }
            }
            c if c.is_ascii_digit() || c == '.' => {
                prefix_run = 0;
                after_value = true;
            }
            _ => {
                prefix_run = 0;
                after_value = false;
            }
        }
    }
    Ok(())
}

fn build_expr(pair: Pair<Rule>, depth: usize, max_depth: usize) -> Result<Expr, ParseError> {
    if depth >= max_depth {
        return Err(ParseError::new(
            ParseErrorKind::MaxDepthExceeded { max_depth },
            pair.as_span().into(),
        ));
    }

    match pair.as_rule() {
        Rule::expression => PRATT_PARSER
            .map_primary(|primary| build_expr(primary, depth + 1, max_depth))
            .map_prefix(|op, rhs| {
                let rhs = rhs?;
                Ok(match op.as_rule() {
                    Rule::neg => rhs.neg(),
                    Rule::not => rhs.not(),
                    rule => unreachable!("unknown prefix operator: {rule:?}"),
                })
            })
            .map_infix(|lhs, op, rhs| {
                let (lhs, rhs) = (lhs?, rhs?);
                Ok(match op.as_rule() {
                    Rule::add => lhs.add(rhs),
                    Rule::sub => lhs.sub(rhs),
                    Rule::mul => lhs.mul(rhs),
                    Rule::div => lhs.div(rhs),
                    Rule::pow => lhs.pow(rhs),
                    Rule::and => lhs.and(rhs),
                    Rule::or => lhs.or(rhs),
                    Rule::eq => lhs.eq(rhs),
                    Rule::ne => lhs.ne(rhs),
                    Rule::lt => lhs.lt(rhs),
                    Rule::le => lhs.le(rhs),
                    Rule::gt => lhs.gt(rhs),
                    Rule::ge => lhs.ge(rhs),
                    rule => unreachable!("unknown infix operator: {rule:?}"),
                })
            })
            .parse(pair.into_inner()),

        Rule::grouped => {
            let span = pair.as_span().into();
            let inner = pair.into_inner().next().ok_or_else(|| {
                ParseError::new(ParseErrorKind::IncompleteExpression, span)
            })?;
            build_expr(inner, depth + 1, max_depth)
        }

        Rule::conditional => {
            let mut branches = pair
                .into_inner()
                .filter(|p| p.as_rule() == Rule::expression)
                .map(|p| build_expr(p, depth + 1, max_depth));
            // The grammar guarantees exactly three expression children.
            match (branches.next(), branches.next(), branches.next()) {
                (Some(test), Some(then), Some(otherwise)) => {
                    Ok(Expr::conditional(test?, then?, otherwise?))
                }
                _ => unreachable!("conditional without three branches"),
            }
        }

        Rule::call => {
            let mut inner = pair.into_inner();
            let name = match inner.next() {
                Some(p) => p.as_str().to_string(),
                None => unreachable!("call without a name"),
            };
            let args = match inner.next() {
                Some(list) => list
                    .into_inner()
                    .map(|p| build_expr(p, depth + 1, max_depth))
                    .collect::<Result<Vec<_>, _>>()?,
                None => unreachable!("call without arguments"),
            };
            Ok(Expr::call(name, args))
        }

        Rule::variable => Ok(Expr::variable(pair.as_str())),

        Rule::number => {
            let text = pair.as_str();
            text.parse::<Number>().map(Expr::NumberLiteral).map_err(|_| {
                ParseError::new(
                    ParseErrorKind::InvalidNumber {
                        text: text.to_string(),
                    },
                    pair.as_span().into(),
                )
            })
        }

        Rule::text => {
            let quoted = pair.as_str();
            Ok(Expr::text(&quoted[1..quoted.len() - 1]))
        }

        Rule::boolean => Ok(Expr::boolean(pair.as_str() == "TRUE")),

        rule => unreachable!("unhandled rule: {rule:?}"),
    }
}
