use pretty_assertions::assert_eq;

use crate::ast::Expr;
use crate::parser::parse;

fn n(v: i64) -> Expr {
    Expr::number(v)
}

fn v(name: &str) -> Expr {
    Expr::variable(name)
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(parse("2 + 3 * 4").unwrap(), n(2).add(n(3).mul(4)));
    assert_eq!(parse("2 * 3 + 4").unwrap(), n(2).mul(3).add(4));
}

#[test]
fn same_tier_operators_associate_left() {
    assert_eq!(parse("10 - 4 - 3").unwrap(), n(10).sub(4).sub(3));
    assert_eq!(parse("24 / 4 / 2").unwrap(), n(24).div(4).div(2));
}

#[test]
fn and_sits_with_multiplication_or_with_addition() {
    assert_eq!(
        parse("a OR b AND c").unwrap(),
        v("a").or(v("b").and(v("c")))
    );
    assert_eq!(
        parse("a AND b OR c").unwrap(),
        v("a").and(v("b")).or(v("c"))
    );
}

#[test]
fn exponentiation_is_right_associative() {
    assert_eq!(parse("2 ^ 3 ^ 2").unwrap(), n(2).pow(n(3).pow(2)));
}

#[test]
fn exponentiation_binds_tighter_than_multiplication() {
    assert_eq!(parse("2 * 3 ^ 2").unwrap(), n(2).mul(n(3).pow(2)));
}

#[test]
fn unary_minus_binds_tighter_than_exponentiation() {
    // `-2 ^ 2` squares the negation, giving 4 rather than -4.
    assert_eq!(parse("-2 ^ 2").unwrap(), n(2).neg().pow(2));
}

#[test]
fn comparisons_bind_tighter_than_not() {
    assert_eq!(
        parse("NOT a == b").unwrap(),
        v("a").eq(v("b")).not()
    );
}

#[test]
fn comparisons_bind_tighter_than_arithmetic() {
    // An unusual tier: the comparison reduces first, so this is
    // `a + (b < c)`.
    assert_eq!(parse("a + b < c").unwrap(), v("a").add(v("b").lt(v("c"))));
}

#[test]
fn comparison_chains_fold_left() {
    assert_eq!(
        parse("a < b < c").unwrap(),
        v("a").lt(v("b")).lt(v("c"))
    );
}

#[test]
fn parentheses_override_precedence() {
    assert_eq!(parse("(2 + 3) * 4").unwrap(), n(2).add(3).mul(4));
    assert_eq!(parse("(-2) ^ 2").unwrap(), n(2).neg().pow(2));
    assert_eq!(parse("NOT (a) == b").unwrap(), v("a").eq(v("b")).not());
}

#[test]
fn not_applies_to_the_comparison_result() {
    assert_eq!(
        parse("NOT a AND b").unwrap(),
        v("a").not().and(v("b"))
    );
}

#[test]
fn double_negation_nests() {
    assert_eq!(parse("--x").unwrap(), v("x").neg().neg());
    assert_eq!(parse("NOT NOT x").unwrap(), v("x").not().not());
}

#[test]
fn display_round_trips_through_the_parser() {
    for source in [
        "2 + 3 * 4",
        "2 ^ 3 ^ 2",
        "-2 ^ 2",
        "NOT a == b",
        "a + b < c",
        "IF a < b THEN a ELSE b .",
        "min(a, b + 1)",
    ] {
        let expr = parse(source).unwrap();
        let reparsed = parse(&expr.to_string()).unwrap();
        assert_eq!(reparsed, expr, "source: {source}");
    }
}
