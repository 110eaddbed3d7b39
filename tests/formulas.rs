//! End-to-end tests: parse a formula and evaluate it.

use jabr::{parse, Bindings, Bool, EvalError, IntoValue, Number, Text, TypedValue};

fn eval(source: &str, bindings: &Bindings) -> Result<TypedValue, EvalError> {
    parse(source).expect(source).evaluate(bindings)
}

fn eval_number(source: &str, bindings: &Bindings) -> Number {
    *eval(source, bindings)
        .expect(source)
        .downcast_ref::<Number>()
        .expect(source)
}

#[test]
fn arithmetic() {
    let b = Bindings::new();
    assert_eq!(eval_number("2 + 3 * 4", &b), Number::Int(14));
    assert_eq!(eval_number("(2 + 3) * 4", &b), Number::Int(20));
    assert_eq!(eval_number("7 / 2", &b), Number::Float(3.5));
    assert_eq!(eval_number("2 ^ 10", &b), Number::Int(1024));
    assert_eq!(eval_number("2 ^ 3 ^ 2", &b), Number::Int(512));
    assert_eq!(eval_number("-2 ^ 2", &b), Number::Int(4));
}

#[test]
fn integer_overflow_promotes_to_float() {
    let b = Bindings::new();
    let big = i64::MAX;
    let result = eval_number(&format!("{big} + 1"), &b);
    assert_eq!(result, Number::Float(big as f64 + 1.0));
}

#[test]
fn negative_base_fractional_exponent_goes_complex() {
    let b = Bindings::new();
    let result = eval_number("(0 - 4) ^ 0.5", &b);
    match result {
        Number::Complex { re, im } => {
            assert!(re.abs() < 1e-9, "re = {re}");
            assert!((im - 2.0).abs() < 1e-9, "im = {im}");
        }
        other => panic!("expected a complex result, got {other}"),
    }
}

#[test]
fn conditionals() {
    let b = Bindings::new();
    assert_eq!(eval_number("IF 1 < 2 THEN 10 ELSE 20 .", &b), Number::Int(10));
    assert_eq!(eval_number("IF 1 > 2 THEN 10 ELSE 20 .", &b), Number::Int(20));
    // The untaken branch is never evaluated.
    assert_eq!(eval_number("IF TRUE THEN 1 ELSE missing .", &b), Number::Int(1));
}

#[test]
fn boolean_logic() {
    let b = Bindings::new();
    let result = eval("TRUE AND NOT FALSE", &b).unwrap();
    assert_eq!(result.downcast_ref::<Bool>(), Some(&Bool(true)));
    let result = eval("NOT 1 == 2", &b).unwrap();
    assert_eq!(result.downcast_ref::<Bool>(), Some(&Bool(true)));
}

#[test]
fn mixed_numeric_comparison() {
    let b = Bindings::new();
    let result = eval("2 == 2.0", &b).unwrap();
    assert_eq!(result.downcast_ref::<Bool>(), Some(&Bool(true)));
}

#[test]
fn text_values() {
    let mut b = Bindings::new();
    b.insert("name".to_string(), Text::new("world").into_value());
    let result = eval("\"hello \" + name", &b).unwrap();
    assert_eq!(result.downcast_ref::<Text>(), Some(&Text::new("hello world")));
}

#[test]
fn builtin_math_is_available_after_activation() {
    jabr::activate_builtin_math();
    let b = Bindings::new();
    assert_eq!(eval_number("sqrt(9)", &b), Number::Float(3.0));
    assert_eq!(eval_number("min(3, 1, 2)", &b), Number::Int(1));
    assert_eq!(eval_number("gcd(12, 18)", &b), Number::Int(6));
    assert_eq!(
        eval_number("atan2(0, 1) + floor(2.9)", &b),
        Number::Float(2.0)
    );
}

#[test]
fn variables_are_collected_sorted_and_deduplicated() {
    let expr = parse("IF x < limit THEN x + x ELSE limit .").unwrap();
    let names: Vec<_> = expr.variables().into_iter().collect();
    assert_eq!(names, vec!["limit".to_string(), "x".to_string()]);
}

#[test]
fn rendered_trees_reparse_to_the_same_tree() {
    for source in [
        "1 + 2 * 3",
        "IF x < 10 THEN x ELSE 10 .",
        "NOT a == b AND c",
        "hypot(3, 4) / 5",
        "\"a\" + \"b\"",
        "2-3j * x",
    ] {
        let expr = parse(source).expect(source);
        assert_eq!(parse(&expr.to_string()).expect(source), expr, "{source}");
    }
}

#[test]
fn evaluation_is_repeatable_over_changing_bindings() {
    let expr = parse("price * quantity").unwrap();
    for (price, quantity, total) in [(3, 4, 12), (5, 0, 0), (7, 7, 49)] {
        let mut b = Bindings::new();
        b.insert("price".to_string(), Number::Int(price).into_value());
        b.insert("quantity".to_string(), Number::Int(quantity).into_value());
        let result = expr.evaluate(&b).unwrap();
        assert_eq!(result.downcast_ref::<Number>(), Some(&Number::Int(total)));
    }
}

#[test]
fn function_arguments_may_be_full_expressions() {
    jabr::activate_builtin_math();
    let mut b = Bindings::new();
    b.insert("x".to_string(), Number::Int(7).into_value());
    assert_eq!(
        eval_number("max(x - 2, x / 7, 3)", &b),
        Number::Int(5)
    );
}
