use pretty_assertions::assert_eq;

use crate::evaluator::{Bindings, EvalError};
use crate::parser::parse;
use crate::registry::FunctionRegistry;
use crate::values::{Bool, Capability, IntoValue, Number, Text, TypedValue};

fn eval(source: &str) -> Result<TypedValue, EvalError> {
    parse(source).unwrap().evaluate(&Bindings::new())
}

fn eval_with(source: &str, bindings: &Bindings) -> Result<TypedValue, EvalError> {
    parse(source).unwrap().evaluate(bindings)
}

fn as_number(value: &TypedValue) -> Number {
    *value.downcast_ref::<Number>().expect("expected a number")
}

#[test]
fn arithmetic_with_precedence() {
    assert_eq!(as_number(&eval("2 + 3 * 4").unwrap()), Number::Int(14));
    assert_eq!(as_number(&eval("-2 ^ 2").unwrap()), Number::Int(4));
}

#[test]
fn division_is_true_division() {
    assert_eq!(as_number(&eval("7 / 2").unwrap()), Number::Float(3.5));
}

#[test]
fn variables_come_from_the_bindings() {
    let mut bindings = Bindings::new();
    bindings.insert("x".to_string(), Number::Int(10).into_value());
    assert_eq!(
        as_number(&eval_with("x * x", &bindings).unwrap()),
        Number::Int(100)
    );
}

#[test]
fn unbound_variable_fails() {
    let err = eval("x + 1").unwrap_err();
    assert!(matches!(err, EvalError::UnboundVariable { name } if name == "x"));
}

#[test]
fn conditional_takes_only_one_branch() {
    // The untaken branch is never evaluated, so its unbound variable
    // cannot fail the evaluation.
    assert_eq!(
        as_number(&eval("IF TRUE THEN 1 ELSE y .").unwrap()),
        Number::Int(1)
    );
    assert_eq!(
        as_number(&eval("IF 1 < 2 THEN 10 ELSE 20 .").unwrap()),
        Number::Int(10)
    );
}

#[test]
fn conditional_test_must_be_boolean_like() {
    let err = eval("IF \"yes\" THEN 1 ELSE 2 .").unwrap_err();
    assert!(matches!(
        err,
        EvalError::MissingCapability {
            capability: Capability::Boolean,
            ..
        }
    ));
}

#[test]
fn boolean_connectives_evaluate_both_sides() {
    let err = eval("FALSE AND x").unwrap_err();
    assert!(matches!(err, EvalError::UnboundVariable { .. }));
}

#[test]
fn comparison_produces_booleans() {
    let result = eval("1 < 2").unwrap();
    assert_eq!(result.downcast_ref::<Bool>(), Some(&Bool(true)));
    let result = eval("1 == 2").unwrap();
    assert_eq!(result.downcast_ref::<Bool>(), Some(&Bool(false)));
}

#[test]
fn adding_text_to_a_number_is_a_capability_error() {
    let mut bindings = Bindings::new();
    bindings.insert("label".to_string(), Text::new("total: ").into_value());
    let err = eval_with("label + 1", &bindings).unwrap_err();
    assert!(matches!(
        err,
        EvalError::MissingCapability {
            capability: Capability::String,
            ..
        }
    ));
}

#[test]
fn text_concatenation_through_plus() {
    let mut bindings = Bindings::new();
    bindings.insert("a".to_string(), Text::new("form").into_value());
    bindings.insert("b".to_string(), Text::new("ula").into_value());
    let result = eval_with("a + b", &bindings).unwrap();
    assert_eq!(result.downcast_ref::<Text>(), Some(&Text::new("formula")));
}

#[test]
fn calls_resolve_in_an_explicit_registry() {
    let mut registry = FunctionRegistry::new();
    registry.register("triple", |args: &[TypedValue]| {
        let n = args[0].downcast_ref::<Number>().copied().unwrap();
        Ok(n.mul(Number::Int(3)).into_value())
    });

    let expr = parse("triple(7)").unwrap();
    let result = expr.evaluate_with(&registry, &Bindings::new()).unwrap();
    assert_eq!(as_number(&result), Number::Int(21));
}

#[test]
fn unknown_function_fails() {
    let mut registry = FunctionRegistry::new();
    crate::stdlib::math::install(&mut registry);
    let expr = parse("frobnicate(1)").unwrap();
    let err = expr.evaluate_with(&registry, &Bindings::new()).unwrap_err();
    assert!(matches!(err, EvalError::UndefinedFunction { name } if name == "frobnicate"));
}

#[test]
fn arguments_evaluate_before_resolution() {
    // An unbound argument fails even when the function itself is unknown.
    let expr = parse("frobnicate(x)").unwrap();
    let err = expr.evaluate(&Bindings::new()).unwrap_err();
    assert!(matches!(err, EvalError::UnboundVariable { .. }));
}

#[test]
fn evaluation_depth_is_bounded() {
    let deep = (0..2 * super::DEFAULT_MAX_DEPTH).fold(crate::ast::Expr::number(0), |e, _| e.add(1));
    let err = deep.evaluate(&Bindings::new()).unwrap_err();
    assert!(matches!(err, EvalError::DepthExceeded { .. }));
}

#[test]
fn complex_arithmetic_promotes() {
    // Complex results stay complex even when the imaginary part cancels.
    assert_eq!(
        as_number(&eval("(1+1j) * (1-1j)").unwrap()),
        Number::complex(2.0, 0.0)
    );
}

#[test]
fn ordering_complex_numbers_fails() {
    let err = eval("1+1j < 2").unwrap_err();
    assert!(matches!(err, EvalError::UnsupportedOperation { .. }));
}
