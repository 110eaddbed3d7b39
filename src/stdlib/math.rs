//! The builtin math package.
//!
//! Thin wrappers over `f64` and [`libm`], exposed through the registry so
//! formulas can call them by name. Most functions take real arguments and
//! return floats; the rounding family returns integers, the `is*` family
//! returns booleans, and `min`/`max`/`fsum`/`hypot`/`gcd` are variadic.

use tracing::debug;

use crate::evaluator::EvalError;
use crate::registry::FunctionRegistry;
use crate::values::{ArithmeticOps, Bool, Capability, IntoValue, Number, TypedValue};

/// Install every math builtin into `registry`.
pub fn install(registry: &mut FunctionRegistry) {
    registry.register("abs", |args: &[TypedValue]| {
        expect_arity("abs", args, 1)?;
        require_arithmetic(&args[0])?.abs()
    });

    unary_to_int(registry, "round", f64::round);
    unary_to_int(registry, "floor", f64::floor);
    unary_to_int(registry, "ceil", f64::ceil);
    unary_to_int(registry, "trunc", f64::trunc);

    unary(registry, "cos", f64::cos);
    unary(registry, "acos", f64::acos);
    unary(registry, "cosh", f64::cosh);
    unary(registry, "acosh", f64::acosh);
    unary(registry, "sin", f64::sin);
    unary(registry, "asin", f64::asin);
    unary(registry, "sinh", f64::sinh);
    unary(registry, "asinh", f64::asinh);
    unary(registry, "tan", f64::tan);
    unary(registry, "atan", f64::atan);
    unary(registry, "tanh", f64::tanh);
    unary(registry, "atanh", f64::atanh);

    unary(registry, "degrees", f64::to_degrees);
    unary(registry, "radians", f64::to_radians);

    unary(registry, "exp", f64::exp);
    unary(registry, "expm1", f64::exp_m1);
    unary(registry, "fabs", f64::abs);
    unary(registry, "log", f64::ln);
    unary(registry, "log1p", f64::ln_1p);
    unary(registry, "log10", f64::log10);
    unary(registry, "log2", f64::log2);
    unary(registry, "sqrt", f64::sqrt);

    unary(registry, "erf", libm::erf);
    unary(registry, "erfc", libm::erfc);
    unary(registry, "gamma", libm::tgamma);
    unary(registry, "lgamma", libm::lgamma);

    binary(registry, "atan2", f64::atan2);
    binary(registry, "copysign", f64::copysign);
    binary(registry, "fmod", |a, b| a % b);
    binary(registry, "pow", f64::powf);
    binary(registry, "remainder", libm::remainder);

    predicate(registry, "isfinite", f64::is_finite);
    predicate(registry, "isinf", f64::is_infinite);
    predicate(registry, "isnan", f64::is_nan);

    registry.register("min", |args: &[TypedValue]| extremum("min", args, true));
    registry.register("max", |args: &[TypedValue]| extremum("max", args, false));
    registry.register("fsum", |args: &[TypedValue]| fsum(args));
    registry.register("hypot", |args: &[TypedValue]| hypot(args));
    registry.register("gcd", |args: &[TypedValue]| gcd(args));

    debug!("installed builtin math package");
}

fn expect_arity(name: &'static str, args: &[TypedValue], expected: usize) -> Result<(), EvalError> {
    if args.len() != expected {
        return Err(EvalError::WrongArity {
            name: name.to_string(),
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

fn require_arithmetic(value: &TypedValue) -> Result<&dyn ArithmeticOps, EvalError> {
    value
        .as_arithmetic()
        .ok_or_else(|| EvalError::MissingCapability {
            capability: Capability::Arithmetic,
            value: value.render(),
        })
}

/// Coerce an argument to `f64`. Rejects values without arithmetic
/// outright; arithmetic values with no real representation (complex
/// numbers) fail with an unsupported-operation error naming the function.
fn require_float(name: &'static str, value: &TypedValue) -> Result<f64, EvalError> {
    let arithmetic = require_arithmetic(value)?;
    arithmetic
        .as_float()
        .ok_or_else(|| EvalError::UnsupportedOperation {
            operation: name,
            value: value.render(),
        })
}

fn unary(registry: &mut FunctionRegistry, name: &'static str, f: fn(f64) -> f64) {
    registry.register(name, move |args: &[TypedValue]| {
        expect_arity(name, args, 1)?;
        let x = require_float(name, &args[0])?;
        Ok(Number::Float(f(x)).into_value())
    });
}

fn unary_to_int(registry: &mut FunctionRegistry, name: &'static str, f: fn(f64) -> f64) {
    registry.register(name, move |args: &[TypedValue]| {
        expect_arity(name, args, 1)?;
        let x = require_float(name, &args[0])?;
        let rounded = f(x);
        // Magnitudes at or beyond 2^63 (and non-finite values) have no
        // `i64` form; the cast would clamp them, so they stay floats.
        let result = if rounded >= i64::MIN as f64 && rounded < 9_223_372_036_854_775_808.0 {
            Number::Int(rounded as i64)
        } else {
            Number::Float(rounded)
        };
        Ok(result.into_value())
    });
}

fn binary(registry: &mut FunctionRegistry, name: &'static str, f: fn(f64, f64) -> f64) {
    registry.register(name, move |args: &[TypedValue]| {
        expect_arity(name, args, 2)?;
        let a = require_float(name, &args[0])?;
        let b = require_float(name, &args[1])?;
        Ok(Number::Float(f(a, b)).into_value())
    });
}

fn predicate(registry: &mut FunctionRegistry, name: &'static str, f: fn(f64) -> bool) {
    registry.register(name, move |args: &[TypedValue]| {
        expect_arity(name, args, 1)?;
        let x = require_float(name, &args[0])?;
        Ok(Bool(f(x)).into_value())
    });
}

/// Shared body of `min` and `max`: a left fold over the comparison
/// capability, so integer arguments stay integers.
fn extremum(
    name: &'static str,
    args: &[TypedValue],
    smallest: bool,
) -> Result<TypedValue, EvalError> {
    let (first, rest) = args.split_first().ok_or_else(|| EvalError::WrongArity {
        name: name.to_string(),
        expected: 1,
        found: 0,
    })?;
    require_arithmetic(first)?;
    let mut best = first.clone();
    for candidate in rest {
        let arithmetic = require_arithmetic(candidate)?;
        let replace = if smallest {
            arithmetic.lt(best.as_ref())?
        } else {
            arithmetic.gt(best.as_ref())?
        };
        if replace.truth().unwrap_or(false) {
            best = candidate.clone();
        }
    }
    Ok(best)
}

/// Neumaier-compensated summation over the arguments. Empty sums to 0.0.
fn fsum(args: &[TypedValue]) -> Result<TypedValue, EvalError> {
    let mut sum = 0.0f64;
    let mut compensation = 0.0f64;
    for arg in args {
        let x = require_float("fsum", arg)?;
        let t = sum + x;
        if sum.abs() >= x.abs() {
            compensation += (sum - t) + x;
        } else {
            compensation += (x - t) + sum;
        }
        sum = t;
    }
    Ok(Number::Float(sum + compensation).into_value())
}

fn hypot(args: &[TypedValue]) -> Result<TypedValue, EvalError> {
    let mut result = 0.0f64;
    for arg in args {
        result = result.hypot(require_float("hypot", arg)?);
    }
    Ok(Number::Float(result).into_value())
}

/// Greatest common divisor of any number of integers. Non-integer
/// arguments are rejected; the empty case is 0.
fn gcd(args: &[TypedValue]) -> Result<TypedValue, EvalError> {
    let mut acc = 0u64;
    for arg in args {
        let n = match arg.downcast_ref::<Number>() {
            Some(Number::Int(n)) => *n,
            _ => {
                return Err(EvalError::UnsupportedOperation {
                    operation: "gcd",
                    value: arg.render(),
                })
            }
        };
        acc = gcd_u64(acc, n.unsigned_abs());
    }
    Ok(Number::Int(acc as i64).into_value())
}

fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}
