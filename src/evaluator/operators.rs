//! Operator dispatch over the capability system.
//!
//! A binary operator never inspects concrete types itself: it queries the
//! left operand for the capability it needs and delegates, so host value
//! types participate on equal footing with the builtins.

use crate::ast::{BinaryOp, UnaryOp};
use crate::evaluator::EvalError;
use crate::values::{Capability, OpResult, TypedValue, Value};

fn missing(capability: Capability, value: &dyn Value) -> EvalError {
    EvalError::MissingCapability {
        capability,
        value: value.render(),
    }
}

pub(crate) fn apply_binary(op: BinaryOp, left: &TypedValue, right: &TypedValue) -> OpResult {
    let rhs = right.as_ref();
    match op {
        // `+` means arithmetic addition, text concatenation or list
        // concatenation, decided by the left operand's capabilities.
        BinaryOp::Add => {
            if let Some(arith) = left.as_arithmetic() {
                arith.add(rhs)
            } else if let Some(string) = left.as_string() {
                string.concat(rhs)
            } else if let Some(list) = left.as_list() {
                list.concat(rhs)
            } else {
                Err(missing(Capability::Arithmetic, left.as_ref()))
            }
        }
        BinaryOp::Sub => require_arithmetic(left)?.sub(rhs),
        BinaryOp::Mul => require_arithmetic(left)?.mul(rhs),
        BinaryOp::Div => require_arithmetic(left)?.div(rhs),
        BinaryOp::Pow => require_arithmetic(left)?.pow(rhs),
        BinaryOp::And => require_boolean(left)?.and(rhs),
        BinaryOp::Or => require_boolean(left)?.or(rhs),
        BinaryOp::Eq => dispatch_eq(left, rhs, false),
        BinaryOp::Ne => dispatch_eq(left, rhs, true),
        BinaryOp::Lt => require_arithmetic(left)?.lt(rhs),
        BinaryOp::Le => require_arithmetic(left)?.le(rhs),
        BinaryOp::Gt => require_arithmetic(left)?.gt(rhs),
        BinaryOp::Ge => require_arithmetic(left)?.ge(rhs),
    }
}

pub(crate) fn apply_unary(op: UnaryOp, operand: &TypedValue) -> OpResult {
    match op {
        UnaryOp::Neg => require_arithmetic(operand)?.neg(),
        UnaryOp::Not => require_boolean(operand)?.not(),
    }
}

fn require_arithmetic(value: &TypedValue) -> Result<&dyn crate::values::ArithmeticOps, EvalError> {
    value
        .as_arithmetic()
        .ok_or_else(|| missing(Capability::Arithmetic, value.as_ref()))
}

fn require_boolean(value: &TypedValue) -> Result<&dyn crate::values::BooleanOps, EvalError> {
    value
        .as_boolean()
        .ok_or_else(|| missing(Capability::Boolean, value.as_ref()))
}

/// Equality exists on every capability; try them in a fixed order on the
/// left operand.
fn dispatch_eq(left: &TypedValue, right: &dyn Value, negated: bool) -> OpResult {
    if let Some(arith) = left.as_arithmetic() {
        return if negated { arith.ne(right) } else { arith.eq(right) };
    }
    if let Some(boolean) = left.as_boolean() {
        return if negated {
            boolean.ne(right)
        } else {
            boolean.eq(right)
        };
    }
    if let Some(string) = left.as_string() {
        return if negated {
            string.ne(right)
        } else {
            string.eq(right)
        };
    }
    if let Some(list) = left.as_list() {
        return if negated { list.ne(right) } else { list.eq(right) };
    }
    Err(missing(Capability::Boolean, left.as_ref()))
}

/// Equality between two arbitrary values, used by list membership. Values
/// that cannot be compared at all are simply unequal.
pub(crate) fn values_equal(a: &dyn Value, b: &dyn Value) -> bool {
    let result = if let Some(arith) = a.as_arithmetic() {
        arith.eq(b)
    } else if let Some(boolean) = a.as_boolean() {
        boolean.eq(b)
    } else if let Some(string) = a.as_string() {
        string.eq(b)
    } else if let Some(list) = a.as_list() {
        list.eq(b)
    } else {
        return false;
    };
    match result {
        Ok(v) => v.truth().unwrap_or(false),
        Err(_) => false,
    }
}
