//! Capability contracts a value type may implement.
//!
//! The evaluator never hard-codes operator semantics to a concrete type.
//! Each operator requires one of these capabilities from its (left) operand
//! and asks that operand to perform the operation with the right-hand value.
//! A value type implements any subset; a boolean vector, for instance, can
//! be both `BooleanOps` and `ListOps` and additionally offer `SelectOps`
//! for elementwise conditionals.

use core::fmt;

use crate::evaluator::EvalError;
use crate::values::{TypedValue, Value};

/// Result of a capability operation.
pub type OpResult = Result<TypedValue, EvalError>;

/// The capability categories, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Boolean,
    Arithmetic,
    String,
    List,
    Select,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Boolean => "Boolean",
            Capability::Arithmetic => "Arithmetic",
            Capability::String => "String",
            Capability::List => "List",
            Capability::Select => "Select",
        };
        f.write_str(name)
    }
}

/// Boolean algebra. `AND`/`OR`/`NOT` are conjunction, disjunction and
/// inversion rather than short-circuit control flow, so implementations
/// over boolean vectors compose elementwise.
pub trait BooleanOps {
    fn and(&self, other: &dyn Value) -> OpResult;
    fn or(&self, other: &dyn Value) -> OpResult;
    fn xor(&self, other: &dyn Value) -> OpResult;
    fn not(&self) -> OpResult;
    fn eq(&self, other: &dyn Value) -> OpResult;
    fn ne(&self, other: &dyn Value) -> OpResult;
}

/// Arithmetic over a value and a right-hand operand of the same family.
pub trait ArithmeticOps {
    fn abs(&self) -> OpResult;
    fn add(&self, other: &dyn Value) -> OpResult;
    fn sub(&self, other: &dyn Value) -> OpResult;
    fn mul(&self, other: &dyn Value) -> OpResult;
    fn div(&self, other: &dyn Value) -> OpResult;
    fn neg(&self) -> OpResult;
    fn pow(&self, other: &dyn Value) -> OpResult;
    fn eq(&self, other: &dyn Value) -> OpResult;
    fn ne(&self, other: &dyn Value) -> OpResult;
    fn lt(&self, other: &dyn Value) -> OpResult;
    fn le(&self, other: &dyn Value) -> OpResult;
    fn gt(&self, other: &dyn Value) -> OpResult;
    fn ge(&self, other: &dyn Value) -> OpResult;

    /// Lossless conversion to `f64`, if this value has one. The builtin
    /// math functions use this to validate their operands.
    fn as_float(&self) -> Option<f64> {
        None
    }
}

/// Text values: concatenation, length and equality.
pub trait StringOps {
    fn concat(&self, other: &dyn Value) -> OpResult;
    fn len(&self) -> OpResult;
    fn eq(&self, other: &dyn Value) -> OpResult;
    fn ne(&self, other: &dyn Value) -> OpResult;
}

/// Ordered collections: concatenation, length, membership and equality.
pub trait ListOps {
    fn concat(&self, other: &dyn Value) -> OpResult;
    fn len(&self) -> OpResult;
    fn contains(&self, item: &dyn Value) -> OpResult;
    fn eq(&self, other: &dyn Value) -> OpResult;
    fn ne(&self, other: &dyn Value) -> OpResult;
}

/// Mixed selection: how a boolean-like test value combines the two branch
/// values of a conditional. A boolean vector can select elementwise; plain
/// scalars don't implement this and get ordinary non-strict branching.
pub trait SelectOps {
    fn select(&self, on_true: &TypedValue, on_false: &TypedValue) -> OpResult;
}
