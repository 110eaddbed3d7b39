//! Runtime evaluation errors.
//!
//! All of these are terminal for the `evaluate` call in which they occur;
//! the engine never recovers internally from a missing binding or a
//! capability mismatch. Hosts handle them at the call boundary.

use thiserror::Error;

use crate::values::Capability;

#[derive(Debug, Error)]
pub enum EvalError {
    /// A variable was referenced but absent from the bindings.
    #[error("variable `{name}` does not have a value")]
    UnboundVariable { name: String },

    /// A call referenced a name no one registered.
    #[error("function `{name}` has not been defined")]
    UndefinedFunction { name: String },

    /// An operand lacks the capability the operator in context requires.
    #[error("{value} does not implement the {capability} capability")]
    MissingCapability {
        capability: Capability,
        value: String,
    },

    /// Both operands have the capability but don't understand each other.
    #[error("cannot apply `{operation}` to {left} and {right}")]
    IncompatibleOperands {
        operation: &'static str,
        left: String,
        right: String,
    },

    /// The operation is undefined for this value (e.g. ordering a complex
    /// number).
    #[error("`{operation}` is not defined for {value}")]
    UnsupportedOperation {
        operation: &'static str,
        value: String,
    },

    /// A function was invoked with the wrong number of arguments.
    #[error("function `{name}` takes {expected} argument(s), {found} were given")]
    WrongArity {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Evaluation recursion exceeded the configured limit.
    #[error("evaluation depth exceeds the maximum of {max_depth}")]
    DepthExceeded { max_depth: usize },
}
