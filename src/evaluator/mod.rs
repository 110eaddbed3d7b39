//! Evaluation of expression trees against bindings.

mod error;
mod eval;
pub(crate) mod operators;

pub use error::EvalError;
pub use eval::{Bindings, DEFAULT_MAX_DEPTH};

#[cfg(test)]
mod eval_test;
