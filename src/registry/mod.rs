//! The function registry.
//!
//! Call nodes resolve their name at evaluation time against a registry of
//! native functions. [`FunctionRegistry`] is an ordinary value a host can
//! build and pass to [`Expr::evaluate_with`](crate::Expr::evaluate_with);
//! the process-wide default registry backs the plain
//! [`evaluate`](crate::Expr::evaluate) surface and is guarded by a
//! read/write lock, with registration expected from startup code.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;
use tracing::debug;

use crate::evaluator::EvalError;
use crate::values::TypedValue;

/// A registered native function. Receives the eagerly evaluated arguments
/// in order; the slice length is whatever the call site supplied, so
/// variadic functions are expressible.
pub type RegisteredFn = Arc<dyn Fn(&[TypedValue]) -> Result<TypedValue, EvalError> + Send + Sync>;

/// A mutable name → function table. Registration is an idempotent
/// overwrite: the last registration for a name wins.
#[derive(Default, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, RegisteredFn>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[TypedValue]) -> Result<TypedValue, EvalError> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(name, "registering function");
        self.functions.insert(name, Arc::new(function));
    }

    pub fn resolve(&self, name: &str) -> Option<RegisteredFn> {
        self.functions.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

lazy_static! {
    static ref DEFAULT_REGISTRY: RwLock<FunctionRegistry> = RwLock::new(FunctionRegistry::new());
}

/// Register a function in the process-wide default registry.
pub fn register_function<F>(name: impl Into<String>, function: F)
where
    F: Fn(&[TypedValue]) -> Result<TypedValue, EvalError> + Send + Sync + 'static,
{
    DEFAULT_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(name, function);
}

/// Look up a function in the default registry. The lock is held only for
/// the lookup, never across the call itself.
pub fn resolve_function(name: &str) -> Option<RegisteredFn> {
    DEFAULT_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .resolve(name)
}

/// Run a bulk installer (such as the builtin math package) against the
/// default registry.
pub fn with_default_registry(install: impl FnOnce(&mut FunctionRegistry)) {
    let mut registry = DEFAULT_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    install(&mut registry);
}
