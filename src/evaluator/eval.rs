//! Tree-walking evaluation.

use std::collections::HashMap;

use tracing::trace;

use crate::ast::Expr;
use crate::evaluator::{operators, EvalError};
use crate::registry::{self, FunctionRegistry, RegisteredFn};
use crate::values::{Bool, Capability, IntoValue, Text, TypedValue};

/// Caller-supplied variable bindings for one evaluation.
pub type Bindings = HashMap<String, TypedValue>;

/// Recursion limit for the evaluation walk. Matches the parser's default,
/// with headroom for programmatically built trees.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Evaluator for expression trees.
///
/// Holds the bindings and (optionally) an explicit function registry for
/// the duration of one `evaluate` call; when no registry is given, call
/// nodes resolve against the process-wide default registry.
struct Evaluator<'a> {
    registry: Option<&'a FunctionRegistry>,
    bindings: &'a Bindings,
    max_depth: usize,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    fn new(registry: Option<&'a FunctionRegistry>, bindings: &'a Bindings) -> Self {
        Self {
            registry,
            bindings,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    fn resolve(&self, name: &str) -> Option<RegisteredFn> {
        match self.registry {
            Some(registry) => registry.resolve(name),
            None => registry::resolve_function(name),
        }
    }

    fn eval(&mut self, expr: &Expr) -> Result<TypedValue, EvalError> {
        if self.depth >= self.max_depth {
            return Err(EvalError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }
        self.depth += 1;
        let result = self.eval_inner(expr);
        self.depth -= 1;
        result
    }

    fn eval_inner(&mut self, expr: &Expr) -> Result<TypedValue, EvalError> {
        match expr {
            Expr::NumberLiteral(n) => Ok((*n).into_value()),
            Expr::TextLiteral(s) => Ok(Text::new(s.clone()).into_value()),
            Expr::BooleanLiteral(b) => Ok(Bool(*b).into_value()),

            Expr::Variable(name) => {
                self.bindings
                    .get(name)
                    .cloned()
                    .ok_or_else(|| EvalError::UnboundVariable { name: name.clone() })
            }

            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                operators::apply_unary(*op, &value)
            }

            Expr::Binary { op, left, right } => {
                let lhs = self.eval(left)?;
                let rhs = self.eval(right)?;
                operators::apply_binary(*op, &lhs, &rhs)
            }

            Expr::Conditional {
                test,
                then,
                otherwise,
            } => {
                let test = self.eval(test)?;
                // A test value with the mixed-selection capability combines
                // both candidate values itself (e.g. elementwise over a
                // boolean vector); anything else must coerce to a single
                // boolean and gets non-strict branch selection.
                if let Some(select) = test.as_select() {
                    let on_true = self.eval(then)?;
                    let on_false = self.eval(otherwise)?;
                    select.select(&on_true, &on_false)
                } else {
                    let taken = test.truth().ok_or_else(|| EvalError::MissingCapability {
                        capability: Capability::Boolean,
                        value: test.render(),
                    })?;
                    if taken {
                        self.eval(then)
                    } else {
                        self.eval(otherwise)
                    }
                }
            }

            Expr::Call { name, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg)?);
                }
                let function = self
                    .resolve(name)
                    .ok_or_else(|| EvalError::UndefinedFunction { name: name.clone() })?;
                trace!(name, argc = values.len(), "invoking function");
                function(&values)
            }
        }
    }
}

impl Expr {
    /// Evaluate against the given bindings, resolving function calls in the
    /// process-wide default registry.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<TypedValue, EvalError> {
        Evaluator::new(None, bindings).eval(self)
    }

    /// Evaluate with an explicit function registry instead of the default
    /// one. Useful for tests and hosts that scope their function tables.
    pub fn evaluate_with(
        &self,
        registry: &FunctionRegistry,
        bindings: &Bindings,
    ) -> Result<TypedValue, EvalError> {
        Evaluator::new(Some(registry), bindings).eval(self)
    }
}
