//! Jabr - An embeddable formula language
//!
//! # Overview
//!
//! Jabr evaluates user-written formulas inside a host application. A formula
//! is parsed once into an immutable expression tree, which can then be
//! evaluated any number of times against different variable bindings. Common
//! use cases include:
//!
//! - Spreadsheet-style computed fields
//! - Pricing and scoring rules
//! - Validation conditions over user data
//!
//! # Quick Start
//!
//! ```
//! use jabr::{parse, Bindings, IntoValue, Number};
//!
//! let expr = parse("IF x < 10 THEN x * 2 ELSE x .").unwrap();
//!
//! let mut bindings = Bindings::new();
//! bindings.insert("x".to_string(), Number::Int(3).into_value());
//!
//! let result = expr.evaluate(&bindings).unwrap();
//! assert_eq!(result.downcast_ref::<jabr::Number>(), Some(&Number::Int(6)));
//! ```
//!
//! # Building trees in Rust
//!
//! Expression trees can also be assembled directly, with combinators and
//! operator overloads mirroring the formula syntax:
//!
//! ```
//! use jabr::Expr;
//!
//! let expr = Expr::variable("x") * 2 + 1;
//! assert_eq!(expr.to_string(), "((x * 2) + 1)");
//! ```
//!
//! # Functions
//!
//! Formulas call functions by name through a registry. The builtin math
//! package covers the usual `f64` surface; hosts register their own
//! functions alongside it, either process-wide or per registry:
//!
//! ```
//! use jabr::{parse, Bindings, FunctionRegistry, IntoValue, Number};
//!
//! let mut registry = FunctionRegistry::new();
//! jabr::stdlib::math::install(&mut registry);
//! registry.register("double", |args: &[jabr::TypedValue]| {
//!     let n = args[0].downcast_ref::<Number>().copied().unwrap_or(Number::Int(0));
//!     Ok(n.mul(Number::Int(2)).into_value())
//! });
//!
//! let expr = parse("double(sqrt(9))").unwrap();
//! let result = expr.evaluate_with(&registry, &Bindings::new()).unwrap();
//! assert_eq!(result.downcast_ref::<Number>(), Some(&Number::Float(6.0)));
//! ```
//!
//! # Host value types
//!
//! Evaluation is polymorphic over the [`values::Value`] trait. A host type
//! opts into exactly the operator families it supports by returning its
//! capability views from the trait's accessors; operators dispatch through
//! those views and never inspect concrete types.

pub mod ast;
pub mod evaluator;
pub mod parser;
pub mod registry;
pub mod stdlib;
pub mod values;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use evaluator::{Bindings, EvalError};
pub use parser::{parse, parse_with_max_depth, LexError, ParseError, ParseErrorKind, Span};
pub use registry::{register_function, FunctionRegistry, RegisteredFn};
pub use stdlib::activate_builtin_math;
pub use values::{Bool, IntoValue, List, Number, Text, TypedValue, Value};
