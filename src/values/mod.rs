//! Runtime values and the capability system.
//!
//! The engine does not define a closed set of value representations. Any
//! type implementing [`Value`] can flow through bindings, operators and
//! function calls; the trait's `as_*` queries expose whichever capability
//! contracts the type supports, and the evaluator checks the capability an
//! operator needs before applying it.

pub mod basic;
pub mod capability;
pub mod number;

use std::any::Any;
use std::fmt::Debug;
use std::rc::Rc;

pub use basic::{Bool, List, Text};
pub use capability::{
    ArithmeticOps, BooleanOps, Capability, ListOps, OpResult, SelectOps, StringOps,
};
pub use number::{Number, ParseNumberError};

/// A shared, immutable runtime value.
pub type TypedValue = Rc<dyn Value>;

/// Behavioral contract for values participating in evaluation.
///
/// Implementations override the `as_*` queries for the capabilities they
/// support and leave the rest at the `None` default. `render` is the
/// human-readable form used in diagnostics and error messages.
pub trait Value: Debug + 'static {
    fn as_any(&self) -> &dyn Any;

    /// Textual rendering for diagnostics.
    fn render(&self) -> String;

    fn as_boolean(&self) -> Option<&dyn BooleanOps> {
        None
    }

    fn as_arithmetic(&self) -> Option<&dyn ArithmeticOps> {
        None
    }

    fn as_string(&self) -> Option<&dyn StringOps> {
        None
    }

    fn as_list(&self) -> Option<&dyn ListOps> {
        None
    }

    fn as_select(&self) -> Option<&dyn SelectOps> {
        None
    }

    /// Coercion to a single boolean, for conditional tests. Only
    /// scalar boolean-like values return `Some`.
    fn truth(&self) -> Option<bool> {
        None
    }
}

impl dyn Value {
    /// Downcast to a concrete value type.
    pub fn downcast_ref<T: Value>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    pub fn is<T: Value>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Lift a concrete value into a shared [`TypedValue`].
pub trait IntoValue {
    fn into_value(self) -> TypedValue;
}

impl<T: Value> IntoValue for T {
    fn into_value(self) -> TypedValue {
        Rc::new(self)
    }
}
