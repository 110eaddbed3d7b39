//! Builtin function packages.
//!
//! Packages are plain installers over a
//! [`FunctionRegistry`](crate::registry::FunctionRegistry); hosts either
//! install them into a registry of their own or activate them process-wide.

pub mod math;

use crate::registry;

/// Install the builtin math package into the process-wide default
/// registry, making names like `sqrt` and `atan2` available to
/// [`Expr::evaluate`](crate::Expr::evaluate).
pub fn activate_builtin_math() {
    registry::with_default_registry(math::install);
}
