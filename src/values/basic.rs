//! Builtin boolean, text and list representations.
//!
//! These cover the `TRUE`/`FALSE` and `TEXT` literals reachable from the
//! grammar, plus a plain list value for hosts that don't bring their own.
//! They are deliberately minimal; host value types with richer semantics
//! participate through the same capability traits.

use std::any::Any;
use std::fmt;

use crate::evaluator::{operators, EvalError};
use crate::values::{
    BooleanOps, Capability, IntoValue, ListOps, Number, OpResult, StringOps, TypedValue, Value,
};

/// A scalar boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bool(pub bool);

fn rhs_bool(other: &dyn Value) -> Result<bool, EvalError> {
    match other.downcast_ref::<Bool>() {
        Some(b) => Ok(b.0),
        None => Err(EvalError::MissingCapability {
            capability: Capability::Boolean,
            value: other.render(),
        }),
    }
}

impl BooleanOps for Bool {
    fn and(&self, other: &dyn Value) -> OpResult {
        Ok(Bool(self.0 & rhs_bool(other)?).into_value())
    }

    fn or(&self, other: &dyn Value) -> OpResult {
        Ok(Bool(self.0 | rhs_bool(other)?).into_value())
    }

    fn xor(&self, other: &dyn Value) -> OpResult {
        Ok(Bool(self.0 ^ rhs_bool(other)?).into_value())
    }

    fn not(&self) -> OpResult {
        Ok(Bool(!self.0).into_value())
    }

    fn eq(&self, other: &dyn Value) -> OpResult {
        Ok(Bool(self.0 == rhs_bool(other)?).into_value())
    }

    fn ne(&self, other: &dyn Value) -> OpResult {
        Ok(Bool(self.0 != rhs_bool(other)?).into_value())
    }
}

impl Value for Bool {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn as_boolean(&self) -> Option<&dyn BooleanOps> {
        Some(self)
    }

    fn truth(&self) -> Option<bool> {
        Some(self.0)
    }
}

impl fmt::Display for Bool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "TRUE" } else { "FALSE" })
    }
}

/// A text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text(pub String);

impl Text {
    pub fn new(s: impl Into<String>) -> Self {
        Text(s.into())
    }
}

fn rhs_text<'a>(other: &'a dyn Value) -> Result<&'a Text, EvalError> {
    other.downcast_ref::<Text>().ok_or_else(|| EvalError::MissingCapability {
        capability: Capability::String,
        value: other.render(),
    })
}

impl StringOps for Text {
    fn concat(&self, other: &dyn Value) -> OpResult {
        let mut joined = self.0.clone();
        joined.push_str(&rhs_text(other)?.0);
        Ok(Text(joined).into_value())
    }

    fn len(&self) -> OpResult {
        Ok(Number::Int(self.0.chars().count() as i64).into_value())
    }

    fn eq(&self, other: &dyn Value) -> OpResult {
        Ok(Bool(self.0 == rhs_text(other)?.0).into_value())
    }

    fn ne(&self, other: &dyn Value) -> OpResult {
        Ok(Bool(self.0 != rhs_text(other)?.0).into_value())
    }
}

impl Value for Text {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn render(&self) -> String {
        format!("\"{}\"", self.0)
    }

    fn as_string(&self) -> Option<&dyn StringOps> {
        Some(self)
    }
}

/// An ordered collection of values.
#[derive(Debug, Clone)]
pub struct List(pub Vec<TypedValue>);

impl List {
    pub fn new(items: impl IntoIterator<Item = TypedValue>) -> Self {
        List(items.into_iter().collect())
    }
}

fn rhs_list<'a>(other: &'a dyn Value) -> Result<&'a List, EvalError> {
    other.downcast_ref::<List>().ok_or_else(|| EvalError::MissingCapability {
        capability: Capability::List,
        value: other.render(),
    })
}

impl ListOps for List {
    fn concat(&self, other: &dyn Value) -> OpResult {
        let mut joined = self.0.clone();
        joined.extend(rhs_list(other)?.0.iter().cloned());
        Ok(List(joined).into_value())
    }

    fn len(&self) -> OpResult {
        Ok(Number::Int(self.0.len() as i64).into_value())
    }

    fn contains(&self, item: &dyn Value) -> OpResult {
        let found = self
            .0
            .iter()
            .any(|candidate| operators::values_equal(candidate.as_ref(), item));
        Ok(Bool(found).into_value())
    }

    fn eq(&self, other: &dyn Value) -> OpResult {
        let rhs = rhs_list(other)?;
        let equal = self.0.len() == rhs.0.len()
            && self
                .0
                .iter()
                .zip(rhs.0.iter())
                .all(|(a, b)| operators::values_equal(a.as_ref(), b.as_ref()));
        Ok(Bool(equal).into_value())
    }

    fn ne(&self, other: &dyn Value) -> OpResult {
        let equal = ListOps::eq(self, other)?.truth().unwrap_or(false);
        Ok(Bool(!equal).into_value())
    }
}

impl Value for List {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn render(&self) -> String {
        let items: Vec<String> = self.0.iter().map(|v| v.render()).collect();
        format!("[{}]", items.join(", "))
    }

    fn as_list(&self) -> Option<&dyn ListOps> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_algebra_is_bitwise_not_short_circuit() {
        let t = Bool(true);
        let result = t.and(&Bool(false)).unwrap();
        assert_eq!(result.truth(), Some(false));
        let result = t.xor(&Bool(true)).unwrap();
        assert_eq!(result.truth(), Some(false));
    }

    #[test]
    fn boolean_rejects_non_boolean_operand() {
        let err = Bool(true).and(&Number::Int(1)).unwrap_err();
        assert!(matches!(
            err,
            EvalError::MissingCapability {
                capability: Capability::Boolean,
                ..
            }
        ));
    }

    #[test]
    fn text_concat_and_length() {
        let hello = Text::new("hello ");
        let joined = hello.concat(&Text::new("world")).unwrap();
        assert_eq!(joined.downcast_ref::<Text>().unwrap().0, "hello world");
        let len = Text::new("héllo").len().unwrap();
        assert_eq!(len.downcast_ref::<Number>(), Some(&Number::Int(5)));
    }

    #[test]
    fn list_membership_uses_value_equality() {
        let list = List::new([
            Number::Int(1).into_value(),
            Number::Int(2).into_value(),
            Text::new("x").into_value(),
        ]);
        let hit = list.contains(&Number::Float(2.0)).unwrap();
        assert_eq!(hit.truth(), Some(true));
        let miss = list.contains(&Number::Int(9)).unwrap();
        assert_eq!(miss.truth(), Some(false));
    }

    #[test]
    fn list_equality_is_elementwise() {
        let a = List::new([Number::Int(1).into_value(), Number::Int(2).into_value()]);
        let b = List::new([Number::Int(1).into_value(), Number::Int(2).into_value()]);
        let c = List::new([Number::Int(1).into_value()]);
        assert_eq!(ListOps::eq(&a, &b).unwrap().truth(), Some(true));
        assert_eq!(ListOps::eq(&a, &c).unwrap().truth(), Some(false));
    }
}
