//! The builtin numeric type.
//!
//! `Number` is the one literal kind the grammar knows. It keeps the
//! narrowest representation that holds the value and promotes upward
//! (integer → real → complex) when an operation mixes representations.

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use crate::evaluator::EvalError;
use crate::values::{ArithmeticOps, Bool, Capability, IntoValue, OpResult, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
    Complex { re: f64, im: f64 },
}

impl Number {
    pub fn complex(re: f64, im: f64) -> Self {
        Number::Complex { re, im }
    }

    /// The value as an `f64`, when it is real-valued.
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Number::Int(v) => Some(v as f64),
            Number::Float(v) => Some(v),
            Number::Complex { .. } => None,
        }
    }

    /// The value as an `i64`, when it is an integer.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::Int(v) => Some(v),
            _ => None,
        }
    }

    fn as_parts(self) -> (f64, f64) {
        match self {
            Number::Int(v) => (v as f64, 0.0),
            Number::Float(v) => (v, 0.0),
            Number::Complex { re, im } => (re, im),
        }
    }

    fn is_complex(self) -> bool {
        matches!(self, Number::Complex { .. })
    }

    /// Collapse a complex result whose imaginary part vanished entirely.
    /// Only exact zeros collapse; rounding artifacts are kept as-is.
    fn from_parts(re: f64, im: f64) -> Self {
        if im == 0.0 {
            Number::Float(re)
        } else {
            Number::Complex { re, im }
        }
    }

    pub fn add(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => match a.checked_add(b) {
                Some(v) => Number::Int(v),
                None => Number::Float(a as f64 + b as f64),
            },
            _ if self.is_complex() || other.is_complex() => {
                let (ar, ai) = self.as_parts();
                let (br, bi) = other.as_parts();
                Number::Complex { re: ar + br, im: ai + bi }
            }
            _ => {
                let (a, b) = (self.as_parts().0, other.as_parts().0);
                Number::Float(a + b)
            }
        }
    }

    pub fn sub(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => match a.checked_sub(b) {
                Some(v) => Number::Int(v),
                None => Number::Float(a as f64 - b as f64),
            },
            _ if self.is_complex() || other.is_complex() => {
                let (ar, ai) = self.as_parts();
                let (br, bi) = other.as_parts();
                Number::Complex { re: ar - br, im: ai - bi }
            }
            _ => {
                let (a, b) = (self.as_parts().0, other.as_parts().0);
                Number::Float(a - b)
            }
        }
    }

    pub fn mul(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => match a.checked_mul(b) {
                Some(v) => Number::Int(v),
                None => Number::Float(a as f64 * b as f64),
            },
            _ if self.is_complex() || other.is_complex() => {
                let (ar, ai) = self.as_parts();
                let (br, bi) = other.as_parts();
                Number::Complex {
                    re: ar * br - ai * bi,
                    im: ar * bi + ai * br,
                }
            }
            _ => {
                let (a, b) = (self.as_parts().0, other.as_parts().0);
                Number::Float(a * b)
            }
        }
    }

    /// True division: integer operands produce a real result, as in the
    /// source language. Division by zero follows IEEE 754.
    pub fn div(self, other: Number) -> Number {
        if self.is_complex() || other.is_complex() {
            let (ar, ai) = self.as_parts();
            let (br, bi) = other.as_parts();
            let denom = br * br + bi * bi;
            Number::Complex {
                re: (ar * br + ai * bi) / denom,
                im: (ai * br - ar * bi) / denom,
            }
        } else {
            let (a, b) = (self.as_parts().0, other.as_parts().0);
            Number::Float(a / b)
        }
    }

    pub fn neg(self) -> Number {
        match self {
            Number::Int(v) => match v.checked_neg() {
                Some(n) => Number::Int(n),
                None => Number::Float(-(v as f64)),
            },
            Number::Float(v) => Number::Float(-v),
            Number::Complex { re, im } => Number::Complex { re: -re, im: -im },
        }
    }

    pub fn abs(self) -> Number {
        match self {
            Number::Int(v) => match v.checked_abs() {
                Some(n) => Number::Int(n),
                None => Number::Float((v as f64).abs()),
            },
            Number::Float(v) => Number::Float(v.abs()),
            Number::Complex { re, im } => Number::Float(re.hypot(im)),
        }
    }

    pub fn pow(self, other: Number) -> Number {
        if let (Number::Int(base), Number::Int(exp)) = (self, other) {
            if (0..=u32::MAX as i64).contains(&exp) {
                if let Some(v) = base.checked_pow(exp as u32) {
                    return Number::Int(v);
                }
            }
        }
        if self.is_complex() || other.is_complex() {
            return complex_pow(self.as_parts(), other.as_parts());
        }
        let (base, exp) = (self.as_parts().0, other.as_parts().0);
        // A negative base with a fractional exponent has no real result;
        // promote to the complex plane instead of returning NaN.
        if base < 0.0 && exp.fract() != 0.0 {
            return complex_pow((base, 0.0), (exp, 0.0));
        }
        Number::Float(base.powf(exp))
    }

    pub fn equals(self, other: Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            _ => self.as_parts() == other.as_parts(),
        }
    }

    /// Ordering comparison, `None` for complex operands (unordered) and
    /// for NaN per IEEE 754.
    pub fn compare(self, other: Number) -> Option<std::cmp::Ordering> {
        if self.is_complex() || other.is_complex() {
            return None;
        }
        let (a, b) = (self.as_parts().0, other.as_parts().0);
        a.partial_cmp(&b)
    }
}

/// `z ^ w` over the complex plane via the polar form `exp(w · ln z)`.
fn complex_pow((ar, ai): (f64, f64), (br, bi): (f64, f64)) -> Number {
    if ar == 0.0 && ai == 0.0 {
        // 0^0 = 1 and 0^w = 0 for positive real exponents.
        if br == 0.0 && bi == 0.0 {
            return Number::Int(1);
        }
        return Number::from_parts(0.0, 0.0);
    }
    let modulus = ar.hypot(ai);
    let arg = ai.atan2(ar);
    let ln_r = modulus.ln();
    // exp((br + bi·i)(ln_r + arg·i))
    let re_exp = br * ln_r - bi * arg;
    let im_exp = br * arg + bi * ln_r;
    let scale = re_exp.exp();
    Number::from_parts(scale * im_exp.cos(), scale * im_exp.sin())
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

/// Error type for [`Number::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a number literal")]
pub struct ParseNumberError;

/// Number literals parse to the narrowest representation: integer if the
/// text is one, then real, then complex (`<real>(+|-)<real>j`).
impl FromStr for Number {
    type Err = ParseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(body) = s.strip_suffix('j') {
            let split = body
                .char_indices()
                .skip(1)
                .find(|&(_, c)| c == '+' || c == '-')
                .map(|(i, _)| i)
                .ok_or(ParseNumberError)?;
            let re: f64 = body[..split].parse().map_err(|_| ParseNumberError)?;
            let im: f64 = body[split..].parse().map_err(|_| ParseNumberError)?;
            return Ok(Number::Complex { re, im });
        }
        if let Ok(v) = s.parse::<i64>() {
            return Ok(Number::Int(v));
        }
        s.parse::<f64>().map(Number::Float).map_err(|_| ParseNumberError)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Float(v) => f.write_str(&format_real(v)),
            Number::Complex { re, im } => {
                if im.is_sign_negative() {
                    write!(f, "{}-{}j", format_real(re), format_real(-im))
                } else {
                    write!(f, "{}+{}j", format_real(re), format_real(im))
                }
            }
        }
    }
}

/// Plain-decimal rendering of an `f64`. The literal grammar has no
/// exponent form, so the scientific notation `{:?}` uses for large and
/// small magnitudes is expanded positionally; the significant digits are
/// kept verbatim, which preserves the value exactly on re-parse.
fn format_real(v: f64) -> String {
    let repr = format!("{v:?}");
    let Some((mantissa, exponent)) = repr.split_once(['e', 'E']) else {
        return repr;
    };
    let exponent: i64 = match exponent.parse() {
        Ok(e) => e,
        Err(_) => return repr,
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{int_part}{frac_part}");
    let point = int_part.len() as i64 + exponent;

    let mut out = String::from(sign);
    if point <= 0 {
        out.push_str("0.");
        for _ in 0..(-point) {
            out.push('0');
        }
        out.push_str(&digits);
    } else if point as usize >= digits.len() {
        out.push_str(&digits);
        for _ in 0..(point as usize - digits.len()) {
            out.push('0');
        }
        // Keep the decimal point so the rendering stays a float literal.
        out.push_str(".0");
    } else {
        out.push_str(&digits[..point as usize]);
        out.push('.');
        out.push_str(&digits[point as usize..]);
    }
    out
}

fn rhs_number(operation: &'static str, lhs: &Number, other: &dyn Value) -> Result<Number, EvalError> {
    if let Some(n) = other.downcast_ref::<Number>() {
        return Ok(*n);
    }
    if other.as_arithmetic().is_some() {
        return Err(EvalError::IncompatibleOperands {
            operation,
            left: lhs.render(),
            right: other.render(),
        });
    }
    Err(EvalError::MissingCapability {
        capability: Capability::Arithmetic,
        value: other.render(),
    })
}

fn unordered(operation: &'static str, value: &Number) -> EvalError {
    EvalError::UnsupportedOperation {
        operation,
        value: value.render(),
    }
}

impl ArithmeticOps for Number {
    fn abs(&self) -> OpResult {
        Ok(Number::abs(*self).into_value())
    }

    fn add(&self, other: &dyn Value) -> OpResult {
        Ok(Number::add(*self, rhs_number("+", self, other)?).into_value())
    }

    fn sub(&self, other: &dyn Value) -> OpResult {
        Ok(Number::sub(*self, rhs_number("-", self, other)?).into_value())
    }

    fn mul(&self, other: &dyn Value) -> OpResult {
        Ok(Number::mul(*self, rhs_number("*", self, other)?).into_value())
    }

    fn div(&self, other: &dyn Value) -> OpResult {
        Ok(Number::div(*self, rhs_number("/", self, other)?).into_value())
    }

    fn neg(&self) -> OpResult {
        Ok(Number::neg(*self).into_value())
    }

    fn pow(&self, other: &dyn Value) -> OpResult {
        Ok(Number::pow(*self, rhs_number("^", self, other)?).into_value())
    }

    fn eq(&self, other: &dyn Value) -> OpResult {
        Ok(Bool(self.equals(rhs_number("==", self, other)?)).into_value())
    }

    fn ne(&self, other: &dyn Value) -> OpResult {
        Ok(Bool(!self.equals(rhs_number("!=", self, other)?)).into_value())
    }

    fn lt(&self, other: &dyn Value) -> OpResult {
        let rhs = rhs_number("<", self, other)?;
        match self.compare(rhs) {
            Some(ord) => Ok(Bool(ord.is_lt()).into_value()),
            None if self.is_complex() || rhs.is_complex() => Err(unordered("<", self)),
            None => Ok(Bool(false).into_value()),
        }
    }

    fn le(&self, other: &dyn Value) -> OpResult {
        let rhs = rhs_number("<=", self, other)?;
        match self.compare(rhs) {
            Some(ord) => Ok(Bool(ord.is_le()).into_value()),
            None if self.is_complex() || rhs.is_complex() => Err(unordered("<=", self)),
            None => Ok(Bool(false).into_value()),
        }
    }

    fn gt(&self, other: &dyn Value) -> OpResult {
        let rhs = rhs_number(">", self, other)?;
        match self.compare(rhs) {
            Some(ord) => Ok(Bool(ord.is_gt()).into_value()),
            None if self.is_complex() || rhs.is_complex() => Err(unordered(">", self)),
            None => Ok(Bool(false).into_value()),
        }
    }

    fn ge(&self, other: &dyn Value) -> OpResult {
        let rhs = rhs_number(">=", self, other)?;
        match self.compare(rhs) {
            Some(ord) => Ok(Bool(ord.is_ge()).into_value()),
            None if self.is_complex() || rhs.is_complex() => Err(unordered(">=", self)),
            None => Ok(Bool(false).into_value()),
        }
    }

    fn as_float(&self) -> Option<f64> {
        self.as_f64()
    }
}

impl Value for Number {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn as_arithmetic(&self) -> Option<&dyn ArithmeticOps> {
        Some(self)
    }
}
