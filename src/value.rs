//! Dynamic value representation for Fusion tables.
//!
//! This module provides the [`Value`] enum: the closed set of value kinds the
//! table grammar knows how to spell. Renderers match on it exhaustively, so a
//! value that reaches [`crate::render`] always has exactly one formatting rule.
//!
//! ## Core Types
//!
//! - [`Value`]: null, bool, number, text, point tuple, FuID, nested table, sequence
//! - [`Number`]: an integer or a float. Integer arithmetic stays integer, so a
//!   handle computed as `0 + (1 - 0) * 0` still prints as `0`.
//!
//! ## Creating Values
//!
//! ```rust
//! use fusion_table::{Number, Table, Value};
//!
//! let null = Value::Null;
//! let flag = Value::from(true);
//! let size = Value::from(1.5);
//! let text = Value::from("Hello");
//! let point = Value::from((0.25, 0.5));
//! let nested = Value::from(Table::new("Input"));
//!
//! assert!(null.is_null());
//! assert_eq!(size.as_number(), Some(Number::Float(1.5)));
//! assert!(point.is_tuple());
//! ```

use crate::{Key, Table};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A dynamically-typed value inside a [`Table`].
///
/// `Null` entries are kept in the table but never rendered and never counted
/// when deciding whether a table collapses onto one line.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    /// Fixed-size point or color tuple, rendered `{ a, b }`.
    Tuple(Vec<Value>),
    /// Enumerated identifier, rendered `FuID { "name" }`.
    FuId(String),
    Table(Table),
    /// Variable-length list, rendered as a bracketed block.
    Sequence(Vec<Value>),
}

/// A numeric value.
///
/// Frames and keyframe values are usually integers while curve strengths are
/// floats; mixing them promotes to float. Comparison is numeric, so
/// `Integer(8) == Float(8.0)`.
///
/// # Examples
///
/// ```rust
/// use fusion_table::Number;
///
/// let frame = Number::Integer(24);
/// let third = Number::Float(1.0 / 3.0);
///
/// assert_eq!(frame * third, Number::Float(8.0));
/// assert_eq!(Number::Integer(1) * Number::Integer(0), Number::Integer(0));
/// assert_eq!(Number::Float(8.0).to_string(), "8.0");
/// ```
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Returns `true` if this is an integer value.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns `true` unless this is a NaN or infinite float.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Number::Integer(_) => true,
            Number::Float(f) => f.is_finite(),
        }
    }

    /// Converts this number to an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }

    fn combine(
        self,
        rhs: Number,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> Number {
        match (self, rhs) {
            (Number::Integer(a), Number::Integer(b)) => match int_op(a, b) {
                Some(v) => Number::Integer(v),
                None => Number::Float(float_op(a as f64, b as f64)),
            },
            (a, b) => Number::Float(float_op(a.as_f64(), b.as_f64())),
        }
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Number) -> Number {
        self.combine(rhs, i64::checked_add, |a, b| a + b)
    }
}

impl Sub for Number {
    type Output = Number;

    fn sub(self, rhs: Number) -> Number {
        self.combine(rhs, i64::checked_sub, |a, b| a - b)
    }
}

impl Mul for Number {
    type Output = Number;

    fn mul(self, rhs: Number) -> Number {
        self.combine(rhs, i64::checked_mul, |a, b| a * b)
    }
}

/// Compares an integer with a float without rounding the integer.
fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    // 2^63: first float above i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        None
    } else if f >= LIMIT {
        Some(Ordering::Less)
    } else if f < -LIMIT {
        Some(Ordering::Greater)
    } else {
        let whole = f.trunc();
        match i.cmp(&(whole as i64)) {
            Ordering::Equal if f > whole => Some(Ordering::Less),
            Ordering::Equal if f < whole => Some(Ordering::Greater),
            ord => Some(ord),
        }
    }
}

impl Number {
    /// A total order: exact across integers and floats, NaN sorts last and
    /// `-0.0` equals `0.0`.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or_else(|| {
            let (a, b) = (self.as_f64(), other.as_f64());
            a.is_nan().cmp(&b.is_nan())
        })
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => Some(a.cmp(b)),
            (Number::Integer(a), Number::Float(b)) => cmp_int_float(*a, *b),
            (Number::Float(a), Number::Integer(b)) => cmp_int_float(*b, *a).map(Ordering::reverse),
            (Number::Float(a), Number::Float(b)) => a.partial_cmp(b),
        }
    }
}

/// Shortest round-trip float text: positional with a fractional part for
/// exponents in `-4..16`, otherwise `1.5e+20` / `1e-07`.
fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if !value.is_finite() {
        return write!(f, "{:?}", value);
    }
    let sci = format!("{:e}", value.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let sign = if value.is_sign_negative() { "-" } else { "" };

    if (-4..16).contains(&exp) {
        let point = exp + 1;
        let len = digits.len() as i32;
        if point <= 0 {
            write!(f, "{sign}0.{}{digits}", "0".repeat((-point) as usize))
        } else if point >= len {
            write!(f, "{sign}{digits}{}.0", "0".repeat((point - len) as usize))
        } else {
            let (whole, frac) = digits.split_at(point as usize);
            write!(f, "{sign}{whole}.{frac}")
        }
    } else {
        let (lead, rest) = digits.split_at(1);
        let exp_sign = if exp < 0 { '-' } else { '+' };
        if rest.is_empty() {
            write!(f, "{sign}{lead}e{exp_sign}{:02}", exp.abs())
        } else {
            write!(f, "{sign}{lead}.{rest}e{exp_sign}{:02}", exp.abs())
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write_float(f, *fl),
        }
    }
}

macro_rules! number_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(value: $t) -> Self {
                    Number::Integer(value as i64)
                }
            }

            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Number(Number::from(value))
                }
            }
        )*
    };
}

number_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        if value <= i64::MAX as u64 {
            Number::Integer(value as i64)
        } else {
            Number::Float(value as f64)
        }
    }
}

impl From<usize> for Number {
    fn from(value: usize) -> Self {
        Number::from(value as u64)
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float(value as f64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl Value {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a nested table.
    #[inline]
    #[must_use]
    pub const fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    /// Returns `true` if the value is a point tuple.
    #[inline]
    #[must_use]
    pub const fn is_tuple(&self) -> bool {
        matches!(self, Value::Tuple(_))
    }

    /// Returns `true` if the value may appear inside a point tuple.
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Number(_) | Value::Text(_) | Value::FuId(_)
        )
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a nested table, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// If the value is a nested table, returns a mutable reference to it.
    #[inline]
    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// If the value is a sequence, returns its items.
    #[inline]
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::Text(s) | Value::FuId(s) => serializer.serialize_str(s),
            Value::Tuple(items) | Value::Sequence(items) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Table(table) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(table.raw_len()))?;
                for (k, v) in table.iter() {
                    match k {
                        Key::Name(name) => map.serialize_entry(name, v)?,
                        other => map.serialize_entry(&other.to_string(), v)?,
                    }
                }
                map.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Table> for Value {
    fn from(value: Table) -> Self {
        Value::Table(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Sequence(value.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Value::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Value {
    fn from((a, b, c): (A, B, C)) -> Self {
        Value::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>, D: Into<Value>> From<(A, B, C, D)>
    for Value
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        Value::Tuple(vec![a.into(), b.into(), c.into(), d.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display() {
        assert_eq!(Number::Integer(24).to_string(), "24");
        assert_eq!(Number::Float(8.0).to_string(), "8.0");
        assert_eq!(Number::Float(0.25).to_string(), "0.25");
        assert_eq!(Number::Float(1.0 / 3.0).to_string(), "0.3333333333333333");
        assert_eq!(Number::Integer(-33).to_string(), "-33");
    }

    #[test]
    fn test_integer_arithmetic_stays_integer() {
        let v = Number::Integer(1) - Number::Integer(0);
        assert!(v.is_integer());
        assert!((v * Number::Integer(0)).is_integer());
        assert!(!(v * Number::Float(0.5)).is_integer());
    }

    #[test]
    fn test_overflow_promotes_to_float() {
        let big = Number::Integer(i64::MAX) + Number::Integer(1);
        assert!(!big.is_integer());
    }

    #[test]
    fn test_float_exponent_text() {
        assert_eq!(Number::Float(1e20).to_string(), "1e+20");
        assert_eq!(Number::Float(1.5e20).to_string(), "1.5e+20");
        assert_eq!(Number::Float(1e-7).to_string(), "1e-07");
        assert_eq!(Number::Float(-2.5e-5).to_string(), "-2.5e-05");
        assert_eq!(Number::Float(1e16).to_string(), "1e+16");
        assert_eq!(Number::Float(1e15).to_string(), "1000000000000000.0");
        assert_eq!(Number::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Number::Float(0.0).to_string(), "0.0");
        assert_eq!(Number::Float(-0.0).to_string(), "-0.0");
        assert_eq!(Number::Float(-1.25).to_string(), "-1.25");
    }

    #[test]
    fn test_mixed_equality_is_exact() {
        let two_53 = 1i64 << 53;
        let float = Number::Float(two_53 as f64);
        assert_eq!(Number::Integer(two_53), float);
        assert_ne!(Number::Integer(two_53 + 1), float);
        assert!(Number::Integer(two_53 + 1) > float);
        assert_ne!(Number::Integer(i64::MAX), Number::Float(i64::MAX as f64));
        assert!(Number::Integer(i64::MAX) < Number::Float(i64::MAX as f64));
        assert!(Number::Integer(-3) > Number::Float(-3.5));
        assert_eq!(Number::Float(-0.0), Number::Integer(0));
        assert_eq!(Number::Float(f64::NAN).total_cmp(&Number::Integer(1)), Ordering::Greater);
    }

    #[test]
    fn test_numeric_equality_and_order() {
        assert_eq!(Number::Integer(8), Number::Float(8.0));
        assert!(Number::Integer(12) < Number::Float(12.5));
        assert!(!Number::Float(f64::NAN).is_finite());
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i32), Value::Number(Number::Integer(42)));
        assert_eq!(Value::from(0.5), Value::Number(Number::Float(0.5)));
        assert_eq!(Value::from("Mask"), Value::Text("Mask".to_string()));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(3)), Value::Number(Number::Integer(3)));
    }

    #[test]
    fn test_from_tuple_and_vec() {
        assert_eq!(
            Value::from((0.25, 0.5)),
            Value::Tuple(vec![Value::from(0.25), Value::from(0.5)])
        );
        assert_eq!(
            Value::from(vec![1, 2]),
            Value::Sequence(vec![Value::from(1), Value::from(2)])
        );
    }

    #[test]
    fn test_scalar_kinds() {
        assert!(Value::from(1).is_scalar());
        assert!(Value::FuId("Merge".to_string()).is_scalar());
        assert!(!Value::Null.is_scalar());
        assert!(!Value::from(Table::unnamed()).is_scalar());
    }
}
