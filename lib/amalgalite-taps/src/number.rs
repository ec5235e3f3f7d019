///
/// Numeric observations.
///
/// Samples arrive either as integers (byte counts, row counts, nanoseconds)
/// or as floats (seconds, ratios). `Number` keeps integers integral for as
/// long as the arithmetic allows so that sums and extremes print the way they
/// were fed in, and falls back to `f64` on overflow or when mixed with a float.
///

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul};
use std::time::Duration;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub const ZERO: Number = Number::Int(0);

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_int(self) -> bool {
        matches!(self, Number::Int(_))
    }

    pub fn square(self) -> Number {
        self * self
    }

    /// Parses `42`, `-7`, `0.25` or `1e3`. Integers win when the text allows.
    /// `nan`, `inf` and anything else that is not a finite number is rejected.
    pub fn parse(text: &str) -> Option<Number> {
        let text = text.trim();
        if let Ok(i) = text.parse::<i64>() {
            return Some(Number::Int(i));
        }
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Number::Float)
    }
}

impl Default for Number {
    fn default() -> Self {
        Number::ZERO
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => match a.checked_add(b) {
                Some(sum) => Number::Int(sum),
                None => Number::Float(a as f64 + b as f64),
            },
            (a, b) => Number::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl Mul for Number {
    type Output = Number;

    fn mul(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => match a.checked_mul(b) {
                Some(product) => Number::Int(product),
                None => Number::Float(a as f64 * b as f64),
            },
            (a, b) => Number::Float(a.as_f64() * b.as_f64()),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => write_float(f, *x),
        }
    }
}

/// Plain notation from 1e-4 up to 1e16, `<mantissa>e<+|-><2+ digits>`
/// outside it, always with a fractional part: `49.0`, `1.0e-05`, `1.5e+20`.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("NaN");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "Infinity" } else { "-Infinity" });
    }

    // Debug switches to exponent form at the same bounds and keeps ".0"
    let text = format!("{:?}", x);
    match text.split_once('e') {
        None => f.write_str(&text),
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;
            if mantissa.contains('.') {
                write!(f, "{}e{:+03}", mantissa, exponent)
            } else {
                write!(f, "{}.0e{:+03}", mantissa, exponent)
            }
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Number::Int(i) => serializer.serialize_i64(*i),
            Number::Float(x) => serializer.serialize_f64(*x),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Int(value as i64)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::Int(value as i64)
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Number::Int(i),
            Err(_) => Number::Float(value as f64),
        }
    }
}

impl From<usize> for Number {
    fn from(value: usize) -> Self {
        Number::from(value as u64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float(value as f64)
    }
}

/// Durations are recorded in whole nanoseconds, the unit SQLite profiles in.
impl From<Duration> for Number {
    fn from(value: Duration) -> Self {
        match i64::try_from(value.as_nanos()) {
            Ok(ns) => Number::Int(ns),
            Err(_) => Number::Float(value.as_nanos() as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_arithmetic_stays_integral() {
        let sum = Number::from(40) + Number::from(2);
        assert!(sum.is_int());
        assert_eq!(sum.to_string(), "42");
        assert_eq!(Number::from(42).square().to_string(), "1764");
    }

    #[test]
    fn test_mixed_arithmetic_promotes_to_float() {
        let sum = Number::from(1) + Number::from(0.5);
        assert!(!sum.is_int());
        assert_eq!(sum.to_string(), "1.5");
    }

    #[test]
    fn test_overflow_promotes_to_float() {
        let big = Number::from(i64::MAX) + Number::from(1);
        assert!(!big.is_int());
        assert!(big.as_f64() > 9.2e18);

        let squared = Number::from(i64::MAX).square();
        assert!(!squared.is_int());
    }

    #[test]
    fn test_float_display_keeps_fraction() {
        assert_eq!(Number::from(49.0).to_string(), "49.0");
        assert_eq!(Number::from(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_ordering_across_kinds() {
        assert!(Number::from(2) < Number::from(2.5));
        assert!(Number::from(3.0) > Number::from(2));
        assert_eq!(Number::from(2), Number::from(2.0));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Number::parse("42"), Some(Number::Int(42)));
        assert!(Number::parse(" 42 ").is_some_and(|n| n.is_int()));
        assert_eq!(Number::parse("0.5"), Some(Number::Float(0.5)));
        assert_eq!(Number::parse("abc"), None);
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert_eq!(Number::parse("nan"), None);
        assert_eq!(Number::parse("NaN"), None);
        assert_eq!(Number::parse("inf"), None);
        assert_eq!(Number::parse("-infinity"), None);
        assert_eq!(Number::parse("1e400"), None);
    }

    #[test]
    fn test_float_display_exponent_form() {
        assert_eq!(Number::from(0.0001).to_string(), "0.0001");
        assert_eq!(Number::from(0.00001).to_string(), "1.0e-05");
        assert_eq!(Number::from(1.5e-7).to_string(), "1.5e-07");
        assert_eq!(Number::from(1e15).to_string(), "1000000000000000.0");
        assert_eq!(Number::from(1e20).to_string(), "1.0e+20");
        assert_eq!(Number::from(-2.5e100).to_string(), "-2.5e+100");
        assert_eq!(Number::from(f64::NAN).to_string(), "NaN");
        assert_eq!(Number::from(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Number::from(Duration::from_micros(3)), Number::Int(3_000));
        assert!(!Number::from(u64::MAX).is_int());
        assert_eq!(Number::from(7usize), Number::Int(7));
    }
}
