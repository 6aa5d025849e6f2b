//! Total order over all values.
//!
//! Values of different kinds order by rank:
//!
//! | rank | kinds |
//! |------|-------|
//! | 0 | null |
//! | 1 | boolean |
//! | 2 | integer, float, numeric (compared by numeric value) |
//! | 3 | timestamp |
//! | 4 | string |
//! | 5 | object |
//! | 6 | array |
//! | 7 | vertex |
//! | 8 | edge |
//! | 9 | path |
//!
//! Within a rank: `false < true`; numbers compare exactly across
//! representations with NaN above every other number and equal to itself;
//! strings compare byte-wise; objects compare by pair count, then pair by
//! pair in canonical key order (key, then value); arrays and paths compare
//! element-wise with the shorter one first on a common prefix; vertices and
//! edges compare by `id` alone.

use std::cmp::Ordering;

use agraph_common::utils::error::Result;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use super::container::Agtype;
use super::format::key_cmp;
use super::value::{Value, scan_pair, sorted_pairs};

/// Compares two values under the total order.
///
/// [`Value::Binary`] parts are decoded first. A binary that fails to
/// decode sorts after every valid value, and such binaries compare by
/// their raw bytes.
#[must_use]
pub fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Binary(x), Value::Binary(y)) => match (x.decode(), y.decode()) {
            (Ok(x), Ok(y)) => compare(&x, &y),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => x.as_bytes().cmp(y.as_bytes()),
        },
        (Value::Binary(x), other) => match x.decode() {
            Ok(x) => compare(&x, other),
            Err(_) => Ordering::Greater,
        },
        (other, Value::Binary(y)) => match y.decode() {
            Ok(y) => compare(other, &y),
            Err(_) => Ordering::Less,
        },
        _ => compare_resolved(a, b),
    }
}

/// Compares two encoded values.
///
/// # Errors
///
/// Returns a corruption error if either buffer fails to decode.
pub fn compare_encoded(a: &Agtype, b: &Agtype) -> Result<Ordering> {
    Ok(compare(&a.decode()?, &b.decode()?))
}

pub(crate) fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Integer(_) | Value::Float(_) | Value::Numeric(_) => 2,
        Value::Timestamp(_) => 3,
        Value::String(_) => 4,
        Value::Object(_) => 5,
        Value::Array(_) => 6,
        Value::Vertex(_) => 7,
        Value::Edge(_) => 8,
        Value::Path(_) => 9,
        Value::Binary(_) => 10,
    }
}

fn compare_resolved(a: &Value, b: &Value) -> Ordering {
    let by_rank = rank(a).cmp(&rank(b));
    if by_rank != Ordering::Equal {
        return by_rank;
    }
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Timestamp(x), Value::Timestamp(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.as_bytes().cmp(y.as_bytes()),
        (Value::Object(x), Value::Object(y)) => compare_pairs(x, y),
        (Value::Array(x), Value::Array(y)) | (Value::Path(x), Value::Path(y)) => {
            compare_elements(x, y)
        }
        (Value::Vertex(x), Value::Vertex(y)) | (Value::Edge(x), Value::Edge(y)) => {
            compare(&entity_id(x), &entity_id(y))
        }
        _ => compare_numbers(a, b),
    }
}

fn entity_id(pairs: &[(String, Value)]) -> Value {
    scan_pair(pairs, "id").cloned().unwrap_or(Value::Null)
}

fn compare_pairs(x: &[(String, Value)], y: &[(String, Value)]) -> Ordering {
    x.len().cmp(&y.len()).then_with(|| {
        for ((kx, vx), (ky, vy)) in sorted_pairs(x).into_iter().zip(sorted_pairs(y)) {
            let ord = key_cmp(kx.as_bytes(), ky.as_bytes()).then_with(|| compare(vx, vy));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    })
}

fn compare_elements(x: &[Value], y: &[Value]) -> Ordering {
    for (ex, ey) in x.iter().zip(y) {
        let ord = compare(ex, ey);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    x.len().cmp(&y.len())
}

/// A number reduced to a form where any two can be compared exactly.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Number {
    NegInfinity,
    Finite(BigDecimal),
    Infinity,
    NaN,
}

impl Number {
    pub(crate) fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(Number::Finite(BigDecimal::from(*i))),
            Value::Float(f) => Some(Number::from_f64(*f)),
            Value::Numeric(n) => Some(Number::Finite(n.clone())),
            _ => None,
        }
    }

    fn from_f64(f: f64) -> Self {
        if f.is_nan() {
            Number::NaN
        } else if f == f64::INFINITY {
            Number::Infinity
        } else if f == f64::NEG_INFINITY {
            Number::NegInfinity
        } else {
            Number::Finite(exact_decimal(f))
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Number::NegInfinity => 0,
            Number::Finite(_) => 1,
            Number::Infinity => 2,
            Number::NaN => 3,
        }
    }
}

/// The exact decimal value of a finite float.
pub(crate) fn exact_decimal(f: f64) -> BigDecimal {
    if f == 0.0 {
        return BigDecimal::from(0);
    }
    let bits = f.to_bits();
    let negative = bits >> 63 != 0;
    let exponent = ((bits >> 52) & 0x7FF) as i64;
    let fraction = bits & ((1 << 52) - 1);
    // value = mantissa * 2^power
    let (mantissa, power) = if exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1 << 52), exponent - 1075)
    };
    let mut digits = BigInt::from(mantissa);
    if negative {
        digits = -digits;
    }
    if power >= 0 {
        BigDecimal::new(digits << power as usize, 0)
    } else {
        // m * 2^-k == m * 5^k / 10^k
        let k = (-power) as u32;
        BigDecimal::new(digits * BigInt::from(5).pow(k), i64::from(k))
    }
}

fn compare_numbers(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => return x.cmp(y),
        (Value::Float(x), Value::Float(y)) if !x.is_nan() && !y.is_nan() => {
            return x.partial_cmp(y).unwrap_or(Ordering::Equal);
        }
        _ => {}
    }
    match (Number::of(a), Number::of(b)) {
        (Some(Number::Finite(x)), Some(Number::Finite(y))) => x.cmp(&y),
        (Some(x), Some(y)) => x.rank().cmp(&y.rank()),
        _ => Ordering::Equal,
    }
}
