//! Hashing consistent with [`compare`](super::compare).
//!
//! The hash folds a token stream into a running value. Container
//! boundaries rotate a separate seed (left 4 entering an array, left 6
//! entering an object, and back again on leaving) and mix it in, so
//! `[[1], 2]` and `[1, [2]]` hash differently even though their scalars
//! appear in the same order. Raw-scalar wrappers are transparent: an
//! encoded root scalar hashes like the bare scalar.
//!
//! Scalars hash by their position in the total order, so every pair of
//! values that compares equal hashes equal: numbers hash by exact value
//! regardless of representation and vertices and edges hash by id.
//! Objects hash their pairs in canonical key order.

use agraph_common::utils::error::{Error, Result};
use num_traits::ToPrimitive;

use super::container::Agtype;
use super::format::{ArrayKind, MAX_DEPTH, depth_message};
use super::graph::entity_id;
use super::iter::Token;
use super::ordering::Number;
use super::value::{Value, scan_pair, sorted_pairs};

const INITIAL_SEED: u64 = 0xF0F0_F0F0_F0F0_F0F0;

const ARRAY_ROTATION: u32 = 4;
const OBJECT_ROTATION: u32 = 6;

/// Canonical representation of a scalar for hashing.
#[derive(Hash)]
enum ScalarKey<'a> {
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(Vec<u8>, i64),
    NaN,
    Infinity(bool),
    Timestamp(i64),
    String(&'a str),
    Key(&'a str),
    Vertex(i64),
    Edge(i64),
}

struct StreamHasher {
    hash: u64,
    seed: u64,
    depth: usize,
}

impl StreamHasher {
    fn new() -> Self {
        Self {
            hash: 0,
            seed: INITIAL_SEED,
            depth: 0,
        }
    }

    fn fold(&mut self, key: &ScalarKey<'_>) {
        let state = ahash::RandomState::with_seeds(
            self.seed,
            0x243F_6A88_85A3_08D3,
            0x1319_8A2E_0370_7344,
            0xA409_3822_299F_31D0,
        );
        let h = state.hash_one(key);
        self.hash = self.hash.rotate_left(1) ^ h;
    }

    fn begin(&mut self, rotation: u32) -> Result<()> {
        if self.depth == MAX_DEPTH {
            return Err(Error::Capacity(depth_message()));
        }
        self.depth += 1;
        self.seed = self.seed.rotate_left(rotation);
        self.hash ^= self.seed;
        Ok(())
    }

    fn end(&mut self, rotation: u32) {
        self.depth -= 1;
        self.seed = self.seed.rotate_right(rotation);
        self.hash ^= self.seed;
    }

    fn number(&mut self, value: &Value) {
        let key = match value {
            Value::Integer(i) => ScalarKey::Integer(*i),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < 9.2e18 => {
                ScalarKey::Integer(*f as i64)
            }
            other => match Number::of(other) {
                Some(Number::Finite(d)) => {
                    let d = d.normalized();
                    match d.to_i64() {
                        Some(i) if d.is_integer() => ScalarKey::Integer(i),
                        _ => {
                            let (digits, scale) = d.as_bigint_and_exponent();
                            ScalarKey::Decimal(digits.to_signed_bytes_le(), scale)
                        }
                    }
                }
                Some(Number::NaN) => ScalarKey::NaN,
                Some(Number::Infinity) => ScalarKey::Infinity(true),
                Some(Number::NegInfinity) => ScalarKey::Infinity(false),
                None => ScalarKey::Null,
            },
        };
        self.fold(&key);
    }

    fn scalar(&mut self, value: &Value) {
        match value {
            Value::Null => self.fold(&ScalarKey::Null),
            Value::Bool(b) => self.fold(&ScalarKey::Bool(*b)),
            Value::Timestamp(t) => self.fold(&ScalarKey::Timestamp(*t)),
            Value::String(s) => self.fold(&ScalarKey::String(s)),
            v => self.number(v),
        }
    }

    fn value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Array(elems) | Value::Path(elems) => {
                self.begin(ARRAY_ROTATION)?;
                for elem in elems {
                    self.value(elem)?;
                }
                self.end(ARRAY_ROTATION);
            }
            Value::Object(pairs) => {
                self.begin(OBJECT_ROTATION)?;
                for (key, value) in sorted_pairs(pairs) {
                    self.fold(&ScalarKey::Key(key));
                    self.value(value)?;
                }
                self.end(OBJECT_ROTATION);
            }
            Value::Vertex(pairs) => {
                let id = scan_pair(pairs, "id").and_then(Value::as_i64).unwrap_or(0);
                self.fold(&ScalarKey::Vertex(id));
            }
            Value::Edge(pairs) => {
                let id = scan_pair(pairs, "id").and_then(Value::as_i64).unwrap_or(0);
                self.fold(&ScalarKey::Edge(id));
            }
            Value::Binary(a) => self.encoded(a)?,
            scalar => self.scalar(scalar),
        }
        Ok(())
    }

    /// Walks one container level with nested containers skipped, recursing
    /// into each skipped container on its own.
    ///
    /// Vertex and edge containers hash by id and are never walked.
    fn encoded(&mut self, agtype: &Agtype) -> Result<()> {
        if let Some(id) = entity_id(agtype)? {
            let key = if agtype.is_vertex() {
                ScalarKey::Vertex(id.as_i64())
            } else {
                ScalarKey::Edge(id.as_i64())
            };
            self.fold(&key);
            return Ok(());
        }
        for token in agtype.iter().skip_nested() {
            match token? {
                Token::BeginArray {
                    kind: ArrayKind::RawScalar,
                    ..
                }
                | Token::EndArray
                    if agtype.is_scalar() => {}
                Token::BeginArray { .. } => self.begin(ARRAY_ROTATION)?,
                Token::EndArray => self.end(ARRAY_ROTATION),
                Token::BeginObject { .. } => self.begin(OBJECT_ROTATION)?,
                Token::EndObject => self.end(OBJECT_ROTATION),
                Token::Key(key) => self.fold(&ScalarKey::Key(&key)),
                Token::Value(v) | Token::Elem(v) => self.value(&v)?,
            }
        }
        Ok(())
    }
}

/// Hashes a value consistently with [`compare`](super::compare).
///
/// # Errors
///
/// Returns a corruption error if a [`Value::Binary`] part is malformed, and
/// `Error::Capacity` if containers nest more than [`MAX_DEPTH`] levels deep.
pub fn hash_value(value: &Value) -> Result<u64> {
    let mut hasher = StreamHasher::new();
    hasher.value(value)?;
    Ok(hasher.hash)
}

/// Hashes an encoded value without decoding it.
///
/// Equal to [`hash_value`] of the decoded value.
///
/// # Errors
///
/// Returns a corruption error if the buffer is malformed, and
/// `Error::Capacity` if containers nest more than [`MAX_DEPTH`] levels deep.
pub fn hash_encoded(agtype: &Agtype) -> Result<u64> {
    let mut hasher = StreamHasher::new();
    hasher.encoded(agtype)?;
    Ok(hasher.hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agtype::decode::nested_array_bytes;
    use crate::agtype::graph::build_vertex;
    use crate::agtype::{compare, encode};
    use agraph_common::GraphId;
    use bigdecimal::BigDecimal;
    use std::cmp::Ordering;
    use std::str::FromStr;

    fn h(v: &Value) -> u64 {
        hash_value(v).unwrap()
    }

    #[test]
    fn test_equal_numbers_hash_equal() {
        let one = [
            Value::from(1),
            Value::from(1.0),
            Value::Numeric(BigDecimal::from_str("1.000").unwrap()),
        ];
        for v in &one {
            assert_eq!(h(v), h(&one[0]));
        }
        let half = Value::from(0.5);
        let half_numeric = Value::Numeric(BigDecimal::from_str("0.50").unwrap());
        assert_eq!(compare(&half, &half_numeric), Ordering::Equal);
        assert_eq!(h(&half), h(&half_numeric));
        assert_eq!(h(&Value::from(-0.0)), h(&Value::from(0)));
    }

    #[test]
    fn test_nesting_changes_hash() {
        let a = Value::array([Value::array([Value::from(1)]), Value::from(2)]);
        let b = Value::array([Value::from(1), Value::array([Value::from(2)])]);
        assert_ne!(h(&a), h(&b));
        let obj = Value::object([("a", Value::from(1))]).unwrap();
        let arr = Value::array([Value::from("a"), Value::from(1)]);
        assert_ne!(h(&obj), h(&arr));
    }

    #[test]
    fn test_encoded_matches_value() {
        let v = Value::object([
            ("list", Value::array([Value::from(1.5), Value::Null])),
            ("v", build_vertex(GraphId::new(3), "V", Value::Null).unwrap()),
            ("s", Value::from("x")),
        ])
        .unwrap();
        let a = encode(&v).unwrap();
        assert_eq!(hash_encoded(&a).unwrap(), h(&v));
        assert_eq!(h(&Value::Binary(a)), h(&v));

        let scalar = Value::from("root");
        assert_eq!(hash_encoded(&encode(&scalar).unwrap()).unwrap(), h(&scalar));
    }

    #[test]
    fn test_vertex_hash_uses_id() {
        let v1 = build_vertex(GraphId::new(1), "A", Value::Null).unwrap();
        let v1b = build_vertex(
            GraphId::new(1),
            "B",
            Value::object([("k", Value::from(1))]).unwrap(),
        )
        .unwrap();
        assert_eq!(h(&v1), h(&v1b));
        assert_eq!(hash_encoded(&encode(&v1).unwrap()).unwrap(), h(&v1));
    }

    #[test]
    fn test_encoded_nested_objects_match_value() {
        let inner = Value::object([("a", Value::from(1))]).unwrap();
        let v = Value::array([
            inner.clone(),
            Value::object([("b", Value::array([inner]))]).unwrap(),
            Value::from(2),
        ]);
        assert_eq!(hash_encoded(&encode(&v).unwrap()).unwrap(), h(&v));
    }

    #[test]
    fn test_unsorted_pairs_hash_canonically() {
        let canonical = Value::object([("a", Value::from(1)), ("bb", Value::from(2))]).unwrap();
        let unsorted = Value::Object(vec![
            ("bb".to_string(), Value::from(2)),
            ("a".to_string(), Value::from(1)),
        ]);
        assert_eq!(h(&unsorted), h(&canonical));
        assert_eq!(hash_encoded(&encode(&unsorted).unwrap()).unwrap(), h(&unsorted));
    }

    #[test]
    fn test_nesting_depth_limit() {
        let nested = |depth: usize| (0..depth).fold(Value::Null, |inner, _| Value::array([inner]));
        assert!(hash_value(&nested(MAX_DEPTH)).is_ok());
        assert!(matches!(hash_value(&nested(MAX_DEPTH + 1)), Err(Error::Capacity(_))));

        let deep = Agtype::from_bytes(nested_array_bytes(10_000)).unwrap();
        assert!(matches!(hash_encoded(&deep), Err(Error::Capacity(_))));
    }
}
