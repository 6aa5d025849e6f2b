//! The in-memory agtype value.

use std::fmt;

use agraph_common::utils::error::{Error, Result};
use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;

use super::container::Agtype;
use super::format::key_cmp;

/// A dynamically-typed graph value.
///
/// Objects, vertices, and edges keep their pairs sorted in canonical key
/// order (see [`key_cmp`]) with unique keys. The constructors on this type
/// and [`ValueBuilder`](super::ValueBuilder) establish that order. Building
/// the variants by hand with unsorted pairs is allowed: [`encode`],
/// [`compare`](super::compare), and [`hash_value`](super::hash_value) work
/// in canonical order regardless, but [`Value::get`] binary-searches and
/// can miss a key on unsorted pairs.
///
/// Parsing, decoding, and [`encode`] reject values nested more than
/// [`MAX_DEPTH`](super::format::MAX_DEPTH) containers deep. Deeper values
/// can only be built by hand, and recursive operations on them are bounded
/// only by the stack.
///
/// Equality here is structural. Use [`compare`](super::compare) for the
/// semantic total order in which `1`, `1.0`, and `1::numeric` are equal.
///
/// [`encode`]: super::encode
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Float(f64),
    /// Arbitrary-precision decimal.
    Numeric(BigDecimal),
    /// Microseconds since 2000-01-01 00:00:00.
    Timestamp(i64),
    /// UTF-8 string.
    String(String),
    /// Ordered list.
    Array(Vec<Value>),
    /// Key/value map in canonical key order.
    Object(Vec<(String, Value)>),
    /// Object with `id`, `label`, and `properties`.
    Vertex(Vec<(String, Value)>),
    /// Object with `id`, `label`, `start_id`, `end_id`, and `properties`.
    Edge(Vec<(String, Value)>),
    /// Alternating vertices and edges, odd length.
    Path(Vec<Value>),
    /// An already-encoded container spliced in without decoding.
    Binary(Agtype),
}

impl Value {
    /// Builds an object, sorting its keys canonically.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidValue` if a key appears twice.
    pub fn object<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Result<Self> {
        let pairs = pairs.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Ok(Value::Object(canonicalize_pairs(pairs)?))
    }

    /// Builds an empty object.
    #[must_use]
    pub fn empty_object() -> Self {
        Value::Object(Vec::new())
    }

    /// Builds an array.
    #[must_use]
    pub fn array(elems: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(elems.into_iter().collect())
    }

    /// Returns the name of this value's type as used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Numeric(_) => "numeric",
            Value::Timestamp(_) => "timestamp",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Vertex(_) => "vertex",
            Value::Edge(_) => "edge",
            Value::Path(_) => "path",
            Value::Binary(_) => "binary",
        }
    }

    /// Returns true for null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for the variants that encode without a container.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Null
                | Value::Bool(_)
                | Value::Integer(_)
                | Value::Float(_)
                | Value::Numeric(_)
                | Value::Timestamp(_)
                | Value::String(_)
        )
    }

    /// Returns true when containers nest more than `limit` levels deep.
    ///
    /// Descends at most `limit + 1` levels. [`Value::Binary`] parts count as
    /// scalars.
    pub(crate) fn nests_deeper_than(&self, limit: usize) -> bool {
        match self {
            Value::Array(elems) | Value::Path(elems) => {
                limit == 0 || elems.iter().any(|e| e.nests_deeper_than(limit - 1))
            }
            Value::Object(pairs) | Value::Vertex(pairs) | Value::Edge(pairs) => {
                limit == 0 || pairs.iter().any(|(_, v)| v.nests_deeper_than(limit - 1))
            }
            _ => false,
        }
    }

    /// Returns true for integers, floats, and numerics.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_) | Value::Numeric(_))
    }

    /// Returns the boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns any number as a float, possibly losing precision.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Numeric(n) => n.to_f64(),
            _ => None,
        }
    }

    /// Returns the string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements of an array or path.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(elems) | Value::Path(elems) => Some(elems),
            _ => None,
        }
    }

    /// Returns the pairs of a plain object.
    #[must_use]
    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Returns the pairs of an object, vertex, or edge.
    #[must_use]
    pub fn pairs(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(pairs) | Value::Vertex(pairs) | Value::Edge(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Looks up a key in an object, vertex, or edge by binary search.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.pairs().and_then(|pairs| find_pair(pairs, key))
    }

    /// Number of elements of a container, or `None` for scalars.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(elems) | Value::Path(elems) => Some(elems.len()),
            Value::Object(pairs) | Value::Vertex(pairs) | Value::Edge(pairs) => Some(pairs.len()),
            Value::Binary(a) => Some(a.count()),
            _ => None,
        }
    }

    /// Returns true for an empty container.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

/// Sorts pairs into canonical key order and rejects duplicate keys.
pub(crate) fn canonicalize_pairs(mut pairs: Vec<(String, Value)>) -> Result<Vec<(String, Value)>> {
    pairs.sort_by(|a, b| key_cmp(a.0.as_bytes(), b.0.as_bytes()));
    if let Some(dup) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(Error::InvalidValue(format!(
            "duplicate key \"{}\" in object",
            dup[0].0
        )));
    }
    Ok(pairs)
}

/// Borrowed pairs in canonical key order, whatever order they are stored in.
pub(crate) fn sorted_pairs(pairs: &[(String, Value)]) -> Vec<&(String, Value)> {
    let mut view: Vec<_> = pairs.iter().collect();
    view.sort_by(|a, b| key_cmp(a.0.as_bytes(), b.0.as_bytes()));
    view
}

/// Linear lookup for the handful of fixed fields on a vertex or edge.
pub(crate) fn scan_pair<'a>(pairs: &'a [(String, Value)], key: &str) -> Option<&'a Value> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// Binary search over pairs in canonical order.
fn find_pair<'a>(pairs: &'a [(String, Value)], key: &str) -> Option<&'a Value> {
    pairs
        .binary_search_by(|(k, _)| key_cmp(k.as_bytes(), key.as_bytes()))
        .ok()
        .map(|idx| &pairs[idx].1)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = super::text::to_text(self, false).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<BigDecimal> for Value {
    fn from(n: BigDecimal) -> Self {
        Value::Numeric(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elems: Vec<Value>) -> Self {
        Value::Array(elems)
    }
}

impl From<Agtype> for Value {
    fn from(a: Agtype) -> Self {
        Value::Binary(a)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_canonical_order() {
        let obj = Value::object([
            ("properties", Value::empty_object()),
            ("label", Value::from("Person")),
            ("id", Value::from(7)),
            ("b", Value::Null),
        ])
        .unwrap();
        let keys: Vec<_> = obj.pairs().unwrap().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["b", "id", "label", "properties"]);
        assert_eq!(obj.get("label"), Some(&Value::from("Person")));
        assert_eq!(obj.get("missing"), None);
    }

    #[test]
    fn test_object_duplicate_key() {
        let err = Value::object([("a", Value::from(1)), ("a", Value::from(2))]).unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from(3).as_i64(), Some(3));
        assert_eq!(Value::from(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert!(Value::Null.is_scalar());
        assert!(!Value::array([]).is_scalar());
        assert!(Value::array([]).is_empty());
        assert_eq!(Value::array([Value::Null]).len(), Some(1));
        assert_eq!(Value::from(1).len(), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Timestamp(0).type_name(), "timestamp");
        assert_eq!(Value::Path(vec![]).type_name(), "path");
        assert_eq!(Value::empty_object().type_name(), "object");
    }

    #[test]
    fn test_display_uses_text_form() {
        let obj = Value::object([("a", Value::from(1)), ("b", Value::from(1.0))]).unwrap();
        assert_eq!(obj.to_string(), r#"{"a": 1, "b": 1.0}"#);
    }
}
