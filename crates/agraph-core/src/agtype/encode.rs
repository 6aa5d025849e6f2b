//! Value to bytes.

use agraph_common::utils::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};

use super::container::Agtype;
use super::format::{
    ArrayKind, ContainerKind, ENTRY_CONTAINER, ENTRY_EXTENDED, ENTRY_FALSE, ENTRY_HAS_OFF,
    ENTRY_NULL, ENTRY_NUMERIC, ENTRY_STRING, ENTRY_TRUE, EXT_FLOAT, EXT_INTEGER, EXT_TIMESTAMP,
    MAX_DEPTH, MAX_OFFLEN, OFFSET_STRIDE, ObjectKind, depth_message,
};
use super::graph::{check_edge_pairs, check_path_shape, check_vertex_pairs};
use super::value::{Value, sorted_pairs};

/// Encodes a value into its binary form.
///
/// Scalars are wrapped in a one-element raw-scalar array. Object pairs are
/// written in canonical key order regardless of their order in `value`.
/// A [`Value::Binary`] anywhere in the tree is copied byte-for-byte.
///
/// # Errors
///
/// - `Error::Capacity` if a string, container, or payload offset exceeds
///   the header fields, or containers nest more than [`MAX_DEPTH`] levels
/// - `Error::InvalidValue` for duplicate keys or a malformed vertex, edge,
///   or path
pub fn encode(value: &Value) -> Result<Agtype> {
    if let Value::Binary(a) = value {
        return Ok(a.clone());
    }
    if value.nests_deeper_than(MAX_DEPTH) {
        return Err(Error::Capacity(depth_message()));
    }
    let mut buf = Vec::new();
    if value.is_scalar() {
        write_container(
            ContainerKind::Array(ArrayKind::RawScalar),
            1,
            &[Child::Value(value)],
            &mut buf,
        )?;
    } else {
        write_nested(value, &mut buf)?;
    }
    Agtype::from_bytes(buf)
}

enum Child<'a> {
    Key(&'a str),
    Value(&'a Value),
}

fn write_nested(value: &Value, buf: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Array(elems) => write_elements(ArrayKind::List, elems, buf),
        Value::Path(elems) => {
            check_path_shape(elems)?;
            write_elements(ArrayKind::Path, elems, buf)
        }
        Value::Object(pairs) => write_pairs(ObjectKind::Plain, pairs, buf),
        Value::Vertex(pairs) => {
            check_vertex_pairs(pairs)?;
            write_pairs(ObjectKind::Vertex, pairs, buf)
        }
        Value::Edge(pairs) => {
            check_edge_pairs(pairs)?;
            write_pairs(ObjectKind::Edge, pairs, buf)
        }
        other => Err(Error::Type(format!(
            "cannot encode {} as a container",
            other.type_name()
        ))),
    }
}

fn write_elements(kind: ArrayKind, elems: &[Value], buf: &mut Vec<u8>) -> Result<()> {
    let children: Vec<Child<'_>> = elems.iter().map(Child::Value).collect();
    write_container(ContainerKind::Array(kind), elems.len(), &children, buf)
}

fn write_pairs(kind: ObjectKind, pairs: &[(String, Value)], buf: &mut Vec<u8>) -> Result<()> {
    let sorted = sorted_pairs(pairs);
    if let Some(dup) = sorted.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(Error::InvalidValue(format!(
            "duplicate key \"{}\" in object",
            dup[0].0
        )));
    }
    let children: Vec<Child<'_>> = sorted
        .iter()
        .map(|(k, _)| Child::Key(k))
        .chain(sorted.iter().map(|(_, v)| Child::Value(v)))
        .collect();
    write_container(ContainerKind::Object(kind), pairs.len(), &children, buf)
}

fn write_container(
    kind: ContainerKind,
    count: usize,
    children: &[Child<'_>],
    buf: &mut Vec<u8>,
) -> Result<()> {
    buf.extend_from_slice(&kind.header(count)?.to_le_bytes());
    let table = buf.len();
    buf.resize(table + children.len() * 4, 0);
    let data_start = buf.len();

    for (i, child) in children.iter().enumerate() {
        let start = buf.len();
        let ty = match child {
            Child::Key(key) => write_string(key, buf)?,
            Child::Value(value) => write_child(value, buf)?,
        };
        let end = buf.len() - data_start;
        if end > MAX_OFFLEN {
            return Err(Error::Capacity(format!(
                "container data of {end} bytes exceeds the maximum of {MAX_OFFLEN}"
            )));
        }
        let entry = if i % OFFSET_STRIDE == 0 {
            ty | ENTRY_HAS_OFF | end as u32
        } else {
            ty | (buf.len() - start) as u32
        };
        LittleEndian::write_u32(&mut buf[table + i * 4..table + i * 4 + 4], entry);
    }
    Ok(())
}

fn write_child(value: &Value, buf: &mut Vec<u8>) -> Result<u32> {
    match value {
        Value::Binary(a) => match a.scalar()? {
            Some(inner) => write_scalar(&inner, buf),
            None => {
                buf.extend_from_slice(a.as_bytes());
                Ok(ENTRY_CONTAINER)
            }
        },
        v if v.is_scalar() => write_scalar(v, buf),
        v => {
            write_nested(v, buf)?;
            Ok(ENTRY_CONTAINER)
        }
    }
}

fn write_string(s: &str, buf: &mut Vec<u8>) -> Result<u32> {
    if s.len() > MAX_OFFLEN {
        return Err(Error::Capacity(
            "string too long to represent as agtype string".to_string(),
        ));
    }
    buf.extend_from_slice(s.as_bytes());
    Ok(ENTRY_STRING)
}

fn write_extended(ext: u32, payload: [u8; 8], buf: &mut Vec<u8>) -> u32 {
    buf.extend_from_slice(&ext.to_le_bytes());
    buf.extend_from_slice(&payload);
    ENTRY_EXTENDED
}

fn write_scalar(value: &Value, buf: &mut Vec<u8>) -> Result<u32> {
    Ok(match value {
        Value::Null => ENTRY_NULL,
        Value::Bool(true) => ENTRY_TRUE,
        Value::Bool(false) => ENTRY_FALSE,
        Value::Integer(i) => write_extended(EXT_INTEGER, i.to_le_bytes(), buf),
        Value::Float(f) => write_extended(EXT_FLOAT, f.to_le_bytes(), buf),
        Value::Timestamp(t) => write_extended(EXT_TIMESTAMP, t.to_le_bytes(), buf),
        Value::String(s) => write_string(s, buf)?,
        Value::Numeric(n) => {
            let (digits, scale) = n.as_bigint_and_exponent();
            let bytes = digits.to_signed_bytes_le();
            if bytes.len() + 8 > MAX_OFFLEN {
                return Err(Error::Capacity(
                    "numeric too long to represent as agtype numeric".to_string(),
                ));
            }
            buf.extend_from_slice(&scale.to_le_bytes());
            buf.extend_from_slice(&bytes);
            ENTRY_NUMERIC
        }
        other => {
            return Err(Error::Type(format!(
                "{} is not a scalar",
                other.type_name()
            )));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agtype::format::{HEADER_ARRAY, HEADER_SCALAR};
    use std::str::FromStr;

    #[test]
    fn test_raw_scalar_layout() {
        let a = encode(&Value::Integer(5)).unwrap();
        let bytes = a.as_bytes();
        assert_eq!(
            LittleEndian::read_u32(&bytes[0..4]),
            HEADER_ARRAY | HEADER_SCALAR | 1
        );
        assert_eq!(
            LittleEndian::read_u32(&bytes[4..8]),
            ENTRY_HAS_OFF | ENTRY_EXTENDED | 12
        );
        assert_eq!(LittleEndian::read_u32(&bytes[8..12]), EXT_INTEGER);
        assert_eq!(LittleEndian::read_i64(&bytes[12..20]), 5);
        assert_eq!(bytes.len(), 20);
    }

    #[test]
    fn test_offset_stride() {
        let elems: Vec<Value> = (0..40).map(|_| Value::from("ab")).collect();
        let a = encode(&Value::array(elems)).unwrap();
        let entry = |i: usize| LittleEndian::read_u32(&a.as_bytes()[4 + i * 4..8 + i * 4]);
        assert_eq!(entry(0), ENTRY_HAS_OFF | 2);
        assert_eq!(entry(1), 2);
        assert_eq!(entry(31), 2);
        assert_eq!(entry(32), ENTRY_HAS_OFF | 66);
        assert_eq!(entry(33), 2);
    }

    #[test]
    fn test_unsorted_pairs_are_sorted() {
        let v = Value::Object(vec![
            ("zz".to_string(), Value::from(1)),
            ("a".to_string(), Value::from(2)),
        ]);
        let a = encode(&v).unwrap();
        let keys: Vec<_> = a.keys().collect::<Result<_>>().unwrap();
        assert_eq!(keys, ["a", "zz"]);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let v = Value::Object(vec![
            ("a".to_string(), Value::from(1)),
            ("a".to_string(), Value::from(2)),
        ]);
        assert!(matches!(encode(&v), Err(Error::InvalidValue(_))));
    }

    #[test]
    fn test_binary_splice() {
        let inner = encode(&Value::array([Value::from(1), Value::from(2)])).unwrap();
        let outer = Value::object([("xs", Value::Binary(inner.clone()))]).unwrap();
        let a = encode(&outer).unwrap();
        assert_eq!(a.find_key("xs").unwrap(), Some(Value::Binary(inner)));
    }

    #[test]
    fn test_binary_scalar_is_inlined() {
        let scalar = encode(&Value::from("s")).unwrap();
        let a = encode(&Value::array([Value::Binary(scalar)])).unwrap();
        assert_eq!(a.get_index(0).unwrap(), Some(Value::from("s")));
    }

    #[test]
    fn test_numeric_payload() {
        let n = bigdecimal::BigDecimal::from_str("-12345678901234567890.125").unwrap();
        let a = encode(&Value::Numeric(n.clone())).unwrap();
        assert_eq!(a.scalar().unwrap(), Some(Value::Numeric(n)));
    }

    #[test]
    fn test_invalid_vertex_rejected() {
        let v = Value::Vertex(vec![("id".to_string(), Value::from(1))]);
        assert!(encode(&v).is_err());
    }

    #[test]
    fn test_nesting_depth_limit() {
        let nested = |depth: usize| (0..depth).fold(Value::Null, |inner, _| Value::array([inner]));
        assert!(encode(&nested(MAX_DEPTH)).is_ok());
        assert!(matches!(encode(&nested(MAX_DEPTH + 1)), Err(Error::Capacity(_))));

        let object = Value::object([("k", nested(MAX_DEPTH))]).unwrap();
        assert!(matches!(encode(&object), Err(Error::Capacity(_))));
    }
}
