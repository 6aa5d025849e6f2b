//! Bytes to value.

use agraph_common::utils::error::{Error, Result};

use super::builder::ValueBuilder;
use super::container::Agtype;
use super::value::Value;

/// Fully decodes an encoded value by driving its token stream to the end.
///
/// A raw-scalar root decodes to the bare scalar.
///
/// # Errors
///
/// Returns `Error::Corruption` if the buffer is malformed, including when
/// a vertex, edge, or path container does not have its required shape,
/// or if containers nest more than
/// [`MAX_DEPTH`](super::format::MAX_DEPTH) levels deep.
pub fn decode(agtype: &Agtype) -> Result<Value> {
    let mut builder = ValueBuilder::new();
    for token in agtype.iter() {
        builder.push_token(token?).map_err(into_corruption)?;
    }
    builder.finish().map_err(into_corruption)
}

/// Shape and depth violations found while decoding mean the bytes are bad.
fn into_corruption(e: Error) -> Error {
    match e {
        Error::InvalidValue(msg) | Error::Type(msg) | Error::Capacity(msg) => {
            Error::Corruption(msg)
        }
        other => other,
    }
}

/// An array nested `depth` levels deep around an empty array.
#[cfg(test)]
pub(crate) fn nested_array_bytes(depth: usize) -> Vec<u8> {
    use super::format::{ENTRY_CONTAINER, ENTRY_HAS_OFF, HEADER_ARRAY};

    let mut buf = Vec::with_capacity(depth * 8);
    for level in 1..depth {
        let child_len = 4 + 8 * (depth - level - 1);
        buf.extend_from_slice(&(HEADER_ARRAY | 1).to_le_bytes());
        buf.extend_from_slice(&(ENTRY_HAS_OFF | ENTRY_CONTAINER | child_len as u32).to_le_bytes());
    }
    buf.extend_from_slice(&HEADER_ARRAY.to_le_bytes());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agtype::encode;
    use crate::agtype::format::{
        ENTRY_HAS_OFF, ENTRY_NULL, HEADER_OBJECT, HEADER_VERTEX, MAX_DEPTH,
    };
    use crate::agtype::graph::build_vertex;
    use agraph_common::GraphId;

    #[test]
    fn test_decode_nested() {
        let v = Value::object([
            ("list", Value::array([Value::from(1.5), Value::Timestamp(86_400_000_000)])),
            ("nested", Value::object([("deep", Value::from(false))]).unwrap()),
        ])
        .unwrap();
        assert_eq!(decode(&encode(&v).unwrap()).unwrap(), v);
    }

    #[test]
    fn test_decode_vertex() {
        let props = Value::object([("name", Value::from("Ann"))]).unwrap();
        let v = build_vertex(GraphId::new(7), "Person", props).unwrap();
        let decoded = decode(&encode(&v).unwrap()).unwrap();
        assert_eq!(decoded, v);
        assert!(matches!(decoded, Value::Vertex(_)));
    }

    #[test]
    fn test_decode_bad_vertex_is_corruption() {
        // a vertex header on an object with a single null-valued key
        let mut buf = Vec::new();
        buf.extend_from_slice(&(HEADER_OBJECT | HEADER_VERTEX | 1).to_le_bytes());
        buf.extend_from_slice(&(ENTRY_HAS_OFF | 2).to_le_bytes());
        buf.extend_from_slice(&ENTRY_NULL.to_le_bytes());
        buf.extend_from_slice(b"id");
        let a = Agtype::from_bytes(buf).unwrap();
        assert!(matches!(decode(&a), Err(Error::Corruption(_))));
    }

    #[test]
    fn test_nesting_depth_limit() {
        let at_limit = Agtype::from_bytes(nested_array_bytes(MAX_DEPTH)).unwrap();
        let decoded = decode(&at_limit).unwrap();
        assert!(!decoded.nests_deeper_than(MAX_DEPTH));
        assert!(decoded.nests_deeper_than(MAX_DEPTH - 1));

        for depth in [MAX_DEPTH + 1, 100_000] {
            let deep = Agtype::from_bytes(nested_array_bytes(depth)).unwrap();
            assert!(matches!(decode(&deep), Err(Error::Corruption(_))));
        }
    }
}
