//! Vertex, edge, and path values.
//!
//! Vertices and edges are objects with a fixed key set:
//!
//! | kind   | keys |
//! |--------|------|
//! | vertex | `id` (integer), `label` (string), `properties` (object) |
//! | edge   | `id`, `start_id`, `end_id` (integers), `label` (string), `properties` (object) |
//!
//! A path alternates vertex, edge, vertex and always has odd length. The
//! codec only checks that alternation; [`make_path`] additionally checks
//! that each edge connects its neighbours.

use std::borrow::Cow;

use agraph_common::GraphId;
use agraph_common::utils::error::{Error, Result};

use super::container::Agtype;
use super::value::{Value, canonicalize_pairs, scan_pair};

const VERTEX_KEYS: usize = 3;
const EDGE_KEYS: usize = 5;

fn is_integer(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Integer(_)))
}

fn is_object_like(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Object(_)) => true,
        Some(Value::Binary(a)) => a.is_plain_object(),
        _ => false,
    }
}

/// Checks the key set and types of a vertex.
pub(crate) fn check_vertex_pairs(pairs: &[(String, Value)]) -> Result<()> {
    let ok = pairs.len() == VERTEX_KEYS
        && is_integer(scan_pair(pairs, "id"))
        && matches!(scan_pair(pairs, "label"), Some(Value::String(_)))
        && is_object_like(scan_pair(pairs, "properties"));
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidValue("object is not a vertex".to_string()))
    }
}

/// Checks the key set and types of an edge.
pub(crate) fn check_edge_pairs(pairs: &[(String, Value)]) -> Result<()> {
    let ok = pairs.len() == EDGE_KEYS
        && is_integer(scan_pair(pairs, "id"))
        && is_integer(scan_pair(pairs, "start_id"))
        && is_integer(scan_pair(pairs, "end_id"))
        && matches!(scan_pair(pairs, "label"), Some(Value::String(_)))
        && is_object_like(scan_pair(pairs, "properties"));
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidValue("object is not an edge".to_string()))
    }
}

fn element_is_vertex(value: &Value) -> bool {
    match value {
        Value::Vertex(_) => true,
        Value::Binary(a) => a.is_vertex(),
        _ => false,
    }
}

fn element_is_edge(value: &Value) -> bool {
    match value {
        Value::Edge(_) => true,
        Value::Binary(a) => a.is_edge(),
        _ => false,
    }
}

/// Checks path length and vertex/edge alternation.
pub(crate) fn check_path_shape(elems: &[Value]) -> Result<()> {
    if elems.is_empty() {
        return Err(Error::InvalidValue(
            "paths require at least 1 vertex".to_string(),
        ));
    }
    if elems.len() % 2 == 0 {
        return Err(Error::InvalidValue(
            "a path is of the form: [vertex, (edge, vertex)*i] where i >= 0".to_string(),
        ));
    }
    for (i, elem) in elems.iter().enumerate() {
        if i % 2 == 0 && !element_is_vertex(elem) {
            return Err(Error::Type(format!("argument {} must be a vertex", i + 1)));
        }
        if i % 2 == 1 && !element_is_edge(elem) {
            return Err(Error::Type(format!("argument {} must be an edge", i + 1)));
        }
    }
    Ok(())
}

/// Wraps checked pairs as a vertex.
pub(crate) fn vertex_from_pairs(pairs: Vec<(String, Value)>) -> Result<Value> {
    check_vertex_pairs(&pairs)?;
    Ok(Value::Vertex(pairs))
}

/// Wraps checked pairs as an edge.
pub(crate) fn edge_from_pairs(pairs: Vec<(String, Value)>) -> Result<Value> {
    check_edge_pairs(&pairs)?;
    Ok(Value::Edge(pairs))
}

fn properties_or_empty(properties: Value) -> Result<Value> {
    match properties {
        Value::Null => Ok(Value::empty_object()),
        p if is_object_like(Some(&p)) => Ok(p),
        other => Err(Error::Type(format!(
            "properties must be an object, got {}",
            other.type_name()
        ))),
    }
}

/// Builds a vertex. A null `properties` becomes an empty object.
///
/// # Errors
///
/// Returns `Error::Type` if `properties` is neither null nor an object.
pub fn build_vertex(id: GraphId, label: &str, properties: Value) -> Result<Value> {
    let pairs = canonicalize_pairs(vec![
        ("id".to_string(), Value::Integer(id.as_i64())),
        ("label".to_string(), Value::String(label.to_string())),
        ("properties".to_string(), properties_or_empty(properties)?),
    ])?;
    Ok(Value::Vertex(pairs))
}

/// Builds an edge. A null `properties` becomes an empty object.
///
/// # Errors
///
/// Returns `Error::Type` if `properties` is neither null nor an object.
pub fn build_edge(
    id: GraphId,
    start_id: GraphId,
    end_id: GraphId,
    label: &str,
    properties: Value,
) -> Result<Value> {
    let pairs = canonicalize_pairs(vec![
        ("id".to_string(), Value::Integer(id.as_i64())),
        ("start_id".to_string(), Value::Integer(start_id.as_i64())),
        ("end_id".to_string(), Value::Integer(end_id.as_i64())),
        ("label".to_string(), Value::String(label.to_string())),
        ("properties".to_string(), properties_or_empty(properties)?),
    ])?;
    Ok(Value::Edge(pairs))
}

/// Decodes a [`Value::Binary`]; borrows anything else.
fn resolve(value: &Value) -> Result<Cow<'_, Value>> {
    match value {
        Value::Binary(a) => a.decode().map(Cow::Owned),
        other => Ok(Cow::Borrowed(other)),
    }
}

fn entity_key(value: &Value, key: &str) -> Option<i64> {
    value
        .pairs()
        .and_then(|pairs| scan_pair(pairs, key))
        .and_then(Value::as_i64)
}

/// Builds a path from alternating vertices and edges.
///
/// Each edge must connect the vertices on either side of it, in either
/// direction.
///
/// # Errors
///
/// - `Error::InvalidValue` for an empty or even-length sequence, or an edge
///   that does not connect its neighbours
/// - `Error::Type` when a vertex or edge is out of place
pub fn make_path(elements: &[Value]) -> Result<Value> {
    check_path_shape(elements)?;
    let resolved: Vec<Value> = elements
        .iter()
        .map(|e| resolve(e).map(Cow::into_owned))
        .collect::<Result<_>>()?;

    for i in (1..resolved.len()).step_by(2) {
        let prev = entity_key(&resolved[i - 1], "id");
        let next = entity_key(&resolved[i + 1], "id");
        let start = entity_key(&resolved[i], "start_id");
        let end = entity_key(&resolved[i], "end_id");
        let forward = start == prev && end == next;
        let backward = start == next && end == prev;
        if !(forward || backward) {
            return Err(Error::InvalidValue(format!(
                "edge at argument {} does not connect the vertices at arguments {} and {}",
                i + 1,
                i,
                i + 2
            )));
        }
    }
    Ok(Value::Path(resolved))
}

fn entity_field(value: &Value, key: &str, allow_vertex: bool, func: &str) -> Result<Value> {
    let value = resolve(value)?;
    match value.as_ref() {
        Value::Null => Ok(Value::Null),
        Value::Vertex(pairs) if allow_vertex => {
            Ok(scan_pair(pairs, key).cloned().unwrap_or(Value::Null))
        }
        Value::Edge(pairs) => Ok(scan_pair(pairs, key).cloned().unwrap_or(Value::Null)),
        other => Err(Error::Type(format!(
            "{func}() argument must be {}, got {}",
            if allow_vertex { "a vertex or an edge" } else { "an edge" },
            other.type_name()
        ))),
    }
}

/// Returns the `id` of a vertex or edge; null stays null.
///
/// # Errors
///
/// Returns `Error::Type` for any other variant.
pub fn id(value: &Value) -> Result<Value> {
    entity_field(value, "id", true, "id")
}

/// Returns the `label` of a vertex or edge; null stays null.
///
/// # Errors
///
/// Returns `Error::Type` for any other variant.
pub fn label(value: &Value) -> Result<Value> {
    entity_field(value, "label", true, "label")
}

/// Returns the `start_id` of an edge; null stays null.
///
/// # Errors
///
/// Returns `Error::Type` for any other variant.
pub fn start_id(value: &Value) -> Result<Value> {
    entity_field(value, "start_id", false, "start_id")
}

/// Returns the `end_id` of an edge; null stays null.
///
/// # Errors
///
/// Returns `Error::Type` for any other variant.
pub fn end_id(value: &Value) -> Result<Value> {
    entity_field(value, "end_id", false, "end_id")
}

/// Returns the `properties` of a vertex or edge. A plain object is its own
/// property map; null stays null.
///
/// # Errors
///
/// Returns `Error::Type` for any other variant.
pub fn properties(value: &Value) -> Result<Value> {
    let resolved = resolve(value)?;
    if matches!(resolved.as_ref(), Value::Object(_)) {
        return Ok(resolved.into_owned());
    }
    let props = entity_field(&resolved, "properties", true, "properties")?;
    // properties may have been spliced in without decoding
    match props {
        Value::Binary(a) => a.decode(),
        other => Ok(other),
    }
}

fn path_elements(value: &Value, func: &str) -> Result<Option<Vec<Value>>> {
    match resolve(value)?.into_owned() {
        Value::Null => Ok(None),
        Value::Path(elems) => Ok(Some(elems)),
        other => Err(Error::Type(format!(
            "{func}() argument must be a path, got {}",
            other.type_name()
        ))),
    }
}

/// Number of edges in a path; null stays null.
///
/// # Errors
///
/// Returns `Error::Type` for any other variant.
pub fn path_length(value: &Value) -> Result<Value> {
    Ok(path_elements(value, "length")?
        .map_or(Value::Null, |elems| Value::Integer((elems.len() / 2) as i64)))
}

/// The vertices of a path as an array; null stays null.
///
/// # Errors
///
/// Returns `Error::Type` for any other variant.
pub fn path_nodes(value: &Value) -> Result<Value> {
    Ok(path_elements(value, "nodes")?.map_or(Value::Null, |elems| {
        Value::Array(elems.into_iter().step_by(2).collect())
    }))
}

/// The edges of a path as an array; null stays null.
///
/// # Errors
///
/// Returns `Error::Type` for any other variant.
pub fn path_edges(value: &Value) -> Result<Value> {
    Ok(path_elements(value, "relationships")?.map_or(Value::Null, |elems| {
        Value::Array(elems.into_iter().skip(1).step_by(2).collect())
    }))
}

/// Reads the id of an encoded vertex or edge without decoding it.
///
/// Returns `None` for any other container.
///
/// # Errors
///
/// Returns a corruption error if the id entry is malformed.
pub fn entity_id(agtype: &Agtype) -> Result<Option<GraphId>> {
    if !(agtype.is_vertex() || agtype.is_edge()) {
        return Ok(None);
    }
    match agtype.find_key("id")? {
        Some(Value::Integer(id)) => Ok(Some(GraphId::new(id))),
        _ => Err(Error::Corruption(
            "graph entity without an integer id".to_string(),
        )),
    }
}
