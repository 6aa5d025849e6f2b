//! Binary layout of an encoded agtype container.
//!
//! ```text
//! container := header:u32 entries:[u32; n] data
//! ```
//!
//! All words are little-endian and nothing is padded. `n` is the element
//! count for arrays and twice the pair count for objects, whose entries list
//! every key first and then every value, both in canonical key order.
//!
//! An entry packs a has-offset bit, a 3-bit type and a 28-bit field. The
//! field is the child's byte length, except on every [`OFFSET_STRIDE`]th
//! entry where it is the child's end offset within `data`. Finding where
//! child `i` starts therefore sums at most `OFFSET_STRIDE` entries.

use agraph_common::utils::error::{Error, Result};
use std::cmp::Ordering;

/// Header bits holding the element or pair count.
pub const HEADER_COUNT_MASK: u32 = 0x03FF_FFFF;
/// Object is a vertex.
pub const HEADER_VERTEX: u32 = 0x0400_0000;
/// Object is an edge.
pub const HEADER_EDGE: u32 = 0x0800_0000;
/// Array stands in for a single root scalar.
pub const HEADER_SCALAR: u32 = 0x1000_0000;
/// Container is an object.
pub const HEADER_OBJECT: u32 = 0x2000_0000;
/// Container is an array.
pub const HEADER_ARRAY: u32 = 0x4000_0000;
/// Array is a path.
pub const HEADER_PATH: u32 = 0x8000_0000;

/// Entry field is an end offset rather than a length.
pub const ENTRY_HAS_OFF: u32 = 0x8000_0000;
/// Entry type bits.
pub const ENTRY_TYPE_MASK: u32 = 0x7000_0000;
/// Entry length-or-offset bits.
pub const ENTRY_OFFLEN_MASK: u32 = 0x0FFF_FFFF;

/// UTF-8 string payload.
pub const ENTRY_STRING: u32 = 0x0000_0000;
/// Arbitrary-precision decimal payload.
pub const ENTRY_NUMERIC: u32 = 0x1000_0000;
/// Boolean false, no payload.
pub const ENTRY_FALSE: u32 = 0x2000_0000;
/// Boolean true, no payload.
pub const ENTRY_TRUE: u32 = 0x3000_0000;
/// Null, no payload.
pub const ENTRY_NULL: u32 = 0x4000_0000;
/// Nested container.
pub const ENTRY_CONTAINER: u32 = 0x5000_0000;
/// Fixed-width scalar introduced by an extended header word.
pub const ENTRY_EXTENDED: u32 = 0x7000_0000;

/// An offset is stored on every entry whose index is a multiple of this.
pub const OFFSET_STRIDE: usize = 32;

/// Extended header: 64-bit signed integer.
pub const EXT_INTEGER: u32 = 0;
/// Extended header: IEEE 754 double.
pub const EXT_FLOAT: u32 = 1;
/// Extended header: microseconds since 2000-01-01 00:00:00.
pub const EXT_TIMESTAMP: u32 = 2;

/// Size of an extended scalar payload (header word plus 8 bytes).
pub const EXTENDED_SIZE: usize = 12;

/// Largest element or pair count a header can carry.
pub const MAX_COUNT: usize = HEADER_COUNT_MASK as usize;

/// Largest length or offset an entry can carry.
pub const MAX_OFFLEN: usize = ENTRY_OFFLEN_MASK as usize;

/// Deepest container nesting accepted anywhere; a root container is level 1.
pub const MAX_DEPTH: usize = 128;

pub(crate) fn depth_message() -> String {
    format!("nesting depth exceeds the maximum of {MAX_DEPTH}")
}

/// Flavour of an encoded object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Ordinary key/value map.
    Plain,
    /// Vertex with `id`, `label`, `properties`.
    Vertex,
    /// Edge with `id`, `label`, `start_id`, `end_id`, `properties`.
    Edge,
}

/// Flavour of an encoded array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    /// Ordinary list.
    List,
    /// One-element wrapper around a root scalar.
    RawScalar,
    /// Alternating vertex/edge sequence.
    Path,
}

/// Kind of container described by a header word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// An object.
    Object(ObjectKind),
    /// An array.
    Array(ArrayKind),
}

impl ContainerKind {
    /// Builds the header word for this kind and count.
    ///
    /// # Errors
    ///
    /// Returns a capacity error if `count` does not fit the header.
    pub fn header(self, count: usize) -> Result<u32> {
        if count > MAX_COUNT {
            return Err(Error::Capacity(format!(
                "container of {count} elements exceeds the maximum of {MAX_COUNT}"
            )));
        }
        let flags = match self {
            ContainerKind::Object(ObjectKind::Plain) => HEADER_OBJECT,
            ContainerKind::Object(ObjectKind::Vertex) => HEADER_OBJECT | HEADER_VERTEX,
            ContainerKind::Object(ObjectKind::Edge) => HEADER_OBJECT | HEADER_EDGE,
            ContainerKind::Array(ArrayKind::List) => HEADER_ARRAY,
            ContainerKind::Array(ArrayKind::RawScalar) => HEADER_ARRAY | HEADER_SCALAR,
            ContainerKind::Array(ArrayKind::Path) => HEADER_ARRAY | HEADER_PATH,
        };
        Ok(flags | count as u32)
    }

    /// Decodes a header word into its kind and count.
    ///
    /// # Errors
    ///
    /// Returns a corruption error for flag combinations no encoder produces.
    pub fn parse(header: u32) -> Result<(Self, usize)> {
        let count = (header & HEADER_COUNT_MASK) as usize;
        let is_object = header & HEADER_OBJECT != 0;
        let is_array = header & HEADER_ARRAY != 0;
        let vertex = header & HEADER_VERTEX != 0;
        let edge = header & HEADER_EDGE != 0;
        let scalar = header & HEADER_SCALAR != 0;
        let path = header & HEADER_PATH != 0;

        let kind = match (is_object, is_array) {
            (true, false) => {
                if scalar || path {
                    return Err(corrupt_header(header, "array flag on an object"));
                }
                match (vertex, edge) {
                    (false, false) => ContainerKind::Object(ObjectKind::Plain),
                    (true, false) => ContainerKind::Object(ObjectKind::Vertex),
                    (false, true) => ContainerKind::Object(ObjectKind::Edge),
                    (true, true) => return Err(corrupt_header(header, "both vertex and edge")),
                }
            }
            (false, true) => {
                if vertex || edge {
                    return Err(corrupt_header(header, "object flag on an array"));
                }
                match (scalar, path) {
                    (false, false) => ContainerKind::Array(ArrayKind::List),
                    (true, false) if count == 1 => ContainerKind::Array(ArrayKind::RawScalar),
                    (true, false) => {
                        return Err(corrupt_header(header, "raw scalar must have one element"));
                    }
                    (false, true) => ContainerKind::Array(ArrayKind::Path),
                    (true, true) => return Err(corrupt_header(header, "both scalar and path")),
                }
            }
            _ => return Err(corrupt_header(header, "neither or both of object and array")),
        };
        Ok((kind, count))
    }

    /// Number of entry words for `count` elements of this kind.
    #[must_use]
    pub fn entry_count(self, count: usize) -> usize {
        match self {
            ContainerKind::Object(_) => count * 2,
            ContainerKind::Array(_) => count,
        }
    }
}

fn corrupt_header(header: u32, what: &str) -> Error {
    Error::Corruption(format!("invalid container header {header:#010x}: {what}"))
}

/// Canonical key order: shorter keys first, equal lengths byte-wise.
///
/// Object pairs are stored in this order and looked up by binary search
/// against it, so it must never change.
#[inline]
#[must_use]
pub fn key_cmp(a: &[u8], b: &[u8]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
