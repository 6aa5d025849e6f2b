//! Identifier types for graph elements and catalog objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of low bits of a [`GraphId`] holding the per-label entry number.
const ENTRY_BITS: u32 = 48;

/// Mask selecting the entry number of a [`GraphId`].
const ENTRY_MASK: u64 = (1 << ENTRY_BITS) - 1;

/// Identity of a vertex or edge.
///
/// The upper 16 bits name the label the element was created under and the
/// lower 48 bits are a sequence number within that label, so ids are unique
/// across the whole graph, not just within one label table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[repr(transparent)]
pub struct GraphId(pub i64);

impl GraphId {
    /// Creates a GraphId from its raw integer form.
    #[inline]
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Composes an id from a label id and an entry number.
    ///
    /// Entry numbers wider than 48 bits are truncated.
    #[inline]
    #[must_use]
    pub const fn from_parts(label_id: u16, entry: u64) -> Self {
        Self((((label_id as u64) << ENTRY_BITS) | (entry & ENTRY_MASK)) as i64)
    }

    /// Returns the raw integer value.
    #[inline]
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Returns the label id encoded in the upper bits.
    #[inline]
    #[must_use]
    pub const fn label_id(self) -> u16 {
        ((self.0 as u64) >> ENTRY_BITS) as u16
    }

    /// Returns the entry number encoded in the lower bits.
    #[inline]
    #[must_use]
    pub const fn entry(self) -> u64 {
        (self.0 as u64) & ENTRY_MASK
    }
}

impl fmt::Debug for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GraphId({}.{})", self.label_id(), self.entry())
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for GraphId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<GraphId> for i64 {
    fn from(id: GraphId) -> Self {
        id.0
    }
}

/// Catalog identifier of a graph.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[repr(transparent)]
pub struct GraphOid(pub u32);

impl GraphOid {
    /// The invalid graph oid.
    pub const INVALID: Self = Self(0);

    /// Creates a new GraphOid.
    #[inline]
    #[must_use]
    pub const fn new(oid: u32) -> Self {
        Self(oid)
    }

    /// Returns the raw u32 value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Checks if this is a valid graph oid.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for GraphOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "GraphOid({})", self.0)
        } else {
            write!(f, "GraphOid(INVALID)")
        }
    }
}

impl fmt::Display for GraphOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for GraphOid {
    fn from(oid: u32) -> Self {
        Self(oid)
    }
}

/// Catalog identifier of a label table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[repr(transparent)]
pub struct LabelOid(pub u32);

impl LabelOid {
    /// Creates a new LabelOid.
    #[inline]
    #[must_use]
    pub const fn new(oid: u32) -> Self {
        Self(oid)
    }

    /// Returns the raw u32 value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LabelOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LabelOid({})", self.0)
    }
}

impl fmt::Display for LabelOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for LabelOid {
    fn from(oid: u32) -> Self {
        Self(oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_id_parts() {
        let id = GraphId::from_parts(3, 42);
        assert_eq!(id.label_id(), 3);
        assert_eq!(id.entry(), 42);
        assert_eq!(id.as_i64(), (3_i64 << 48) | 42);
    }

    #[test]
    fn test_graph_id_high_label() {
        let id = GraphId::from_parts(u16::MAX, 1);
        assert_eq!(id.label_id(), u16::MAX);
        assert_eq!(id.entry(), 1);
        assert!(id.as_i64() < 0);
    }

    #[test]
    fn test_graph_id_conversions() {
        let id: GraphId = 281_474_976_710_657_i64.into();
        assert_eq!(id.label_id(), 1);
        assert_eq!(id.entry(), 1);
        assert_eq!(i64::from(id), 281_474_976_710_657);
        assert_eq!(id.to_string(), "281474976710657");
        assert_eq!(format!("{id:?}"), "GraphId(1.1)");
    }

    #[test]
    fn test_graph_oid_validity() {
        assert!(!GraphOid::INVALID.is_valid());
        assert!(GraphOid::new(7).is_valid());
        assert_eq!(format!("{:?}", GraphOid::INVALID), "GraphOid(INVALID)");
        assert_eq!(LabelOid::from(9).as_u32(), 9);
    }
}
