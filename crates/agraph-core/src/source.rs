//! Interfaces to the storage layer a graph context is built from.
//!
//! A [`GraphContext`](crate::GraphContext) needs three things from the
//! outside world: the list of labels a graph owns, the rows stored under
//! each label, and an identifier for the snapshot those rows were read in.
//! Each concern is its own trait; [`GraphSource`] bundles them.

use agraph_common::types::{GraphId, GraphOid, LabelOid};
use agraph_common::utils::error::Result;
use serde::Serialize;

use crate::agtype::Agtype;

/// Whether a label holds vertices or edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LabelKind {
    Vertex,
    Edge,
}

/// A label registered in a graph's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelInfo {
    pub name: String,
    pub oid: LabelOid,
    pub kind: LabelKind,
}

/// A vertex row as stored under a label.
#[derive(Debug, Clone)]
pub struct VertexRow {
    pub id: GraphId,
    pub properties: Agtype,
}

/// An edge row as stored under a label.
#[derive(Debug, Clone)]
pub struct EdgeRow {
    pub id: GraphId,
    pub start_id: GraphId,
    pub end_id: GraphId,
    pub properties: Agtype,
}

/// Identifies the snapshot a context was built in.
///
/// Two fingerprints compare equal exactly when the same rows are visible:
/// the transaction horizon (`xmin`, `xmax`) is unchanged and no command
/// inside the current transaction has written since (`command_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Fingerprint {
    pub xmin: u64,
    pub xmax: u64,
    pub command_id: u32,
}

impl Fingerprint {
    /// Creates a fingerprint.
    #[must_use]
    pub const fn new(xmin: u64, xmax: u64, command_id: u32) -> Self {
        Self {
            xmin,
            xmax,
            command_id,
        }
    }
}

/// Resolves graph names and enumerates their labels.
pub trait LabelCatalog {
    /// Looks up a graph by name.
    fn graph_oid(&self, name: &str) -> Option<GraphOid>;

    /// Lists the labels of one kind in a graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph is unknown to the catalog.
    fn labels_of(&self, graph: GraphOid, kind: LabelKind) -> Result<Vec<LabelInfo>>;
}

/// Scans the rows stored under a label.
pub trait RowScanner {
    /// Iterates the vertex rows of a vertex label.
    ///
    /// # Errors
    ///
    /// Returns an error if the label cannot be scanned. Individual rows
    /// may also fail, for example on a corrupt properties buffer.
    fn scan_vertices(
        &self,
        label: LabelOid,
    ) -> Result<Box<dyn Iterator<Item = Result<VertexRow>> + '_>>;

    /// Iterates the edge rows of an edge label.
    ///
    /// # Errors
    ///
    /// As for [`scan_vertices`](Self::scan_vertices).
    fn scan_edges(&self, label: LabelOid) -> Result<Box<dyn Iterator<Item = Result<EdgeRow>> + '_>>;
}

/// Reports the snapshot the caller is currently reading in.
pub trait SnapshotOracle {
    fn current_fingerprint(&self) -> Fingerprint;
}

/// Everything needed to build and validate a graph context.
pub trait GraphSource: LabelCatalog + RowScanner + SnapshotOracle {}

impl<T: LabelCatalog + RowScanner + SnapshotOracle + ?Sized> GraphSource for T {}
