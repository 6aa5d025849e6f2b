//! Graph context construction and lookup.

use std::sync::Arc;

use agraph_common::types::{GraphId, GraphOid, LabelOid};
use agraph_common::utils::error::{Error, Result};
use agraph_common::utils::hash::{FxHashMap, map_with_capacity};
use serde::Serialize;
use tracing::debug;

use crate::agtype::Agtype;
use crate::index::adjacency::{Direction, EdgeList, VertexAdjacency};
use crate::source::{EdgeRow, Fingerprint, GraphSource, LabelKind, VertexRow};

/// Configuration for building a graph context.
#[derive(Debug, Clone, Serialize)]
pub struct GraphContextConfig {
    /// Initial capacity of the vertex table.
    pub vertex_capacity: usize,
    /// Initial capacity of the edge table.
    pub edge_capacity: usize,
    /// Whether to reject rows whose properties are not a plain object.
    pub validate_properties: bool,
}

impl Default for GraphContextConfig {
    fn default() -> Self {
        Self {
            vertex_capacity: 1_000_000,
            edge_capacity: 1_000_000,
            validate_properties: true,
        }
    }
}

impl GraphContextConfig {
    /// Small tables for tests and tools.
    #[must_use]
    pub fn small() -> Self {
        Self {
            vertex_capacity: 64,
            edge_capacity: 64,
            ..Self::default()
        }
    }
}

/// A vertex and its adjacency.
#[derive(Debug, Clone)]
pub struct VertexEntry {
    id: GraphId,
    label_oid: LabelOid,
    label: Arc<str>,
    properties: Agtype,
    adjacency: VertexAdjacency,
}

impl VertexEntry {
    #[must_use]
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Label table the vertex was read from.
    #[must_use]
    pub fn label_oid(&self) -> LabelOid {
        self.label_oid
    }

    /// Name of the label table the vertex was read from.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn properties(&self) -> &Agtype {
        &self.properties
    }

    #[must_use]
    pub fn adjacency(&self) -> &VertexAdjacency {
        &self.adjacency
    }

    /// Edges ending at this vertex, excluding self-loops.
    #[must_use]
    pub fn edges_in(&self) -> &EdgeList {
        self.adjacency.incoming()
    }

    /// Edges starting at this vertex, excluding self-loops.
    #[must_use]
    pub fn edges_out(&self) -> &EdgeList {
        self.adjacency.outgoing()
    }

    /// Edges starting and ending at this vertex.
    #[must_use]
    pub fn edges_self(&self) -> &EdgeList {
        self.adjacency.self_loops()
    }

    /// Number of edges touching this vertex in `direction`.
    #[must_use]
    pub fn degree(&self, direction: Direction) -> usize {
        self.adjacency.degree(direction)
    }
}

/// An edge with its endpoints.
#[derive(Debug, Clone)]
pub struct EdgeEntry {
    id: GraphId,
    label_oid: LabelOid,
    label: Arc<str>,
    start_id: GraphId,
    end_id: GraphId,
    properties: Agtype,
}

impl EdgeEntry {
    #[must_use]
    pub fn id(&self) -> GraphId {
        self.id
    }

    #[must_use]
    pub fn label_oid(&self) -> LabelOid {
        self.label_oid
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn start_id(&self) -> GraphId {
        self.start_id
    }

    #[must_use]
    pub fn end_id(&self) -> GraphId {
        self.end_id
    }

    #[must_use]
    pub fn properties(&self) -> &Agtype {
        &self.properties
    }

    /// True if the edge starts and ends at the same vertex.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.start_id == self.end_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Building,
    Frozen,
}

/// All vertices and edges of one graph in one snapshot.
#[derive(Debug)]
pub struct GraphContext {
    name: String,
    oid: GraphOid,
    fingerprint: Fingerprint,
    vertices: FxHashMap<GraphId, VertexEntry>,
    edges: FxHashMap<GraphId, EdgeEntry>,
    /// Vertex ids in load order.
    vertex_order: Vec<GraphId>,
    state: State,
}

impl GraphContext {
    /// Loads every vertex label table, then every edge label table, of the
    /// graph `oid` from `source`.
    ///
    /// # Errors
    ///
    /// Returns an internal error if a vertex or edge id occurs twice or an
    /// edge refers to a vertex that was not loaded. Catalog and scan
    /// errors from `source` are passed through.
    pub fn build<S: GraphSource + ?Sized>(
        name: &str,
        oid: GraphOid,
        fingerprint: Fingerprint,
        source: &S,
        config: &GraphContextConfig,
    ) -> Result<Self> {
        let mut ctx = Self {
            name: name.to_string(),
            oid,
            fingerprint,
            vertices: map_with_capacity(config.vertex_capacity),
            edges: map_with_capacity(config.edge_capacity),
            vertex_order: Vec::new(),
            state: State::Building,
        };

        for label in source.labels_of(oid, LabelKind::Vertex)? {
            let label_name: Arc<str> = Arc::from(label.name.as_str());
            let before = ctx.vertices.len();
            for row in source.scan_vertices(label.oid)? {
                ctx.insert_vertex(row?, label.oid, &label_name, config)?;
            }
            debug!(
                graph = name,
                label = %label.name,
                vertices = ctx.vertices.len() - before,
                "loaded vertex label"
            );
        }

        for label in source.labels_of(oid, LabelKind::Edge)? {
            let label_name: Arc<str> = Arc::from(label.name.as_str());
            let before = ctx.edges.len();
            for row in source.scan_edges(label.oid)? {
                ctx.insert_edge(row?, label.oid, &label_name, config)?;
            }
            debug!(
                graph = name,
                label = %label.name,
                edges = ctx.edges.len() - before,
                "loaded edge label"
            );
        }

        ctx.freeze();
        debug!(
            graph = name,
            vertices = ctx.vertex_count(),
            edges = ctx.edge_count(),
            "graph context built"
        );
        Ok(ctx)
    }

    fn check_properties(properties: &Agtype, what: &str, id: GraphId) -> Result<()> {
        if properties.is_plain_object() {
            Ok(())
        } else {
            Err(Error::Corruption(format!(
                "properties of {what} {id} are not an object"
            )))
        }
    }

    fn insert_vertex(
        &mut self,
        row: VertexRow,
        label_oid: LabelOid,
        label: &Arc<str>,
        config: &GraphContextConfig,
    ) -> Result<()> {
        debug_assert_eq!(self.state, State::Building);
        if config.validate_properties {
            Self::check_properties(&row.properties, "vertex", row.id)?;
        }
        if self.vertices.contains_key(&row.id) {
            return Err(Error::Internal(format!(
                "duplicate vertex {} in graph \"{}\"",
                row.id, self.name
            )));
        }
        self.vertex_order.push(row.id);
        self.vertices.insert(
            row.id,
            VertexEntry {
                id: row.id,
                label_oid,
                label: Arc::clone(label),
                properties: row.properties,
                adjacency: VertexAdjacency::new(),
            },
        );
        Ok(())
    }

    fn insert_edge(
        &mut self,
        row: EdgeRow,
        label_oid: LabelOid,
        label: &Arc<str>,
        config: &GraphContextConfig,
    ) -> Result<()> {
        debug_assert_eq!(self.state, State::Building);
        if config.validate_properties {
            Self::check_properties(&row.properties, "edge", row.id)?;
        }
        if self.edges.contains_key(&row.id) {
            return Err(Error::Internal(format!(
                "duplicate edge {} in graph \"{}\"",
                row.id, self.name
            )));
        }
        for endpoint in [row.start_id, row.end_id] {
            if !self.vertices.contains_key(&endpoint) {
                return Err(Error::Internal(format!(
                    "edge {} refers to missing vertex {endpoint} in graph \"{}\"",
                    row.id, self.name
                )));
            }
        }

        if row.start_id == row.end_id {
            if let Some(v) = self.vertices.get_mut(&row.start_id) {
                v.adjacency.add_self_loop(row.id);
            }
        } else {
            if let Some(v) = self.vertices.get_mut(&row.start_id) {
                v.adjacency.add_outgoing(row.id);
            }
            if let Some(v) = self.vertices.get_mut(&row.end_id) {
                v.adjacency.add_incoming(row.id);
            }
        }

        self.edges.insert(
            row.id,
            EdgeEntry {
                id: row.id,
                label_oid,
                label: Arc::clone(label),
                start_id: row.start_id,
                end_id: row.end_id,
                properties: row.properties,
            },
        );
        Ok(())
    }

    fn freeze(&mut self) {
        self.vertex_order.shrink_to_fit();
        self.state = State::Frozen;
    }

    /// Graph name the context was built for.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn oid(&self) -> GraphOid {
        self.oid
    }

    /// Snapshot the context was built in.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// True if the context can serve reads made in `current`.
    #[must_use]
    pub fn is_valid_for(&self, current: &Fingerprint) -> bool {
        self.fingerprint == *current
    }

    #[must_use]
    pub fn get_vertex_entry(&self, id: GraphId) -> Option<&VertexEntry> {
        self.vertices.get(&id)
    }

    #[must_use]
    pub fn get_edge_entry(&self, id: GraphId) -> Option<&EdgeEntry> {
        self.edges.get(&id)
    }

    /// Vertex ids in load order.
    #[must_use]
    pub fn vertex_ids(&self) -> &[GraphId] {
        &self.vertex_order
    }

    /// Iterates vertices in load order.
    pub fn vertices(&self) -> impl Iterator<Item = &VertexEntry> + '_ {
        self.vertex_order
            .iter()
            .filter_map(|id| self.vertices.get(id))
    }

    /// Iterates edges in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeEntry> + '_ {
        self.edges.values()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
