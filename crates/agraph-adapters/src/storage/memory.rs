//! In-memory graph storage.
//!
//! Graphs are catalog entries owning a set of label tables. Each label
//! table stores either vertex rows or edge rows. Ids are allocated per
//! label: the label's 16-bit id in the upper bits and a running entry
//! number in the lower 48.
//!
//! Every write advances the command id of the current snapshot and
//! [`MemoryGraphStore::commit`] moves to a fresh transaction horizon, so
//! a [`Fingerprint`] taken before a write never equals one taken after.

use std::cell::Cell;

use agraph_common::types::{GraphId, GraphOid, LabelOid};
use agraph_common::utils::error::{Error, Result};
use agraph_common::utils::hash::FxHashMap;
use agraph_core::Agtype;
use agraph_core::source::{
    EdgeRow, Fingerprint, LabelCatalog, LabelInfo, LabelKind, RowScanner, SnapshotOracle,
    VertexRow,
};
use tracing::trace;

/// Largest entry number a label can allocate.
const MAX_ENTRY: u64 = (1 << 48) - 1;

#[derive(Debug)]
struct LabelTable {
    info: LabelInfo,
    graph: GraphOid,
    label_id: u16,
    next_entry: u64,
    vertices: Vec<VertexRow>,
    edges: Vec<EdgeRow>,
}

impl LabelTable {
    fn allocate_id(&mut self) -> Result<GraphId> {
        if self.next_entry > MAX_ENTRY {
            return Err(Error::Capacity(format!(
                "label \"{}\" has run out of ids",
                self.info.name
            )));
        }
        let id = GraphId::from_parts(self.label_id, self.next_entry);
        self.next_entry += 1;
        Ok(id)
    }
}

#[derive(Debug)]
struct GraphEntry {
    name: String,
    labels: Vec<LabelOid>,
}

/// A single-session in-memory graph store.
#[derive(Debug)]
pub struct MemoryGraphStore {
    graphs: FxHashMap<GraphOid, GraphEntry>,
    graph_names: FxHashMap<String, GraphOid>,
    labels: FxHashMap<LabelOid, LabelTable>,
    next_oid: u32,
    fingerprint: Fingerprint,
    /// Number of label table scans served.
    scans: Cell<u64>,
}

impl MemoryGraphStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graphs: FxHashMap::default(),
            graph_names: FxHashMap::default(),
            labels: FxHashMap::default(),
            next_oid: 1,
            fingerprint: Fingerprint::new(1, 2, 0),
            scans: Cell::new(0),
        }
    }

    fn allocate_oid(&mut self) -> u32 {
        let oid = self.next_oid;
        self.next_oid += 1;
        oid
    }

    fn touch(&mut self) {
        self.fingerprint.command_id += 1;
    }

    /// Creates a graph.
    ///
    /// # Errors
    ///
    /// Returns an error if a graph with this name exists.
    pub fn create_graph(&mut self, name: &str) -> Result<GraphOid> {
        if self.graph_names.contains_key(name) {
            return Err(Error::InvalidValue(format!("graph \"{name}\" already exists")));
        }
        let oid = GraphOid::new(self.allocate_oid());
        self.graphs.insert(
            oid,
            GraphEntry {
                name: name.to_string(),
                labels: Vec::new(),
            },
        );
        self.graph_names.insert(name.to_string(), oid);
        self.touch();
        Ok(oid)
    }

    /// Creates a vertex or edge label in `graph`.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph does not exist, already has a label of
    /// this name, or has no label ids left.
    pub fn create_label(
        &mut self,
        graph: GraphOid,
        name: &str,
        kind: LabelKind,
    ) -> Result<LabelOid> {
        let entry = self
            .graphs
            .get(&graph)
            .ok_or_else(|| unknown_graph(graph))?;
        if entry
            .labels
            .iter()
            .any(|l| self.labels.get(l).is_some_and(|t| t.info.name == name))
        {
            return Err(Error::InvalidValue(format!(
                "label \"{name}\" already exists in graph \"{}\"",
                entry.name
            )));
        }
        let label_id = u16::try_from(entry.labels.len() + 1)
            .map_err(|_| Error::Capacity(format!("graph \"{}\" has too many labels", entry.name)))?;

        let oid = LabelOid::new(self.allocate_oid());
        self.labels.insert(
            oid,
            LabelTable {
                info: LabelInfo {
                    name: name.to_string(),
                    oid,
                    kind,
                },
                graph,
                label_id,
                next_entry: 1,
                vertices: Vec::new(),
                edges: Vec::new(),
            },
        );
        if let Some(entry) = self.graphs.get_mut(&graph) {
            entry.labels.push(oid);
        }
        self.touch();
        Ok(oid)
    }

    /// Looks up a label of `graph` by name.
    #[must_use]
    pub fn label_oid(&self, graph: GraphOid, name: &str) -> Option<LabelOid> {
        self.graphs.get(&graph)?.labels.iter().copied().find(|l| {
            self.labels.get(l).is_some_and(|t| t.info.name == name)
        })
    }

    fn table_mut(&mut self, label: LabelOid, kind: LabelKind) -> Result<&mut LabelTable> {
        let table = self
            .labels
            .get_mut(&label)
            .ok_or_else(|| Error::InvalidValue(format!("label {label} does not exist")))?;
        if table.info.kind != kind {
            return Err(Error::Type(format!(
                "label \"{}\" is not a {} label",
                table.info.name,
                match kind {
                    LabelKind::Vertex => "vertex",
                    LabelKind::Edge => "edge",
                }
            )));
        }
        Ok(table)
    }

    /// Stores a vertex under `label` and returns its new id.
    ///
    /// # Errors
    ///
    /// Returns an error if `label` is not a vertex label of this store.
    pub fn insert_vertex(&mut self, label: LabelOid, properties: Agtype) -> Result<GraphId> {
        let table = self.table_mut(label, LabelKind::Vertex)?;
        let id = table.allocate_id()?;
        table.vertices.push(VertexRow { id, properties });
        trace!(%id, %label, "inserted vertex");
        self.touch();
        Ok(id)
    }

    /// Stores an edge under `label` and returns its new id.
    ///
    /// Endpoints are not checked here; a dangling edge fails when a graph
    /// context is built over it.
    ///
    /// # Errors
    ///
    /// Returns an error if `label` is not an edge label of this store.
    pub fn insert_edge(
        &mut self,
        label: LabelOid,
        start_id: GraphId,
        end_id: GraphId,
        properties: Agtype,
    ) -> Result<GraphId> {
        let table = self.table_mut(label, LabelKind::Edge)?;
        let id = table.allocate_id()?;
        table.edges.push(EdgeRow {
            id,
            start_id,
            end_id,
            properties,
        });
        trace!(%id, %label, "inserted edge");
        self.touch();
        Ok(id)
    }

    /// Removes a vertex. Returns whether it existed.
    pub fn delete_vertex(&mut self, id: GraphId) -> bool {
        let removed = self.labels.values_mut().any(|t| {
            let before = t.vertices.len();
            t.vertices.retain(|row| row.id != id);
            t.vertices.len() != before
        });
        if removed {
            self.touch();
        }
        removed
    }

    /// Ends the current transaction; later reads see a new horizon.
    pub fn commit(&mut self) {
        self.fingerprint = Fingerprint::new(self.fingerprint.xmax, self.fingerprint.xmax + 1, 0);
    }

    /// Number of label table scans served so far.
    #[must_use]
    pub fn scan_count(&self) -> u64 {
        self.scans.get()
    }

    fn record_scan(&self) {
        self.scans.set(self.scans.get() + 1);
    }

    fn table(&self, label: LabelOid) -> Result<&LabelTable> {
        self.labels
            .get(&label)
            .ok_or_else(|| Error::InvalidValue(format!("label {label} does not exist")))
    }
}

impl Default for MemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown_graph(graph: GraphOid) -> Error {
    Error::InvalidValue(format!("graph {graph} does not exist"))
}

impl LabelCatalog for MemoryGraphStore {
    fn graph_oid(&self, name: &str) -> Option<GraphOid> {
        self.graph_names.get(name).copied()
    }

    fn labels_of(&self, graph: GraphOid, kind: LabelKind) -> Result<Vec<LabelInfo>> {
        let entry = self.graphs.get(&graph).ok_or_else(|| unknown_graph(graph))?;
        Ok(entry
            .labels
            .iter()
            .filter_map(|l| self.labels.get(l))
            .filter(|t| t.info.kind == kind && t.graph == graph)
            .map(|t| t.info.clone())
            .collect())
    }
}

impl RowScanner for MemoryGraphStore {
    fn scan_vertices(
        &self,
        label: LabelOid,
    ) -> Result<Box<dyn Iterator<Item = Result<VertexRow>> + '_>> {
        let table = self.table(label)?;
        self.record_scan();
        Ok(Box::new(table.vertices.iter().cloned().map(Ok)))
    }

    fn scan_edges(
        &self,
        label: LabelOid,
    ) -> Result<Box<dyn Iterator<Item = Result<EdgeRow>> + '_>> {
        let table = self.table(label)?;
        self.record_scan();
        Ok(Box::new(table.edges.iter().cloned().map(Ok)))
    }
}

impl SnapshotOracle for MemoryGraphStore {
    fn current_fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agraph_core::{Value, encode};

    fn empty_props() -> Agtype {
        encode(&Value::empty_object()).unwrap()
    }

    #[test]
    fn test_graph_and_labels() {
        let mut store = MemoryGraphStore::new();
        let g = store.create_graph("social").unwrap();
        assert_eq!(store.graph_oid("social"), Some(g));
        assert!(store.create_graph("social").is_err());

        let person = store.create_label(g, "Person", LabelKind::Vertex).unwrap();
        let knows = store.create_label(g, "KNOWS", LabelKind::Edge).unwrap();
        assert!(store.create_label(g, "Person", LabelKind::Vertex).is_err());
        assert_eq!(store.label_oid(g, "KNOWS"), Some(knows));

        let vertex_labels = store.labels_of(g, LabelKind::Vertex).unwrap();
        assert_eq!(vertex_labels.len(), 1);
        assert_eq!(vertex_labels[0].oid, person);
        assert!(store.labels_of(GraphOid::new(999), LabelKind::Edge).is_err());
    }

    #[test]
    fn test_ids_carry_label() {
        let mut store = MemoryGraphStore::new();
        let g = store.create_graph("g").unwrap();
        let a = store.create_label(g, "A", LabelKind::Vertex).unwrap();
        let b = store.create_label(g, "B", LabelKind::Vertex).unwrap();
        let va = store.insert_vertex(a, empty_props()).unwrap();
        let vb = store.insert_vertex(b, empty_props()).unwrap();
        assert_eq!(va.label_id(), 1);
        assert_eq!(vb.label_id(), 2);
        assert_eq!(va.entry(), 1);
        assert_ne!(va, vb);
    }

    #[test]
    fn test_kind_mismatch() {
        let mut store = MemoryGraphStore::new();
        let g = store.create_graph("g").unwrap();
        let e = store.create_label(g, "E", LabelKind::Edge).unwrap();
        let err = store.insert_vertex(e, empty_props()).unwrap_err();
        assert!(matches!(err, Error::Type(_)));
    }

    #[test]
    fn test_fingerprint_moves() {
        let mut store = MemoryGraphStore::new();
        let g = store.create_graph("g").unwrap();
        let v = store.create_label(g, "V", LabelKind::Vertex).unwrap();
        let before = store.current_fingerprint();
        store.insert_vertex(v, empty_props()).unwrap();
        let after_write = store.current_fingerprint();
        assert_ne!(before, after_write);
        assert_eq!(after_write.command_id, before.command_id + 1);

        store.commit();
        let committed = store.current_fingerprint();
        assert_eq!(committed.command_id, 0);
        assert_eq!(committed.xmin, after_write.xmax);
        assert_eq!(store.current_fingerprint(), committed);
    }

    #[test]
    fn test_scans_are_counted() {
        let mut store = MemoryGraphStore::new();
        let g = store.create_graph("g").unwrap();
        let v = store.create_label(g, "V", LabelKind::Vertex).unwrap();
        store.insert_vertex(v, empty_props()).unwrap();
        store.insert_vertex(v, empty_props()).unwrap();
        assert_eq!(store.scan_count(), 0);
        let rows: Vec<_> = store.scan_vertices(v).unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(store.scan_count(), 1);
    }

    #[test]
    fn test_delete_vertex() {
        let mut store = MemoryGraphStore::new();
        let g = store.create_graph("g").unwrap();
        let v = store.create_label(g, "V", LabelKind::Vertex).unwrap();
        let id = store.insert_vertex(v, empty_props()).unwrap();
        let before = store.current_fingerprint();
        assert!(store.delete_vertex(id));
        assert!(!store.delete_vertex(id));
        assert_ne!(store.current_fingerprint(), before);
        assert_eq!(store.scan_vertices(v).unwrap().count(), 0);
    }
}
