//! Per-vertex adjacency lists.
//!
//! Every vertex in a graph context carries three edge lists: edges that
//! end at it, edges that start at it, and edges that do both. A self-loop
//! is recorded only in the third list, so iterating incoming and outgoing
//! edges never reports the same loop twice.
//!
//! Lists are append-only while the context is being built and read-only
//! afterwards. Most vertices have few edges, so the first few ids are
//! stored inline.

use agraph_common::types::GraphId;
use smallvec::SmallVec;

/// Number of edge ids stored inline before a list spills to the heap.
const INLINE_EDGES: usize = 8;

/// Which edges of a vertex to visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Edges ending at the vertex.
    Incoming,
    /// Edges starting at the vertex.
    Outgoing,
    /// Edges starting and ending at the vertex.
    SelfLoop,
    /// All of the above, each edge once.
    Both,
}

/// An ordered list of edge ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeList {
    ids: SmallVec<[GraphId; INLINE_EDGES]>,
}

impl EdgeList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an edge id.
    pub fn push(&mut self, id: GraphId) {
        self.ids.push(id);
    }

    /// Number of edges in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if the list holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Edge ids in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[GraphId] {
        &self.ids
    }

    /// Iterates the edge ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = GraphId> + '_ {
        self.ids.iter().copied()
    }
}

impl<'a> IntoIterator for &'a EdgeList {
    type Item = GraphId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, GraphId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}

/// The three edge lists of one vertex.
#[derive(Debug, Clone, Default)]
pub struct VertexAdjacency {
    incoming: EdgeList,
    outgoing: EdgeList,
    self_loops: EdgeList,
}

impl VertexAdjacency {
    /// Creates empty lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an edge that ends at this vertex.
    pub fn add_incoming(&mut self, edge: GraphId) {
        self.incoming.push(edge);
    }

    /// Records an edge that starts at this vertex.
    pub fn add_outgoing(&mut self, edge: GraphId) {
        self.outgoing.push(edge);
    }

    /// Records an edge that starts and ends at this vertex.
    pub fn add_self_loop(&mut self, edge: GraphId) {
        self.self_loops.push(edge);
    }

    #[must_use]
    pub fn incoming(&self) -> &EdgeList {
        &self.incoming
    }

    #[must_use]
    pub fn outgoing(&self) -> &EdgeList {
        &self.outgoing
    }

    #[must_use]
    pub fn self_loops(&self) -> &EdgeList {
        &self.self_loops
    }

    /// Iterates the edges in `direction`.
    ///
    /// With [`Direction::Both`] the order is outgoing, incoming, then
    /// self-loops.
    pub fn edges(&self, direction: Direction) -> Box<dyn Iterator<Item = GraphId> + '_> {
        match direction {
            Direction::Incoming => Box::new(self.incoming.iter()),
            Direction::Outgoing => Box::new(self.outgoing.iter()),
            Direction::SelfLoop => Box::new(self.self_loops.iter()),
            Direction::Both => Box::new(
                self.outgoing
                    .iter()
                    .chain(self.incoming.iter())
                    .chain(self.self_loops.iter()),
            ),
        }
    }

    /// Number of edges in `direction`.
    #[must_use]
    pub fn degree(&self, direction: Direction) -> usize {
        match direction {
            Direction::Incoming => self.incoming.len(),
            Direction::Outgoing => self.outgoing.len(),
            Direction::SelfLoop => self.self_loops.len(),
            Direction::Both => self.incoming.len() + self.outgoing.len() + self.self_loops.len(),
        }
    }
}
