//! Per-graph snapshot context.
//!
//! A [`GraphContext`] holds every vertex and edge of one graph as seen in
//! one snapshot, keyed by id, with adjacency lists per vertex. It is built
//! in a single pass over a [`GraphSource`](crate::source::GraphSource) and
//! is immutable afterwards.

mod context;

pub use context::{EdgeEntry, GraphContext, GraphContextConfig, VertexEntry};
