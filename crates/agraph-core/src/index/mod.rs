//! Index structures over a graph context.
//!
//! - [`adjacency`] - Per-vertex incoming, outgoing, and self-loop edge lists

pub mod adjacency;
