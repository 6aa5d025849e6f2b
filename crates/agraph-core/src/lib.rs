//! # agraph-core
//!
//! Core layer for agraph: the agtype value format and the per-graph
//! snapshot context built on top of it.
//!
//! This crate depends only on `agraph-common`.
//!
//! ## Modules
//!
//! - [`agtype`] - Value model, binary codec, text form, ordering, hashing
//! - [`graph`] - Graph snapshot context (vertex and edge tables)
//! - [`index`] - Per-vertex adjacency lists
//! - [`source`] - Interfaces for the catalog, row scans, and snapshot state

pub mod agtype;
pub mod graph;
pub mod index;
pub mod source;

// Re-export commonly used types
pub use agtype::{Agtype, Token, Value, ValueBuilder, compare, decode, encode, from_text, to_text};
pub use graph::{EdgeEntry, GraphContext, GraphContextConfig, VertexEntry};
pub use index::adjacency::{Direction, EdgeList, VertexAdjacency};
pub use source::{EdgeRow, Fingerprint, GraphSource, LabelInfo, LabelKind, VertexRow};
