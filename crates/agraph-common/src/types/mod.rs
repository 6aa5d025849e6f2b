//! Core type definitions for agraph.
//!
//! - [`GraphId`]: identity of a vertex or edge inside one graph
//! - [`GraphOid`]: catalog identifier of a whole graph
//! - [`LabelOid`]: catalog identifier of a label table

mod id;

pub use id::{GraphId, GraphOid, LabelOid};
