//! # agraph-common
//!
//! Foundation layer for agraph: identifiers, errors, and hashing helpers.
//!
//! Every other agraph crate depends on this one. It has no internal
//! dependencies and should stay small.
//!
//! ## Modules
//!
//! - [`types`] - Identifier types (GraphId, GraphOid, LabelOid)
//! - [`utils`] - Utility functions and helpers (hashing, errors)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use types::{GraphId, GraphOid, LabelOid};
pub use utils::error::{Error, ErrorKind, Result};
