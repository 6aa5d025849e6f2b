//! Storage backends.
//!
//! - [`memory`] - Transactional in-memory label tables

pub mod memory;
