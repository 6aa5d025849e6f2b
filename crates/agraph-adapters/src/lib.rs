//! # agraph-adapters
//!
//! Adapters layer for agraph: storage backends behind the
//! [`GraphSource`](agraph_core::GraphSource) interfaces and the wire
//! encoding used to move agtype values between processes.
//!
//! ## Modules
//!
//! - [`storage`] - Storage backends (in-memory)
//! - [`wire`] - Versioned send/receive encoding

pub mod storage;
pub mod wire;

pub use storage::memory::MemoryGraphStore;
