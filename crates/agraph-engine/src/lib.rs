//! # agraph-engine
//!
//! Entry point for agraph: sessions and the graph snapshot cache they own.
//!
//! ## Modules
//!
//! - [`cache`] - Graph context registry with fingerprint invalidation
//! - [`config`] - Configuration options
//! - [`session`] - Session management

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cache;
pub mod config;
pub mod session;

pub use cache::{CacheStats, GraphCache};
pub use config::Config;
pub use session::Session;
