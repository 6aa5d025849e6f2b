//! The agtype value format.
//!
//! A [`Value`] is either built in memory (through [`ValueBuilder`] or the
//! convenience constructors) or read from text with [`from_text`]. It is
//! stored as an [`Agtype`], a self-describing little-endian byte buffer
//! produced by [`encode`]. Encoded values can be walked lazily with
//! [`Agtype::iter`], searched by key without decoding, compared with
//! [`compare_encoded`], and hashed with [`hash_encoded`].
//!
//! ## Modules
//!
//! - `format` - Header and entry bit layout
//! - `value` - The [`Value`] sum type
//! - `builder` - Streaming construction with key canonicalization
//! - `container` - Bounds-checked view over an encoded buffer
//! - `encode` / `decode` - Value to bytes and back
//! - `iter` - Pull-based token stream
//! - `text` - JSON-superset text form
//! - `ordering` / `hash` - Total order and a hash consistent with it
//! - `graph` - Vertex, edge, and path helpers
//! - `mutation` - Copy-on-write property updates

mod builder;
mod container;
mod decode;
mod encode;
pub mod format;
pub mod graph;
mod hash;
mod iter;
mod mutation;
mod ordering;
pub mod text;
mod value;

pub use builder::ValueBuilder;
pub use container::Agtype;
pub use decode::decode;
pub use encode::encode;
pub use format::{ArrayKind, ContainerKind, ObjectKind, key_cmp};
pub use hash::{hash_encoded, hash_value};
pub use iter::{Iter, Token};
pub use mutation::{alter_property, alter_property_value};
pub use ordering::{compare, compare_encoded};
pub use text::{from_text, to_text};
pub use value::Value;

#[cfg(test)]
mod proptests;
