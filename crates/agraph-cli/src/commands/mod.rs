//! CLI command implementations.

pub mod compare;
pub mod config;
pub mod decode;
pub mod encode;
pub mod format;
pub mod inspect;
pub mod set_property;

use agraph_core::{Agtype, Value, encode, from_text};
use anyhow::{Context, Result};

/// Returns the argument itself, or the contents of the file it names when
/// it starts with `@`.
pub fn read_input(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
        }
        None => Ok(arg.to_string()),
    }
}

/// Parses a value argument.
pub fn parse_value(arg: &str) -> Result<Value> {
    let text = read_input(arg)?;
    Ok(from_text(&text)?)
}

/// Parses and encodes a value argument.
pub fn parse_encoded(arg: &str) -> Result<Agtype> {
    Ok(encode(&parse_value(arg)?)?)
}
