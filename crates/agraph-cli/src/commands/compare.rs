//! Ordering and hashing command.

use std::cmp::Ordering;

use agraph_core::agtype::hash_value;
use agraph_core::compare;
use anyhow::Result;
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};

#[derive(Serialize)]
struct CompareOutput {
    ordering: &'static str,
    left_hash: String,
    right_hash: String,
    hashes_equal: bool,
}

/// Run the compare command.
pub fn run(left: &str, right: &str, format: OutputFormat, quiet: bool) -> Result<()> {
    let left = super::parse_value(left)?;
    let right = super::parse_value(right)?;
    let left_hash = hash_value(&left)?;
    let right_hash = hash_value(&right)?;
    let output = CompareOutput {
        ordering: match compare(&left, &right) {
            Ordering::Less => "<",
            Ordering::Equal => "=",
            Ordering::Greater => ">",
        },
        left_hash: format!("{left_hash:016x}"),
        right_hash: format!("{right_hash:016x}"),
        hashes_equal: left_hash == right_hash,
    };

    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&output, quiet),
        Format::Table => {
            let items = vec![
                ("Ordering", format!("left {} right", output.ordering)),
                ("Left hash", output.left_hash),
                ("Right hash", output.right_hash),
            ];
            output::print_key_value_table(&items, quiet);
            Ok(())
        }
    }
}
