//! Property update command.

use agraph_core::agtype::alter_property;
use anyhow::Result;
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};

#[derive(Serialize)]
struct SetPropertyOutput {
    text: String,
    bytes: usize,
}

/// Run the set-property command.
pub fn run(
    object: &str,
    key: &str,
    value: Option<&str>,
    remove: bool,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let object = super::parse_encoded(object)?;
    let value = value.map(super::parse_encoded).transpose()?;
    let updated = alter_property(&object, key, value.as_ref(), remove)?;
    let output = SetPropertyOutput {
        text: updated.to_text(false)?,
        bytes: updated.as_bytes().len(),
    };

    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&output, quiet),
        Format::Table => {
            output::line(&output.text, quiet);
            Ok(())
        }
    }
}
