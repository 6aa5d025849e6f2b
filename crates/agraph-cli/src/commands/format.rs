//! Canonical text command.

use agraph_core::to_text;
use anyhow::Result;
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};

#[derive(Serialize)]
struct FormatOutput {
    r#type: &'static str,
    text: String,
}

/// Run the format command.
pub fn run(value: &str, indent: bool, format: OutputFormat, quiet: bool) -> Result<()> {
    let value = super::parse_value(value)?;
    let text = to_text(&value, indent)?;
    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(
            &FormatOutput {
                r#type: value.type_name(),
                text,
            },
            quiet,
        ),
        Format::Table => {
            output::line(&text, quiet);
            Ok(())
        }
    }
}
