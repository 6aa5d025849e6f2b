//! Binary decoding command.

use agraph_core::Agtype;
use anyhow::{Context, Result};
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};

#[derive(Serialize)]
struct DecodeOutput {
    r#type: &'static str,
    text: String,
}

/// Run the decode command.
pub fn run(hex_digits: &str, indent: bool, format: OutputFormat, quiet: bool) -> Result<()> {
    let digits = super::read_input(hex_digits)?;
    let bytes = hex::decode(digits.trim()).context("argument is not valid hex")?;
    let encoded = Agtype::from_bytes(bytes)?;
    let value = encoded.decode()?;
    let text = encoded.to_text(indent)?;
    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(
            &DecodeOutput {
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
