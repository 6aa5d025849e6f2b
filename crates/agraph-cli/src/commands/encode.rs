//! Binary encoding command.

use anyhow::Result;
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};

#[derive(Serialize)]
struct EncodeOutput {
    bytes: usize,
    hex: String,
}

/// Run the encode command.
pub fn run(value: &str, format: OutputFormat, quiet: bool) -> Result<()> {
    let encoded = super::parse_encoded(value)?;
    let output = EncodeOutput {
        bytes: encoded.as_bytes().len(),
        hex: hex::encode(encoded.as_bytes()),
    };
    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&output, quiet),
        Format::Table => {
            output::line(&output.hex, quiet);
            Ok(())
        }
    }
}
