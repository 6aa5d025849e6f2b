//! Engine configuration command.

use agraph_engine::Config;
use anyhow::Result;

use crate::OutputFormat;
use crate::output::{self, Format};

/// Run the config command.
pub fn run(format: OutputFormat, quiet: bool) -> Result<()> {
    let config = Config::default();
    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&config, quiet),
        Format::Table => {
            let items = vec![
                ("Vertex capacity", config.vertex_capacity.to_string()),
                ("Edge capacity", config.edge_capacity.to_string()),
                ("Validate properties", config.validate_properties.to_string()),
            ];
            output::print_key_value_table(&items, quiet);
            Ok(())
        }
    }
}
