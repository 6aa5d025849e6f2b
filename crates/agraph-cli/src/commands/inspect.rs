//! Layout inspection command.

use agraph_core::agtype::hash_encoded;
use agraph_core::{Agtype, Token, to_text};
use anyhow::Result;
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};

#[derive(Serialize)]
struct TokenRow {
    depth: usize,
    token: String,
}

#[derive(Serialize)]
struct InspectOutput {
    container: String,
    count: usize,
    bytes: usize,
    hash: String,
    tokens: Vec<TokenRow>,
}

fn describe(token: &Token) -> Result<String> {
    Ok(match token {
        Token::BeginArray { len, kind } => format!("begin array {kind:?} ({len})"),
        Token::BeginObject { len, kind } => format!("begin object {kind:?} ({len})"),
        Token::Key(key) => format!("key {key:?}"),
        Token::Value(v) => format!("value {}", to_text(v, false)?),
        Token::Elem(v) => format!("elem {}", to_text(v, false)?),
        Token::EndArray => "end array".to_string(),
        Token::EndObject => "end object".to_string(),
    })
}

fn tokens(encoded: &Agtype) -> Result<Vec<TokenRow>> {
    let mut iter = encoded.iter();
    let mut rows = Vec::new();
    while let Some(token) = iter.next() {
        let token = token?;
        // depth after a Begin* already counts the container being opened
        let depth = match token {
            Token::BeginArray { .. } | Token::BeginObject { .. } => iter.depth().saturating_sub(1),
            _ => iter.depth(),
        };
        rows.push(TokenRow {
            depth,
            token: describe(&token)?,
        });
    }
    Ok(rows)
}

/// Run the inspect command.
pub fn run(value: &str, format: OutputFormat, quiet: bool) -> Result<()> {
    let encoded = super::parse_encoded(value)?;
    let output = InspectOutput {
        container: format!("{:?}", encoded.kind()),
        count: encoded.count(),
        bytes: encoded.as_bytes().len(),
        hash: format!("{:016x}", hash_encoded(&encoded)?),
        tokens: tokens(&encoded)?,
    };

    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&output, quiet),
        Format::Table => {
            let items = vec![
                ("Container", output.container),
                ("Count", output.count.to_string()),
                ("Bytes", output.bytes.to_string()),
                ("Hash", output.hash),
            ];
            output::print_key_value_table(&items, quiet);
            if !quiet {
                let mut table = output::create_table();
                output::add_header(&mut table, &["Depth", "Token"]);
                for row in &output.tokens {
                    let indent = "  ".repeat(row.depth);
                    table.add_row(vec![row.depth.to_string(), format!("{indent}{}", row.token)]);
                }
                println!("{table}");
            }
            Ok(())
        }
    }
}
