//! agraph CLI - Debug tool for agtype values.
//!
//! Converts values between their text and binary forms, shows how a value
//! is laid out, and runs the ordering, hashing, and property-update
//! routines on values given on the command line.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};

/// agtype inspection tool.
///
/// Every VALUE argument is agtype text, or `@path` to read it from a file.
#[derive(Parser)]
#[command(name = "agraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Suppress output and info messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Output format options.
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// Machine-readable JSON format
    Json,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Parse a value and print its canonical text
    Format {
        /// Value text
        value: String,

        /// Put every element on its own line
        #[arg(long)]
        indent: bool,
    },

    /// Print the binary encoding of a value as hex
    Encode {
        /// Value text
        value: String,
    },

    /// Print the text of a hex-encoded value
    Decode {
        /// Hex digits of the encoded value
        hex: String,

        /// Put every element on its own line
        #[arg(long)]
        indent: bool,
    },

    /// Show the header and token stream of a value
    Inspect {
        /// Value text
        value: String,
    },

    /// Compare two values and show their hashes
    Compare {
        /// Left value text
        left: String,
        /// Right value text
        right: String,
    },

    /// Set or remove one key of an object
    SetProperty {
        /// Object text
        object: String,
        /// Key to change
        key: String,
        /// New value text; omitted means remove
        value: Option<String>,

        /// Remove the key even if a value is given
        #[arg(long)]
        remove: bool,
    },

    /// Show the default engine configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else if !cli.quiet {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::Format { value, indent } => {
            commands::format::run(&value, indent, cli.format, cli.quiet)
        }
        Commands::Encode { value } => commands::encode::run(&value, cli.format, cli.quiet),
        Commands::Decode { hex, indent } => {
            commands::decode::run(&hex, indent, cli.format, cli.quiet)
        }
        Commands::Inspect { value } => commands::inspect::run(&value, cli.format, cli.quiet),
        Commands::Compare { left, right } => {
            commands::compare::run(&left, &right, cli.format, cli.quiet)
        }
        Commands::SetProperty {
            object,
            key,
            value,
            remove,
        } => commands::set_property::run(
            &object,
            &key,
            value.as_deref(),
            remove,
            cli.format,
            cli.quiet,
        ),
        Commands::Config => commands::config::run(cli.format, cli.quiet),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
