#![deny(missing_docs)]

//! # oasgen CLI
//!
//! Command Line Interface for generating OpenAPI documents from endpoint
//! definition files.
//!
//! Supported Commands:
//! - `generate`: Definition file (YAML/JSON) -> OpenAPI 3.0 (JSON/YAML).

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod config;
mod error;
mod generate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI generator CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an OpenAPI document from a definition file.
    Generate(generate::GenerateArgs),
}

fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "info".to_string(),
            _ => "debug".to_string(),
        },
    };
    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
    }

    Ok(())
}
