//! OpenAPI Assembler - command-line tool for building OpenAPI documents.
//!
//! Reads an introspection snapshot of an application (routes, classes, models) and
//! writes the assembled OpenAPI 3.0 document.
//!
//! # Usage
//!
//! ```bash
//! openapi-assembler [OPTIONS] <SNAPSHOT>
//! ```
//!
//! # Examples
//!
//! ```bash
//! openapi-assembler snapshot.json -c options.yaml -p package.json -o openapi.yaml
//! openapi-assembler snapshot.yaml -f json -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_assembler::cli;

fn main() -> Result<()> {
    // Parse once to read the verbose flag, then validate after the logger is up
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI Assembler starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("OpenAPI document assembly completed successfully");

    Ok(())
}
