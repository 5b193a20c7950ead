//! FHIR to OpenAPI - Command-line tool for generating an OpenAPI document from a FHIR JSON Schema.
//!
//! # Usage
//!
//! ```bash
//! fhir-to-openapi [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Generate JSON from a file:
//! ```bash
//! fhir-to-openapi -i fhir.schema.json -o fhir.openapi.json
//! ```
//!
//! Generate YAML from stdin:
//! ```bash
//! fhir-to-openapi -f yaml < fhir.schema.json > fhir.openapi.yaml
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! fhir-to-openapi -i fhir.schema.json -v
//! ```

use anyhow::Result;
use clap::Parser;
use fhir_to_openapi::cli;
use log::info;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("FHIR to OpenAPI generator starting...");

    let args = cli::parse_args_from_parsed(args)?;

    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
