use crate::serializer::{write_to_file, OutputFormat};
use crate::Generator;
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// FHIR to OpenAPI - Generate an OpenAPI 3 document from a FHIR JSON Schema
#[derive(Parser, Debug)]
#[command(name = "fhir-to-openapi")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Input schema file (if not specified, reads from stdin)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input_path: Option<PathBuf>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Keep `_field` definitions and properties even when `field` exists
    #[arg(long = "keep-shadow-fields")]
    pub keep_shadow_fields: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if let Some(ref input) = args.input_path {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
        if input.is_dir() {
            anyhow::bail!("Input path is a directory: {}", input.display());
        }
        info!("Input file: {}", input.display());
    } else {
        info!("Input: stdin");
    }

    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting OpenAPI document generation...");

    let input: Box<dyn Read> = match &args.input_path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file: {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let generator = Generator::new().skip_shadow_fields(!args.keep_shadow_fields);

    // Render into memory first so a failure never truncates an existing output file
    let mut content = Vec::new();
    let summary = generator
        .generate(input, &mut content, args.output_format)
        .context("Failed to generate OpenAPI document")?;

    write_output(&content, args.output_path.as_deref(), io::stdout().lock())?;

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Definitions read: {}", summary.definitions);
    info!("  - Schemas emitted: {}", summary.schemas);
    info!("  - Definitions skipped: {}", summary.skipped);
    info!("  - Resource types: {}", summary.resources);
    info!("  - Paths: {}", summary.paths);

    Ok(())
}

/// Write the rendered document to the output file, or to `stdout` when none is given.
///
/// Both destinations receive exactly the same bytes.
fn write_output<W: Write>(
    content: &[u8],
    output_path: Option<&Path>,
    mut stdout: W,
) -> Result<()> {
    match output_path {
        Some(path) => {
            info!("Writing output to: {}", path.display());
            write_to_file(content, path)?;
            info!("Successfully wrote OpenAPI document to {}", path.display());
        }
        None => {
            stdout.write_all(content).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["fhir-to-openapi"]).unwrap();
        assert!(args.input_path.is_none());
        assert!(args.output_path.is_none());
        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(!args.keep_shadow_fields);
        assert!(!args.verbose);
    }

    #[test]
    fn test_all_flags() {
        let args = CliArgs::try_parse_from([
            "fhir-to-openapi",
            "-i",
            "fhir.schema.json",
            "-o",
            "out.yaml",
            "-f",
            "yaml",
            "--keep-shadow-fields",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.input_path, Some(PathBuf::from("fhir.schema.json")));
        assert_eq!(args.output_path, Some(PathBuf::from("out.yaml")));
        assert_eq!(args.output_format, OutputFormat::Yaml);
        assert!(args.keep_shadow_fields);
        assert!(args.verbose);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(CliArgs::try_parse_from(["fhir-to-openapi", "-f", "xml"]).is_err());
    }

    #[test]
    fn test_missing_input_rejected() {
        let args = CliArgs::try_parse_from(["fhir-to-openapi", "-i", "/nonexistent/fhir.json"])
            .unwrap();
        let err = parse_args_from_parsed(args).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_directory_input_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let args = CliArgs::try_parse_from([
            "fhir-to-openapi".into(),
            "-i".into(),
            temp_dir.path().as_os_str().to_owned(),
        ])
        .unwrap();
        let err = parse_args_from_parsed(args).unwrap_err();
        assert!(err.to_string().contains("directory"));
    }

    #[test]
    fn test_run_writes_output_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("schema.json");
        let output = temp_dir.path().join("out").join("openapi.yaml");
        fs::write(&input, r#"{"definitions": {"Patient": {"type": "object"}}}"#).unwrap();

        let args = CliArgs {
            input_path: Some(input),
            output_path: Some(output.clone()),
            output_format: OutputFormat::Yaml,
            keep_shadow_fields: false,
            verbose: false,
        };
        run(args).unwrap();

        let yaml = fs::read_to_string(&output).unwrap();
        assert!(yaml.contains("/Patient/{id}"));
        assert!(yaml.contains("PatientResp:"));
    }

    #[test]
    fn test_file_and_stdout_output_are_identical() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("openapi.json");
        let content = b"{\n    \"openapi\": \"3.0.3\"\n}";

        let mut stdout = Vec::new();
        write_output(content, Some(output.as_path()), &mut stdout).unwrap();
        assert!(stdout.is_empty());

        write_output(content, None, &mut stdout).unwrap();
        assert_eq!(stdout, fs::read(&output).unwrap());
        assert_eq!(stdout, content.to_vec());
    }

    #[test]
    fn test_run_leaves_output_untouched_on_bad_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("schema.json");
        let output = temp_dir.path().join("openapi.json");
        fs::write(&input, "{ broken").unwrap();
        fs::write(&output, "previous").unwrap();

        let args = CliArgs {
            input_path: Some(input),
            output_path: Some(output.clone()),
            output_format: OutputFormat::Json,
            keep_shadow_fields: false,
            verbose: false,
        };
        assert!(run(args).is_err());
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    }
}
