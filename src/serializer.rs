//! Serialization module for converting OpenAPI documents to YAML or JSON format.
//!
//! Documents are rendered completely in memory before anything is written, so a
//! failed conversion never leaves partial output behind.

use crate::error::{Error, Result};
use crate::openapi_builder::OpenApiDocument;
use anyhow::Context;
use clap::ValueEnum;
use log::debug;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON format, indented with four spaces
    #[default]
    Json,
    /// YAML format
    Yaml,
}

/// Serializes an OpenAPI document to YAML format.
///
/// # Errors
///
/// Returns [`Error::SerializationError`] if the document cannot be represented as YAML.
pub fn serialize_yaml(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    Ok(serde_yaml::to_string(doc)?)
}

/// Serializes an OpenAPI document to JSON format with pretty printing.
///
/// Nested levels are indented with four spaces.
///
/// # Errors
///
/// Returns [`Error::SerializationError`] if serialization fails.
pub fn serialize_json(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut serializer)
        .map_err(|e| Error::SerializationError(format!("JSON: {}", e)))?;
    String::from_utf8(buf).map_err(|e| Error::SerializationError(format!("JSON: {}", e)))
}

/// Serializes an OpenAPI document in the requested format
pub fn serialize(doc: &OpenApiDocument, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serialize_json(doc),
        OutputFormat::Yaml => serialize_yaml(doc),
    }
}

/// Renders the document and writes it to `output` in one piece
pub fn write_document<W: Write>(
    doc: &OpenApiDocument,
    format: OutputFormat,
    mut output: W,
) -> Result<()> {
    let content = serialize(doc, format)?;
    output.write_all(content.as_bytes())?;
    output.flush()?;
    debug!("Wrote {} bytes", content.len());
    Ok(())
}

/// Writes string content to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
/// Parent directories are created as needed.
pub fn write_to_file(content: &[u8], path: &Path) -> anyhow::Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
