//! Serialization module for the document and its input files.
//!
//! The assembled document is written out as YAML or JSON. Input files (the
//! introspection snapshot, options, project metadata) are decoded with the same
//! pair of formats, picked by file extension.

use crate::document::OpenApiDocument;
use crate::error::{Error, Result};
use anyhow::Context;
use clap::ValueEnum;
use log::debug;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Wire formats understood for both input and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

impl Format {
    /// Picks the format from a file extension (`.json`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Ok(Format::Yaml)
            }
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Decodes `content` into `T` using this format.
    pub fn decode<T: DeserializeOwned>(self, content: &str) -> Result<T> {
        match self {
            Format::Json => Ok(serde_json::from_str(content)?),
            Format::Yaml => Ok(serde_yaml::from_str(content)?),
        }
    }
}

/// Reads and decodes a JSON or YAML file.
///
/// # Errors
///
/// Returns an error if the extension is not recognised, the file cannot be read,
/// or its content does not match `T`.
pub fn read_from_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = Format::from_path(path)?;
    debug!("Reading {:?} file: {}", format, path.display());
    let content = fs::read_to_string(path)?;
    format.decode(&content)
}

/// Serializes an OpenAPI document to YAML format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(doc: &OpenApiDocument) -> anyhow::Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize OpenAPI document to YAML")
}

/// Serializes an OpenAPI document to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &OpenApiDocument) -> anyhow::Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}

/// Serializes the document in the requested format.
pub fn serialize(doc: &OpenApiDocument, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Yaml => serialize_yaml(doc),
        Format::Json => serialize_json(doc),
    }
}

/// Writes string content to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> anyhow::Result<()> {
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
