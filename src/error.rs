use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A route's compound method identifier could not be split into class and method.
    #[error("invalid method identifier `{0}`: expected `Class.method` or `Class.prototype.method`")]
    InvalidMethodIdentifier(String),

    /// Input file extension is neither JSON nor YAML.
    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}
