//! Error types for the autoreport library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pipeline operations.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Error reading, writing or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data to process.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Input is missing columns the pipeline needs.
    #[error("Input is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML configuration could not be parsed.
    #[error("YAML error in '{path}': {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The LLM provider failed or returned nothing usable.
    #[error("LLM error ({provider}): {message}")]
    Llm { provider: String, message: String },

    /// Data validation reported errors.
    #[error("Data validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl ReportError {
    /// Wrap an I/O error together with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }

    /// Build an LLM error for the named provider.
    pub fn llm(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ReportError::Llm {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for autoreport operations.
pub type Result<T> = std::result::Result<T, ReportError>;
