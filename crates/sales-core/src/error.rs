use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sales pipeline.
#[derive(Error, Debug)]
pub enum SalesError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be produced or parsed.
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A source file lacks one or more of the required columns.
    #[error("Missing columns in {path}: {}", .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    /// The configured reference date is not a calendar date.
    #[error("Invalid reference date: {0}")]
    InvalidReferenceDate(String),

    /// The file discovery pattern could not be compiled.
    #[error("Invalid file pattern: {0}")]
    InvalidPattern(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the sales crates.
pub type Result<T> = std::result::Result<T, SalesError>;
