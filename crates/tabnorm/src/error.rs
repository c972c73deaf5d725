//! Error types for the tabnorm library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for normalization operations.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error interpreting input data.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data to read.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Rows that cannot be decomposed at all (e.g. rows without any column).
    #[error("Invalid row set: {0}")]
    InvalidRowSet(String),

    /// A schema graph that breaks its own key invariants.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Workbook could not be read.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Failure talking to the remote table service.
    #[error("Remote service error: {0}")]
    Remote(String),

    /// Error writing export artifacts.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Error building a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Result type alias for normalization operations.
pub type Result<T> = std::result::Result<T, NormalizeError>;
