use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sales dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dataset row could not be parsed. The whole load is rejected.
    #[error("Malformed input at line {line}: {message}")]
    MalformedInput { line: u64, message: String },

    /// A required column is absent from the dataset header.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The request cannot be answered for the given input, e.g. an empty
    /// date range or inverted range bounds.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No dataset file could be located.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// The persisted settings file could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// `true` for the empty-range / bad-argument kind.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, DashboardError::InvalidInput(_))
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
