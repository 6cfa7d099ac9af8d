use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the dashboard crates.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The dataset file does not exist.
    #[error("Dataset not found: {0}")]
    NotFound(PathBuf),

    /// A column the operation needs is absent from the dataset header.
    #[error("Missing column: {column}")]
    Schema { column: String },

    /// A timestamp or numeric cell could not be parsed.
    ///
    /// `row` is the 1-based data row in the source file (header excluded).
    #[error("Invalid value {value:?} in column {column} at row {row}")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    /// The CSV reader rejected the file (bad quoting, ragged rows, ...).
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// Shorthand for a [`DashboardError::Schema`] naming `column`.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
        }
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
