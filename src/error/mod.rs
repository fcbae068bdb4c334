//! Error handling for the preprocessing pipeline.
//!
//! Structural and configuration problems are fatal and abort a run. Row-level
//! data-quality problems never surface here: they are routed to sentinel
//! buckets or counted by the cleaner.

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use std::io;

/// Specialized error type for the preprocessing pipeline
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    /// Required columns are absent, or the output schema is malformed
    #[error("Schema error: {message}")]
    Schema {
        /// Offending column names
        columns: Vec<String>,
        /// Human-readable description
        message: String,
    },

    /// The input dataset has zero records
    #[error("Input dataset is empty")]
    EmptyInput,

    /// A tunable is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A status value has no entry in the label mapping
    #[error("Unknown status '{value}' in column '{column}' at row {row}")]
    UnknownStatus {
        /// Status column name
        column: String,
        /// The unmapped value (`<null>` for missing statuses)
        value: String,
        /// Row index in the labeler's input
        row: usize,
    },

    /// A column exists but holds an array type the stage cannot read
    #[error("Column '{column}' has type {actual}, expected {expected}")]
    InvalidDataType {
        /// Column name
        column: String,
        /// Expected type description
        expected: String,
        /// Actual Arrow data type
        actual: String,
    },

    /// Arrow compute or construction error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Parquet write error
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl PreprocessError {
    /// Schema error for a set of missing columns
    #[must_use]
    pub fn missing_columns(columns: Vec<String>) -> Self {
        let message = format!("Missing required columns: {columns:?}");
        Self::Schema { columns, message }
    }

    /// Schema error attached to a single column
    pub fn schema(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            columns: vec![column.into()],
            message: message.into(),
        }
    }

    /// Configuration error with a formatted message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether this error came from the configuration rather than the data
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Result type for preprocessing operations
pub type Result<T> = std::result::Result<T, PreprocessError>;
