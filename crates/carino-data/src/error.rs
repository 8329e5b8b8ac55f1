//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading or pivoting returns data.
#[derive(Debug, Error)]
pub enum DataError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required field was empty or null in the input
    #[error("Missing value in column {column} at row {row}")]
    MissingField {
        /// Input column the value was expected in
        column: &'static str,
        /// Zero-based row index in the input
        row: usize,
    },

    /// A period label could not be parsed as an ISO date
    #[error("Invalid period date: {0:?}")]
    InvalidDate(String),
}
