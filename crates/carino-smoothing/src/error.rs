//! Error types for the smoothing engine.

use thiserror::Error;

/// Result type for smoothing operations.
pub type Result<T> = std::result::Result<T, SmoothingError>;

/// Errors that can occur while configuring the smoothing engine.
///
/// Both variants are configuration errors raised before any computation;
/// numeric undefined conditions during smoothing never error and propagate
/// as missing cells instead.
#[derive(Debug, Error)]
pub enum SmoothingError {
    /// The period selection string is not one of "", "Q", "Y", "I"
    #[error("invalid period selection {0:?}, expected one of \"\", \"Q\", \"Y\", \"I\"")]
    InvalidPeriodSelection(String),

    /// The factor selection string is not in the closed factor list
    #[error("invalid factor selection {0:?}")]
    InvalidFactorSelection(String),
}
