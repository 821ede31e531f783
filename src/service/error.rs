//! Error types for interest operations.

use thiserror::Error;

/// Errors that can occur during interest operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InterestError {
    /// No interest matches the given app name or service IP.
    #[error("Interest not found: {0}")]
    NotFound(String),

    /// An interest with the same app name already exists.
    #[error("Interest already exists: {0}")]
    AlreadyExists(String),

    /// The interest data provided is invalid.
    #[error("Interest validation error: {0}")]
    Validation(String),

    /// The underlying store failed.
    #[error("Interest storage error: {0}")]
    Storage(String),
}
