//! Error types for the editor crate.

use thiserror::Error;

/// Editor errors.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Decoding error from the core crate.
    #[error("hours error: {0}")]
    Hours(#[from] hours_core::HoursError),

    /// A drawn span that does not have a positive length.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;
