//! Error types for opening-hours processing.

use thiserror::Error;

/// Errors that can occur while decoding opening hours.
#[derive(Debug, Error)]
pub enum HoursError {
    /// The rule engine could not compile the input string.
    #[error("unparsable opening hours {input:?}: {source}")]
    UnparsableInput {
        /// The rejected input.
        input: String,
        /// Why the rule engine rejected it.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for opening-hours operations.
pub type Result<T> = std::result::Result<T, HoursError>;
