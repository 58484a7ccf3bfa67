//! Error types for chamber.

use thiserror::Error;

/// Result type for chamber operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for chamber operations.
///
/// Only boundary failures surface here: a snapshot that cannot be read or
/// does not validate, a date that does not parse, a transcript with no
/// segments. Ambiguous or unresolvable input never produces an `Err`; it
/// is resolved deterministically and flagged, or returned as an
/// unresolved result with confidence 0.0 and logged.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Registry snapshot failed to load or validate.
    #[error("Registry snapshot error: {0}")]
    Snapshot(String),

    /// A date string could not be parsed (ISO 8601 expected).
    #[error("Date parse error: {0}")]
    DateParse(String),

    /// Invalid input provided at a component boundary.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error (snapshot load, log/index export).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl Error {
    /// Create a snapshot error.
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Error::Snapshot(msg.into())
    }

    /// Create a date parse error.
    pub fn date_parse(msg: impl Into<String>) -> Self {
        Error::DateParse(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
