//! Error types for shev.

use thiserror::Error;

/// Errors that can occur in shev operations.
#[derive(Error, Debug)]
pub enum ShevError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Geocoding error: {0}")]
    Geocode(String),

    #[error("Timezone lookup error: {0}")]
    Timezone(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Event already exists: {0}")]
    DuplicateId(String),

    #[error("Event {0} has no valid start or end time")]
    InvalidTimestamp(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ShevError {
    fn from(err: serde_json::Error) -> Self {
        ShevError::Serialization(err.to_string())
    }
}

/// Result type alias for shev operations.
pub type ShevResult<T> = Result<T, ShevError>;
