//! Error types for the finger counting and emotion library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File or stream I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A landmark frame could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The external landmark provider failed or misbehaved
    #[error("Landmark provider error: {0}")]
    Provider(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
