//! Error types for backup operations

use thiserror::Error;

/// Core error type for backup operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// Missing or invalid command-line arguments
    #[error("{0}")]
    Argument(String),

    /// Service lookup failed or the service is not a MariaDB instance
    #[error("{0}")]
    Lookup(String),

    /// The host CLI failed to execute a request
    #[error("Request failed: {0}")]
    Transport(String),

    /// A response body was not valid JSON for the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The API answered but the answer does not describe a success
    #[error("{0}")]
    Business(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for backup operations
pub type Result<T> = std::result::Result<T, BackupError>;

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        BackupError::Decode(err.to_string())
    }
}
