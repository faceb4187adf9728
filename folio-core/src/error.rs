//! Error types for the folio core library.

use thiserror::Error;

/// Top-level error type for all folio core operations.
#[derive(Error, Debug)]
pub enum FolioError {
    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No project with the given slug exists in the catalog.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// A prompt could not be recorded (empty text, unreadable source).
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        FolioError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for FolioError {
    fn from(err: config::ConfigError) -> Self {
        FolioError::Config(err.to_string())
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, FolioError>;
