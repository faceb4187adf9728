//! Scanner error types.

use thiserror::Error;

/// Errors that can stop a repository scan.
///
/// Content problems (no README, malformed `package.json`) are never errors;
/// they produce empty fields in the report instead.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Filesystem failure outside the repository contents.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The git executable could not be started.
    #[error("git is not available ({program}): {reason}")]
    GitUnavailable {
        /// Program that was invoked.
        program: String,
        /// Why spawning failed.
        reason: String,
    },

    /// `git clone` ran but exited unsuccessfully.
    #[error("git clone of {url} failed ({status}): {stderr}")]
    GitFailed {
        /// Repository URL.
        url: String,
        /// Exit status as reported by the OS.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The directory to scan does not exist or is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// A blocking scan task panicked or was cancelled.
    #[error("scan task failed: {0}")]
    Task(String),

    /// Error from the core crate (project catalog, config).
    #[error(transparent)]
    Core(#[from] folio_core::FolioError),
}

impl From<tokio::task::JoinError> for ScanError {
    fn from(err: tokio::task::JoinError) -> Self {
        ScanError::Task(err.to_string())
    }
}

/// Convenience alias for scanner results.
pub type Result<T> = std::result::Result<T, ScanError>;
