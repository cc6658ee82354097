//! Error types for mqt-git

use std::path::PathBuf;

/// Result type for mqt-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mqt-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("Revision '{reference}' not found")]
    RevisionNotFound { reference: String },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Fetch of '{reference}' failed: {message}")]
    FetchFailed { reference: String, message: String },

    #[error("Failed to run git: {0}")]
    Spawn(#[source] std::io::Error),
}
