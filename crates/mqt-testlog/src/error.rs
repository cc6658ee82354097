//! Error types for mqt-testlog

/// Result type for mqt-testlog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or classifying a log
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] mqt_fs::Error),

    #[error("Invalid log pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
