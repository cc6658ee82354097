//! Errors reported by the `mqt` binary

pub type Result<T> = std::result::Result<T, CliError>;

/// Anything that ends a command with `error: ...` and exit status 1.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] mqt_core::Error),

    #[error(transparent)]
    Addons(#[from] mqt_addons::Error),

    #[error(transparent)]
    Manifest(#[from] mqt_manifest::Error),

    #[error(transparent)]
    Git(#[from] mqt_git::Error),

    #[error(transparent)]
    TestLog(#[from] mqt_testlog::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Bad invocation not caught by argument parsing.
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }
}
