//! Error types for mqt-core

use std::path::PathBuf;

/// Result type for mqt-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning or linting
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No Odoo series was configured
    #[error("No Odoo version configured")]
    MissingVersion,

    /// The Odoo repository is not of the form `org/repo`
    #[error("Invalid Odoo repository {repo:?}, expected <org>/<repo>")]
    InvalidOdooRepo { repo: String },

    /// An external program could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The linter rejected its own invocation
    #[error("{program} exited with code {code:?}: {stderr}")]
    ToolFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Lint configuration file is missing
    #[error("Lint configuration not found at {path}")]
    RcfileNotFound { path: PathBuf },

    // Transparent wrappers for underlying crate errors
    #[error(transparent)]
    Fs(#[from] mqt_fs::Error),

    #[error(transparent)]
    Manifest(#[from] mqt_manifest::Error),

    #[error(transparent)]
    Addons(#[from] mqt_addons::Error),

    #[error(transparent)]
    Git(#[from] mqt_git::Error),

    #[error(transparent)]
    TestLog(#[from] mqt_testlog::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
