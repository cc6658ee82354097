use std::path::PathBuf;

/// Errors that can occur while reading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Manifest content is not a valid literal expression.
    #[error("invalid literal at line {line}, column {column}: {message}")]
    Literal {
        line: usize,
        column: usize,
        message: String,
    },

    /// The literal parsed, but is not a manifest dictionary.
    #[error("invalid manifest at {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    /// Invalid Odoo series string.
    #[error("invalid Odoo version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Manifest file could not be read.
    #[error(transparent)]
    Fs(#[from] mqt_fs::Error),
}

impl Error {
    /// Attach the manifest path to a parse failure.
    pub(crate) fn in_file(self, path: PathBuf) -> Self {
        match self {
            Self::Literal {
                line,
                column,
                message,
            } => Self::InvalidManifest {
                path,
                reason: format!("line {line}, column {column}: {message}"),
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
