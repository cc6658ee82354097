//! Error types for mqt-fs

use std::path::PathBuf;

use crate::config::ConfigFormat;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading a file or listing a directory failed.
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {format} in {}: {message}", path.display())]
    ConfigParse {
        path: PathBuf,
        format: ConfigFormat,
        message: String,
    },

    #[error("no configuration format for extension '{extension}'")]
    UnsupportedFormat { extension: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
