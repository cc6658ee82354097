//! Filesystem layer for the maintainer quality tools
//!
//! Provides normalized path handling, the addon marker constants and
//! read-only helpers for listing directories and loading config files.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigFormat, ConfigStore};
pub use constants::{DEFAULT_EXCLUDED_DIRS, HIDDEN_PREFIX, INIT_MARKER, ManifestFile};
pub use error::{Error, Result};
pub use path::NormalizedPath;
