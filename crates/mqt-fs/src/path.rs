//! Forward-slash paths.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::HIDDEN_PREFIX;

/// A path stored with forward slashes on every platform.
///
/// Git reports changed items with forward slashes, so module paths are kept
/// in the same form to make them comparable. Ordering is plain string order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    /// The absolute, symlink-free form of `path`, without Windows verbatim
    /// prefixes. A path that cannot be resolved is kept as given.
    pub fn canonical(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        dunce::canonicalize(path).map_or_else(|_| Self::new(path), Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// The path for `std::fs` calls.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Append `segment`, never doubling the separator.
    pub fn join(&self, segment: &str) -> Self {
        let base = self.inner.trim_end_matches('/');
        let segment = segment.replace('\\', "/");
        Self {
            inner: format!("{base}/{segment}"),
        }
    }

    /// Drop trailing separators so the basename is never empty.
    ///
    /// The root path `/` is kept as is.
    pub fn trim_trailing_separator(&self) -> Self {
        match self.inner.trim_end_matches('/') {
            "" => self.clone(),
            trimmed => Self {
                inner: trimmed.to_string(),
            },
        }
    }

    pub fn parent(&self) -> Option<Self> {
        let (head, _) = self.inner.trim_end_matches('/').rsplit_once('/')?;
        let inner = if head.is_empty() { "/" } else { head };
        Some(Self {
            inner: inner.to_string(),
        })
    }

    /// Last component, ignoring trailing separators.
    pub fn file_name(&self) -> Option<&str> {
        self.inner
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }

    /// Whether the basename starts with [`HIDDEN_PREFIX`], like `.git`.
    ///
    /// The `.` and `..` components are not hidden.
    pub fn is_hidden(&self) -> bool {
        self.file_name().is_some_and(|name| {
            name.starts_with(HIDDEN_PREFIX) && !matches!(name, "." | "..")
        })
    }

    /// Extension of the basename; dotfiles have none.
    pub fn extension(&self) -> Option<&str> {
        let (stem, ext) = self.file_name()?.rsplit_once('.')?;
        (!stem.is_empty()).then_some(ext)
    }

    pub fn exists(&self) -> bool {
        Path::new(&self.inner).exists()
    }

    pub fn is_dir(&self) -> bool {
        Path::new(&self.inner).is_dir()
    }

    pub fn is_file(&self) -> bool {
        Path::new(&self.inner).is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}
