//! Error types for mqt-addons

/// Result type for mqt-addons operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while discovering or resolving modules
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] mqt_fs::Error),

    #[error(transparent)]
    Manifest(#[from] mqt_manifest::Error),

    #[error(transparent)]
    Git(#[from] mqt_git::Error),

    /// The `depends` graph loops back on itself.
    #[error("cyclic dependency: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },
}
