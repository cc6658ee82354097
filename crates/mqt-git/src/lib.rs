//! Source-control collaborator for the maintainer quality tools
//!
//! The addon tooling only needs a handful of git operations: the list of
//! items changed against a base ref, the current branch name, fetching a ref
//! and running an arbitrary git command. They are exposed through the
//! [`SourceControl`] trait so callers can be tested without a repository.

pub mod error;
pub mod fetch;
pub mod provider;
pub mod run;

pub use error::{Error, Result};
pub use fetch::FetchRef;
pub use provider::SourceControl;
pub use run::GitRun;
