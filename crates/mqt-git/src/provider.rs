//! Source-control trait consumed by the addon tooling

use crate::Result;

/// The git operations the addon tooling depends on.
pub trait SourceControl {
    /// Run a git command and return its trimmed standard output.
    ///
    /// A command that runs but exits unsuccessfully yields `Ok(None)`; only
    /// a failure to launch git is an error.
    fn run(&self, args: &[&str]) -> Result<Option<String>>;

    /// Paths, relative to the repository root and `/` separated, of every
    /// item that differs between `base_ref` and the working tree.
    fn get_items_changed(&self, base_ref: &str) -> Result<Vec<String>>;

    /// The checked out branch, or `None` when HEAD is detached.
    fn get_branch_name(&self) -> Result<Option<String>>;

    /// Fetch `reference` (`remote/branch`, `branch` or a `src:dst` refspec)
    /// so that it can be diffed against.
    ///
    /// Failures are errors; a failed fetch must never look like an empty
    /// diff.
    fn fetch(&self, reference: &str) -> Result<()>;
}
