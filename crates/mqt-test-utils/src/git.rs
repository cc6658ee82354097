//! Git repository fixtures.
//!
//! Everything goes through `git2` with an explicit signature, so the fixtures
//! work on machines without a configured git identity.

use std::path::Path;

use git2::{IndexAddOption, Oid, Repository, Signature};

/// Initialise a git repository with no commits.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn init_repo(path: &Path) -> Repository {
    Repository::init(path).unwrap_or_else(|e| {
        panic!("init_repo: failed to init repository at {}: {e}", path.display())
    })
}

/// Stage every file in the working tree and commit it on HEAD.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_all(repo: &Repository, message: &str) -> Oid {
    let sig = Signature::now("Test User", "test@example.com")
        .unwrap_or_else(|e| panic!("commit_all: failed to build signature: {e}"));

    let mut index = repo
        .index()
        .unwrap_or_else(|e| panic!("commit_all: failed to open index: {e}"));
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap_or_else(|e| panic!("commit_all: failed to stage files: {e}"));
    index
        .write()
        .unwrap_or_else(|e| panic!("commit_all: failed to write index: {e}"));
    let tree_id = index
        .write_tree()
        .unwrap_or_else(|e| panic!("commit_all: failed to write tree: {e}"));
    let tree = repo
        .find_tree(tree_id)
        .unwrap_or_else(|e| panic!("commit_all: failed to find tree: {e}"));

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap_or_else(|e| panic!("commit_all: failed to commit: {e}"))
}

/// Create a lightweight branch named `name` at the current HEAD commit.
///
/// # Panics
/// Panics if HEAD has no commit or the branch cannot be created.
pub fn branch_here(repo: &Repository, name: &str) {
    let head = repo
        .head()
        .and_then(|h| h.peel_to_commit())
        .unwrap_or_else(|e| panic!("branch_here: HEAD has no commit: {e}"));
    repo.branch(name, &head, true)
        .unwrap_or_else(|e| panic!("branch_here: failed to create {name}: {e}"));
}
