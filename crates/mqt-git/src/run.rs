//! Git implementation of [`SourceControl`]

use std::process::Command;

use git2::{DiffOptions, Repository};
use mqt_fs::NormalizedPath;

use crate::{Error, FetchRef, Result, SourceControl};

/// Git access for a repository checkout.
///
/// Diffing, branch lookup and fetching go through `git2`; [`GitRun::run`]
/// shells out to the `git` binary for anything else.
pub struct GitRun {
    root: NormalizedPath,
    git_dir: NormalizedPath,
}

impl GitRun {
    /// Create a GitRun for the checkout at `root`.
    pub fn new(root: NormalizedPath) -> Result<Self> {
        let root = root.trim_trailing_separator();
        let git_dir = root.join(".git");
        if !git_dir.exists() {
            return Err(Error::NotARepository {
                path: root.to_native(),
            });
        }
        Ok(Self { root, git_dir })
    }

    /// The checkout root.
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    fn open(&self) -> Result<Repository> {
        Ok(Repository::open(self.root.to_native())?)
    }
}

impl SourceControl for GitRun {
    fn run(&self, args: &[&str]) -> Result<Option<String>> {
        let output = Command::new("git")
            .arg(format!("--git-dir={}", self.git_dir))
            .args(args)
            .current_dir(self.root.to_native())
            .output()
            .map_err(Error::Spawn)?;

        if !output.status.success() {
            tracing::debug!(
                args = ?args,
                code = output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git command failed"
            );
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(Some(stdout.trim_end_matches('\n').to_string()))
    }

    fn get_items_changed(&self, base_ref: &str) -> Result<Vec<String>> {
        let repo = self.open()?;
        let base_tree = repo
            .revparse_single(base_ref)
            .map_err(|_| Error::RevisionNotFound {
                reference: base_ref.to_string(),
            })?
            .peel_to_tree()?;

        let mut opts = DiffOptions::new();
        opts.include_typechange(true);
        let diff = repo.diff_tree_to_workdir_with_index(Some(&base_tree), Some(&mut opts))?;

        let mut items: Vec<String> = Vec::new();
        for delta in diff.deltas() {
            for file in [delta.new_file(), delta.old_file()] {
                if let Some(path) = file.path() {
                    let item = NormalizedPath::new(path).as_str().to_string();
                    if !items.contains(&item) {
                        items.push(item);
                    }
                }
            }
        }

        tracing::debug!(base = base_ref, count = items.len(), "Collected changed items");
        Ok(items)
    }

    fn get_branch_name(&self) -> Result<Option<String>> {
        let repo = self.open()?;
        let head = repo.head()?;

        if head.is_branch() {
            Ok(Some(head.shorthand().unwrap_or("HEAD").to_string()))
        } else {
            Ok(None)
        }
    }

    fn fetch(&self, reference: &str) -> Result<()> {
        let request = FetchRef::parse(reference);
        let repo = self.open()?;

        let mut remote = repo
            .find_remote(&request.remote)
            .map_err(|_| Error::RemoteNotFound {
                name: request.remote.clone(),
            })?;

        tracing::info!(remote = %request.remote, refspec = %request.refspec, "Fetching");

        remote
            .fetch(&[request.refspec.as_str()], None, None)
            .map_err(|e| Error::FetchFailed {
                reference: reference.to_string(),
                message: e.message().to_string(),
            })
    }
}
