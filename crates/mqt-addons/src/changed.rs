//! Modules touched by a diff.

use std::collections::BTreeSet;

use mqt_fs::NormalizedPath;
use mqt_git::{FetchRef, GitRun, SourceControl};

use crate::error::Result;
use crate::walker::AddonsWalker;

/// Reference meaning "the current checkout"; it is never fetched.
pub const HEAD: &str = "HEAD";

/// Paths of the modules under `repo_path` changed relative to `reference`.
///
/// Opens the git checkout at `repo_path`. See [`modules_changed_with`].
pub fn get_modules_changed(
    repo_path: &NormalizedPath,
    reference: &str,
) -> Result<Vec<NormalizedPath>> {
    let git = GitRun::new(repo_path.clone())?;
    modules_changed_with(&git, repo_path, reference)
}

/// Paths of the modules under `repo_path` changed relative to `reference`,
/// using `scm` for fetching and diffing.
///
/// Any reference other than [`HEAD`] is fetched first. A module counts as
/// changed when any file below it, at any depth, differs.
pub fn modules_changed_with<S: SourceControl>(
    scm: &S,
    repo_path: &NormalizedPath,
    reference: &str,
) -> Result<Vec<NormalizedPath>> {
    let diff_target = if reference == HEAD {
        HEAD.to_string()
    } else {
        scm.fetch(reference)?;
        FetchRef::parse(reference).diff_target
    };

    let items = scm.get_items_changed(&diff_target)?;
    let root = repo_path.trim_trailing_separator();

    let mut folders: BTreeSet<NormalizedPath> = BTreeSet::new();
    for item in &items {
        let segments: Vec<&str> = item.split('/').collect();
        let mut folder = root.clone();
        for segment in &segments[..segments.len().saturating_sub(1)] {
            folder = folder.join(segment);
            folders.insert(folder.clone());
        }
    }

    let modules: BTreeSet<NormalizedPath> = AddonsWalker::new()
        .recursive(true)
        .module_paths(&root)
        .into_iter()
        .collect();

    let changed: Vec<NormalizedPath> = modules.intersection(&folders).cloned().collect();
    tracing::debug!(
        reference = reference,
        items = items.len(),
        modules = changed.len(),
        "Computed changed modules"
    );
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mqt_test_utils::AddonTree;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Canned answers instead of a repository.
    #[derive(Default)]
    struct FakeScm {
        items: Vec<String>,
        fetched: RefCell<Vec<String>>,
        diffed: RefCell<Vec<String>>,
    }

    impl SourceControl for FakeScm {
        fn run(&self, _args: &[&str]) -> mqt_git::Result<Option<String>> {
            Ok(None)
        }

        fn get_items_changed(&self, base_ref: &str) -> mqt_git::Result<Vec<String>> {
            self.diffed.borrow_mut().push(base_ref.to_string());
            Ok(self.items.clone())
        }

        fn get_branch_name(&self) -> mqt_git::Result<Option<String>> {
            Ok(None)
        }

        fn fetch(&self, reference: &str) -> mqt_git::Result<()> {
            self.fetched.borrow_mut().push(reference.to_string());
            Ok(())
        }
    }

    fn tree() -> AddonTree {
        let tree = AddonTree::new();
        tree.module("sale_x", &[])
            .module("stock_x", &[])
            .module("project/addons/hr_x", &[]);
        tree
    }

    #[test]
    fn test_head_is_not_fetched() {
        let tree = tree();
        let scm = FakeScm {
            items: vec!["sale_x/models/sale.py".into(), "README.md".into()],
            ..Default::default()
        };

        let changed = modules_changed_with(&scm, &tree.root(), HEAD).unwrap();

        assert_eq!(changed, vec![tree.at("sale_x")]);
        assert!(scm.fetched.borrow().is_empty());
        assert_eq!(*scm.diffed.borrow(), vec!["HEAD"]);
    }

    #[test]
    fn test_remote_reference_is_fetched_then_diffed() {
        let tree = tree();
        let scm = FakeScm {
            items: vec![
                "project/addons/hr_x/views/hr.xml".into(),
                "stock_x/__manifest__.py".into(),
            ],
            ..Default::default()
        };

        let changed = modules_changed_with(&scm, &tree.root(), "origin/12.0").unwrap();

        assert_eq!(
            changed,
            vec![tree.at("project/addons/hr_x"), tree.at("stock_x")]
        );
        assert_eq!(*scm.fetched.borrow(), vec!["origin/12.0"]);
        assert_eq!(*scm.diffed.borrow(), vec!["origin/12.0"]);
    }

    #[test]
    fn test_top_level_files_match_nothing() {
        let tree = tree();
        let scm = FakeScm {
            items: vec!["setup.py".into(), "sale_x".into()],
            ..Default::default()
        };

        let changed = modules_changed_with(&scm, &tree.root(), HEAD).unwrap();
        assert!(changed.is_empty());
    }
}
