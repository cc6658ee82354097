//! Addon-tree walking.
//!
//! Children are always visited in sorted name order, so results do not
//! depend on the filesystem's listing order.

use mqt_fs::{DEFAULT_EXCLUDED_DIRS, INIT_MARKER, NormalizedPath, io};

use crate::classifier::{is_installable_module, is_module};

/// Walks directories looking for modules.
#[derive(Debug, Clone)]
pub struct AddonsWalker {
    excluded_dirs: Vec<String>,
    recursive: bool,
}

impl Default for AddonsWalker {
    fn default() -> Self {
        Self {
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            recursive: false,
        }
    }
}

impl AddonsWalker {
    /// Walker excluding the default directory names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the excluded directory names.
    pub fn with_excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Also look for modules inside child directories that are not modules
    /// themselves (e.g. a project repository grouping several addons
    /// folders).
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// A directory that is neither hidden nor excluded.
    pub fn is_included_dir(&self, path: &NormalizedPath) -> bool {
        if !path.is_dir() || path.is_hidden() {
            return false;
        }
        match path.file_name() {
            Some(name) => !self.excluded_dirs.iter().any(|d| d == name),
            None => true,
        }
    }

    /// Names of the installable modules found below `path`.
    pub fn modules(&self, path: &NormalizedPath) -> Vec<String> {
        self.collect(path)
            .into_iter()
            .filter_map(|p| p.file_name().map(str::to_string))
            .collect()
    }

    /// Paths of the installable modules found below `path`.
    pub fn module_paths(&self, path: &NormalizedPath) -> Vec<NormalizedPath> {
        self.collect(path)
    }

    fn collect(&self, path: &NormalizedPath) -> Vec<NormalizedPath> {
        let mut found = Vec::new();
        self.collect_into(&path.trim_trailing_separator(), &mut found);
        found
    }

    fn collect_into(&self, path: &NormalizedPath, found: &mut Vec<NormalizedPath>) {
        if !path.is_dir() {
            return;
        }
        let children = match io::list_children(path) {
            Ok(children) => children,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Cannot list addons directory");
                return;
            }
        };

        for child in children {
            if !self.is_included_dir(&child) {
                continue;
            }
            if is_installable_module(&child).is_some() {
                found.push(child);
            } else if self.recursive && is_module(&child).is_none() {
                self.collect_into(&child, found);
            }
        }
    }

    /// Whether `path` directly holds at least one installable module.
    pub fn is_addons(&self, path: &NormalizedPath) -> bool {
        let path = path.trim_trailing_separator();
        let Ok(children) = io::list_children(&path) else {
            return false;
        };
        children
            .iter()
            .any(|child| self.is_included_dir(child) && is_installable_module(child).is_some())
    }

    /// Addons roots at or directly below `path`.
    ///
    /// A missing path yields nothing.
    pub fn addons(&self, path: &NormalizedPath) -> Vec<NormalizedPath> {
        let path = path.trim_trailing_separator();
        if !path.exists() {
            tracing::debug!(path = %path, "Addons path does not exist");
            return Vec::new();
        }
        if self.is_addons(&path) {
            return vec![path];
        }
        match io::list_children(&path) {
            Ok(children) => children
                .into_iter()
                .filter(|child| self.is_included_dir(child) && self.is_addons(child))
                .collect(),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Cannot list addons directory");
                Vec::new()
            }
        }
    }

    /// Importable python packages below `paths`, for static analysis.
    ///
    /// A directory with an init marker is a target unless it is a module
    /// that is not installable; a directory without one is searched
    /// recursively. Plain packages that are not modules are targets too.
    pub fn subpaths(&self, paths: &[NormalizedPath]) -> Vec<NormalizedPath> {
        let mut found = Vec::new();
        for path in paths {
            let path = path.trim_trailing_separator();
            if path.is_dir() {
                self.subpaths_into(&path, &mut found);
            }
        }
        found
    }

    /// Only children are checked against the hidden and excluded names, so
    /// an input such as `.` is always walked.
    fn subpaths_into(&self, path: &NormalizedPath, found: &mut Vec<NormalizedPath>) {
        if path.join(INIT_MARKER).is_file() {
            if is_module(path).is_none() || is_installable_module(path).is_some() {
                found.push(path.clone());
            }
            return;
        }

        match io::list_children(path) {
            Ok(children) => {
                for child in children.iter().filter(|child| self.is_included_dir(child)) {
                    self.subpaths_into(child, found);
                }
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Cannot list directory");
            }
        }
    }
}

/// Names of the installable modules directly inside `path`.
pub fn get_modules(path: &NormalizedPath) -> Vec<String> {
    AddonsWalker::new().modules(path)
}

/// Paths of the installable modules directly inside `path`.
pub fn get_module_paths(path: &NormalizedPath) -> Vec<NormalizedPath> {
    AddonsWalker::new().module_paths(path)
}

/// Addons roots at or directly below `path`.
pub fn get_addons(path: &NormalizedPath) -> Vec<NormalizedPath> {
    AddonsWalker::new().addons(path)
}

/// Lint targets below `paths`.
pub fn get_subpaths(paths: &[NormalizedPath]) -> Vec<NormalizedPath> {
    AddonsWalker::new().subpaths(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mqt_test_utils::AddonTree;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_included_dir() {
        let tree = AddonTree::new();
        tree.dir("odoo").dir("config").dir(".git").dir("sale");
        tree.file("README.md", "");
        let walker = AddonsWalker::new();

        assert!(walker.is_included_dir(&tree.at("sale")));
        assert!(!walker.is_included_dir(&tree.at("odoo")));
        assert!(!walker.is_included_dir(&tree.at("config")));
        assert!(!walker.is_included_dir(&tree.at(".git")));
        assert!(!walker.is_included_dir(&tree.at("README.md")));
    }

    #[test]
    fn test_custom_exclusions() {
        let tree = AddonTree::new();
        tree.module("sale_x", &[]).module("odoo", &[]);
        let walker = AddonsWalker::new().with_excluded_dirs(["sale_x"]);

        assert_eq!(walker.modules(&tree.root()), vec!["odoo"]);
    }

    #[test]
    fn test_recursive_walk() {
        let tree = AddonTree::new();
        tree.module("top", &[])
            .module("group/nested", &[])
            .module("top/inner", &[]);

        let flat = AddonsWalker::new();
        let deep = AddonsWalker::new().recursive(true);

        assert_eq!(flat.modules(&tree.root()), vec!["top"]);
        // modules are never searched for nested modules
        assert_eq!(deep.modules(&tree.root()), vec!["nested", "top"]);
    }

    #[test]
    fn test_recursive_skips_inside_uninstallable_module() {
        let tree = AddonTree::new();
        tree.uninstallable_module("old").module("old/inner", &[]);

        let deep = AddonsWalker::new().recursive(true);
        assert!(deep.modules(&tree.root()).is_empty());
    }
}
