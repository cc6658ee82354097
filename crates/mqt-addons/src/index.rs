//! Module descriptors loaded along an addons path.

use std::collections::BTreeMap;

use mqt_fs::{NormalizedPath, io};
use mqt_manifest::{AutoInstall, Manifest};

use crate::classifier::is_module;
use crate::walker::AddonsWalker;

/// A module found on disk together with its manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDescriptor {
    /// Directory name, which is the technical module name.
    pub name: String,
    /// Module directory.
    pub path: NormalizedPath,
    pub manifest: Manifest,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>, path: NormalizedPath, manifest: Manifest) -> Self {
        Self {
            name: name.into(),
            path,
            manifest,
        }
    }

    pub fn installable(&self) -> bool {
        self.manifest.installable
    }

    pub fn depends(&self) -> &[String] {
        &self.manifest.depends
    }

    pub fn application(&self) -> bool {
        self.manifest.application
    }

    pub fn auto_install(&self) -> &AutoInstall {
        &self.manifest.auto_install
    }
}

/// All modules reachable through an addons path, keyed by name.
///
/// Non-installable modules are kept so they can still be resolved as
/// dependency targets.
#[derive(Debug, Clone, Default)]
pub struct ModuleIndex {
    modules: BTreeMap<String, ModuleDescriptor>,
}

impl ModuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every module directly inside each addons root.
    ///
    /// Roots are scanned in order and the first module seen under a given
    /// name wins. Modules whose manifest cannot be parsed are skipped.
    pub fn from_addons_path(paths: &[NormalizedPath]) -> Self {
        let walker = AddonsWalker::new();
        let mut index = Self::new();

        for root in paths {
            let children = match io::list_children(root) {
                Ok(children) => children,
                Err(e) => {
                    tracing::debug!(path = %root, error = %e, "Skipping addons root");
                    continue;
                }
            };

            for child in children {
                if !walker.is_included_dir(&child) {
                    continue;
                }
                let Some(manifest_path) = is_module(&child) else {
                    continue;
                };
                let Some(name) = child.file_name().map(str::to_string) else {
                    continue;
                };
                if let Some(existing) = index.modules.get(&name) {
                    tracing::debug!(
                        module = %name,
                        kept = %existing.path,
                        shadowed = %child,
                        "Module shadowed by an earlier addons root"
                    );
                    continue;
                }
                match Manifest::load(&manifest_path) {
                    Ok(manifest) => index.insert(ModuleDescriptor::new(name, child, manifest)),
                    Err(e) => {
                        tracing::warn!(
                            path = %manifest_path,
                            error = %e,
                            "Skipping module with unusable manifest"
                        );
                    }
                }
            }
        }

        tracing::debug!(count = index.len(), "Indexed modules");
        index
    }

    /// Build an index from descriptors; later duplicates are ignored.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ModuleDescriptor>) -> Self {
        let mut index = Self::new();
        for descriptor in descriptors {
            if !index.contains(&descriptor.name) {
                index.insert(descriptor);
            }
        }
        index
    }

    fn insert(&mut self, descriptor: ModuleDescriptor) {
        self.modules.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Descriptors in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mqt_test_utils::AddonTree;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_root_wins() {
        let first = AddonTree::new();
        first.module("sale_x", &["sale"]);
        let second = AddonTree::new();
        second.module("sale_x", &["stock"]).module("other", &[]);

        let index = ModuleIndex::from_addons_path(&[first.root(), second.root()]);

        assert_eq!(index.len(), 2);
        let sale_x = index.get("sale_x").unwrap();
        assert_eq!(sale_x.depends(), ["sale".to_string()]);
        assert_eq!(sale_x.path, first.at("sale_x"));
    }

    #[test]
    fn test_keeps_uninstallable_and_skips_broken() {
        let tree = AddonTree::new();
        tree.uninstallable_module("old")
            .module_with_manifest("broken", "__manifest__.py", "{'name': ")
            .package("lib");

        let index = ModuleIndex::from_addons_path(&[tree.root()]);

        assert_eq!(index.names().collect::<Vec<_>>(), vec!["old"]);
        assert!(!index.get("old").unwrap().installable());
    }

    #[test]
    fn test_missing_root_is_ignored() {
        let tree = AddonTree::new();
        tree.module("a", &[]);

        let index = ModuleIndex::from_addons_path(&[tree.at("missing"), tree.root()]);
        assert!(index.contains("a"));
    }
}
