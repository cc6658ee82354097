//! Module classification.
//!
//! A directory is an Odoo module when it carries the package marker
//! (`__init__.py`) and a recognized manifest file. When several manifest
//! names coexist the first one in [`ManifestFile::ALL`] order is used.

use mqt_fs::{INIT_MARKER, ManifestFile, NormalizedPath, io};
use mqt_manifest::Manifest;

/// Return the manifest path if `path` is a module directory.
pub fn is_module(path: &NormalizedPath) -> Option<NormalizedPath> {
    if !path.is_dir() {
        return None;
    }

    let names = match io::list_dir(path) {
        Ok(names) => names,
        Err(e) => {
            tracing::debug!(path = %path, error = %e, "Cannot list candidate module");
            return None;
        }
    };

    if !names.iter().any(|n| n == INIT_MARKER) {
        return None;
    }

    let mut manifests = ManifestFile::ALL
        .into_iter()
        .filter(|m| names.iter().any(|n| n == m.as_str()));
    let chosen = manifests.next()?;
    if let Some(ignored) = manifests.next() {
        tracing::debug!(
            path = %path,
            chosen = %chosen,
            ignored = %ignored,
            "Several manifest files found"
        );
    }

    Some(path.trim_trailing_separator().join(chosen.as_str()))
}

/// Return the manifest path if `path` is a module whose manifest does not set
/// `installable` to false.
///
/// A module whose manifest cannot be read is reported and treated as not
/// installable.
pub fn is_installable_module(path: &NormalizedPath) -> Option<NormalizedPath> {
    let manifest_path = is_module(path)?;
    match Manifest::load(&manifest_path) {
        Ok(manifest) if manifest.installable => Some(manifest_path),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(
                path = %manifest_path,
                error = %e,
                "Skipping module with unusable manifest"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mqt_test_utils::AddonTree;

    #[test]
    fn test_module_with_current_manifest() {
        let tree = AddonTree::new();
        tree.module("sale_x", &["sale"]);

        let manifest = is_module(&tree.at("sale_x")).unwrap();
        assert_eq!(manifest, tree.at("sale_x/__manifest__.py"));
    }

    #[test]
    fn test_legacy_manifest_names() {
        let tree = AddonTree::new();
        for (dir, name) in [
            ("a", "__openerp__.py"),
            ("b", "__terp__.py"),
            ("c", "__odoo__.py"),
        ] {
            tree.module_with_manifest(dir, name, "{'name': 'x'}");
            assert_eq!(is_module(&tree.at(dir)), Some(tree.at(dir).join(name)));
        }
    }

    #[test]
    fn test_priority_when_several_manifests() {
        let tree = AddonTree::new();
        tree.module_with_manifest("m", "__openerp__.py", "{'name': 'old'}")
            .file("m/__manifest__.py", "{'name': 'new'}")
            .file("m/__terp__.py", "{'name': 'older'}");

        assert_eq!(is_module(&tree.at("m")), Some(tree.at("m/__manifest__.py")));
    }

    #[test]
    fn test_missing_init_marker() {
        let tree = AddonTree::new();
        tree.file("m/__manifest__.py", "{'name': 'x'}");
        assert_eq!(is_module(&tree.at("m")), None);
    }

    #[test]
    fn test_missing_manifest() {
        let tree = AddonTree::new();
        tree.package("pkg");
        assert_eq!(is_module(&tree.at("pkg")), None);
    }

    #[test]
    fn test_file_and_missing_path_are_not_modules() {
        let tree = AddonTree::new();
        tree.file("setup.py", "");
        assert_eq!(is_module(&tree.at("setup.py")), None);
        assert_eq!(is_module(&tree.at("nowhere")), None);
    }

    #[test]
    fn test_trailing_slash() {
        let tree = AddonTree::new();
        tree.module("m", &[]);
        let with_slash = NormalizedPath::new(format!("{}/", tree.at("m")));
        assert_eq!(is_module(&with_slash), Some(tree.at("m/__manifest__.py")));
    }

    #[test]
    fn test_installable_flag() {
        let tree = AddonTree::new();
        tree.module("yes", &[])
            .uninstallable_module("no")
            .module_with_manifest("absent", "__manifest__.py", "{'name': 'absent'}");

        assert!(is_installable_module(&tree.at("yes")).is_some());
        assert!(is_installable_module(&tree.at("absent")).is_some());
        assert!(is_installable_module(&tree.at("no")).is_none());
        assert!(is_module(&tree.at("no")).is_some());
    }

    #[test]
    fn test_broken_manifest_is_not_installable() {
        let tree = AddonTree::new();
        tree.module_with_manifest("broken", "__manifest__.py", "{'name': ");
        assert!(is_module(&tree.at("broken")).is_some());
        assert!(is_installable_module(&tree.at("broken")).is_none());
    }
}
