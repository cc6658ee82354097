//! [`AddonTree`] builder for addon directory layouts.

use std::fs;
use std::path::Path;

use mqt_fs::NormalizedPath;
use tempfile::TempDir;

/// A temporary directory populated with Odoo modules and plain packages.
///
/// Paths passed to the builder methods are relative to the root and use `/`.
pub struct AddonTree {
    dir: TempDir,
}

impl Default for AddonTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AddonTree {
    /// Create an empty tree.
    ///
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("AddonTree: failed to create temp dir"),
        }
    }

    /// The root directory on disk.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The root directory as a [`NormalizedPath`].
    pub fn root(&self) -> NormalizedPath {
        NormalizedPath::new(self.dir.path())
    }

    /// A path below the root.
    pub fn at(&self, rel: &str) -> NormalizedPath {
        self.root().join(rel)
    }

    /// Add an installable module depending on `depends`.
    pub fn module(&self, rel: &str, depends: &[&str]) -> &Self {
        let depends = depends
            .iter()
            .map(|d| format!("'{d}'"))
            .collect::<Vec<_>>()
            .join(", ");
        self.module_with_manifest(
            rel,
            "__manifest__.py",
            &format!("{{'name': '{rel}', 'depends': [{depends}], 'installable': True}}"),
        )
    }

    /// Add a module whose manifest sets `installable` to false.
    pub fn uninstallable_module(&self, rel: &str) -> &Self {
        self.module_with_manifest(
            rel,
            "__manifest__.py",
            &format!("{{'name': '{rel}', 'installable': False}}"),
        )
    }

    /// Add a module with an explicit manifest filename and content.
    pub fn module_with_manifest(&self, rel: &str, manifest_name: &str, content: &str) -> &Self {
        self.file(&format!("{rel}/__init__.py"), "");
        self.file(&format!("{rel}/{manifest_name}"), content)
    }

    /// Add a plain python package (init marker, no manifest).
    pub fn package(&self, rel: &str) -> &Self {
        self.file(&format!("{rel}/__init__.py"), "")
    }

    /// Add an empty directory.
    ///
    /// # Panics
    /// Panics if the directory cannot be created.
    pub fn dir(&self, rel: &str) -> &Self {
        fs::create_dir_all(self.dir.path().join(rel))
            .unwrap_or_else(|e| panic!("AddonTree: failed to create {rel}: {e}"));
        self
    }

    /// Write a file, creating parent directories.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn file(&self, rel: &str, content: &str) -> &Self {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("AddonTree: failed to create {}: {e}", parent.display())
            });
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("AddonTree: failed to write {rel}: {e}"));
        self
    }
}
