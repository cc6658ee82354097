//! Filesystem markers that identify Odoo addons.

use std::path::Path;

/// The package marker every module directory must carry.
pub const INIT_MARKER: &str = "__init__.py";

/// Directory names skipped while walking addons trees.
///
/// `odoo` is the server's own source folder and `config` holds dependency
/// configuration for CI, neither contains addons under test.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["odoo", "config"];

/// Names starting with this prefix are hidden and never walked.
pub const HIDDEN_PREFIX: char = '.';

/// Recognized manifest filenames.
///
/// Variants are declared in lookup priority order: when a directory carries
/// more than one of these files, the earliest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestFile {
    /// `__manifest__.py`, used since Odoo 10.0
    Manifest,
    /// `__odoo__.py`
    Odoo,
    /// `__openerp__.py`, the OpenERP era name
    Openerp,
    /// `__terp__.py`, the oldest TinyERP name
    Terp,
}

impl ManifestFile {
    /// All manifest filenames in priority order.
    pub const ALL: [ManifestFile; 4] = [Self::Manifest, Self::Odoo, Self::Openerp, Self::Terp];

    /// Get the filename.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "__manifest__.py",
            Self::Odoo => "__odoo__.py",
            Self::Openerp => "__openerp__.py",
            Self::Terp => "__terp__.py",
        }
    }

    /// Look up a filename, returning `None` for anything that is not a
    /// manifest.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl AsRef<Path> for ManifestFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ManifestFile {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ManifestFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order_starts_with_current_name() {
        assert_eq!(ManifestFile::ALL[0].as_str(), "__manifest__.py");
        assert_eq!(ManifestFile::ALL[3].as_str(), "__terp__.py");
    }

    #[test]
    fn test_from_file_name() {
        assert_eq!(
            ManifestFile::from_file_name("__openerp__.py"),
            Some(ManifestFile::Openerp)
        );
        assert_eq!(ManifestFile::from_file_name("__init__.py"), None);
        assert_eq!(ManifestFile::from_file_name("setup.py"), None);
    }
}
