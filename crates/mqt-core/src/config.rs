//! Run configuration
//!
//! Every knob of a CI run lives in [`MqtConfig`]. Missing keys take the
//! defaults documented on each field, so an empty file is a valid
//! configuration apart from `version`.
//!
//! ```toml
//! version = "12.0"
//! build_dir = "/home/ci/build/OCA/sale-workflow"
//! exclude = ["sale_x_demo"]
//!
//! [lint]
//! rcfile = "cfg/pylint.cfg"
//! pr_rcfile = "cfg/pylint_pr.cfg"
//! msgs_no_count = ["manifest-required-author"]
//! ```

use std::path::PathBuf;

use mqt_fs::{ConfigStore, NormalizedPath};
use mqt_manifest::OdooVersion;
use serde::{Deserialize, Serialize};

use crate::lint::PYLINT_ODOO;
use crate::{Error, Result};

/// Database the preinstalled modules are set up in.
pub const DEFAULT_TEMPLATE_DB: &str = "openerp_template";

/// Database the tests run in, copied from the template.
pub const DEFAULT_TEST_DB: &str = "openerp_test";

/// Repository the server is checked out from.
pub const DEFAULT_ODOO_REPO: &str = "odoo/odoo";

/// Configuration of a test or lint run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqtConfig {
    /// Directory holding the server checkout and `dependencies/`. Default `.`.
    pub home: PathBuf,
    /// Checkout of the repository under test. Default `.`.
    pub build_dir: PathBuf,
    /// Checkouts of dependency repositories. Default `<home>/dependencies`.
    pub dependencies_dir: Option<PathBuf>,
    /// `<org>/<repo>` of the server. Default [`DEFAULT_ODOO_REPO`].
    pub odoo_repo: String,
    /// Odoo series, e.g. `12.0`. Required.
    pub version: String,
    /// Modules to test instead of every module of the build dir.
    pub include: Vec<String>,
    /// Modules never tested.
    pub exclude: Vec<String>,
    /// Test each module in its own run.
    pub unit_test: bool,
    /// Extra arguments for the test command.
    pub options: Vec<String>,
    /// Extra arguments for install commands.
    pub install_options: Vec<String>,
    /// Extra arguments for the server in install commands.
    pub server_options: Vec<String>,
    /// Error count that still counts as success. Default 0.
    pub expected_errors: usize,
    /// Prefix server commands with `unbuffer` to keep colors. Default true.
    pub unbuffer: bool,
    /// Run the test command under `coverage run`. Default true.
    pub coverage: bool,
    /// Pass `--test-enable` to the server. Default true.
    pub test_enable: bool,
    /// Server data directory, passed as `--data-dir`. Default `~/data_dir`.
    pub data_dir: String,
    /// Default [`DEFAULT_TEMPLATE_DB`].
    pub template_db: String,
    /// Default [`DEFAULT_TEST_DB`].
    pub test_db: String,
    pub lint: LintConfig,
}

impl Default for MqtConfig {
    fn default() -> Self {
        Self {
            home: PathBuf::from("."),
            build_dir: PathBuf::from("."),
            dependencies_dir: None,
            odoo_repo: DEFAULT_ODOO_REPO.to_string(),
            version: String::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            unit_test: false,
            options: Vec::new(),
            install_options: Vec::new(),
            server_options: Vec::new(),
            expected_errors: 0,
            unbuffer: true,
            coverage: true,
            test_enable: true,
            data_dir: "~/data_dir".to_string(),
            template_db: DEFAULT_TEMPLATE_DB.to_string(),
            test_db: DEFAULT_TEST_DB.to_string(),
            lint: LintConfig::default(),
        }
    }
}

impl MqtConfig {
    /// Load a TOML, JSON or YAML configuration file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    /// The configured series, parsed.
    pub fn odoo_version(&self) -> Result<OdooVersion> {
        if self.version.trim().is_empty() {
            return Err(Error::MissingVersion);
        }
        Ok(OdooVersion::parse(&self.version)?)
    }

    pub fn home_dir(&self) -> NormalizedPath {
        NormalizedPath::new(&self.home)
    }

    pub fn build_dir(&self) -> NormalizedPath {
        NormalizedPath::new(&self.build_dir)
    }

    pub fn dependencies_dir(&self) -> NormalizedPath {
        match &self.dependencies_dir {
            Some(dir) => NormalizedPath::new(dir),
            None => self.home_dir().join("dependencies"),
        }
    }
}

/// Lint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// pylint configuration file.
    pub rcfile: Option<PathBuf>,
    /// Stricter configuration for the modules a pull request changes.
    pub pr_rcfile: Option<PathBuf>,
    /// pylint plugins to load. Default [`PYLINT_ODOO`].
    pub plugins: Vec<String>,
    /// Basenames of packages never linted.
    pub exclude: Vec<String>,
    /// Message symbols reported but not counted as failures.
    pub msgs_no_count: Vec<String>,
    /// Extra pylint arguments.
    pub extra_params: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            rcfile: None,
            pr_rcfile: None,
            plugins: vec![PYLINT_ODOO.to_string()],
            exclude: Vec::new(),
            msgs_no_count: Vec::new(),
            extra_params: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = from_json("{}");
        assert_eq!(config, MqtConfig::default());
        assert!(config.unbuffer);
        assert_eq!(config.template_db, "openerp_template");
    }

    #[test]
    fn test_missing_version() {
        let config = MqtConfig::default();
        assert!(matches!(config.odoo_version(), Err(Error::MissingVersion)));
    }

    #[test]
    fn test_dependencies_dir_defaults_below_home() {
        let config = MqtConfig {
            home: PathBuf::from("/home/ci"),
            ..Default::default()
        };
        assert_eq!(config.dependencies_dir().as_str(), "/home/ci/dependencies");

        let config = MqtConfig {
            dependencies_dir: Some(PathBuf::from("/deps")),
            ..config
        };
        assert_eq!(config.dependencies_dir().as_str(), "/deps");
    }

    fn from_json(content: &str) -> MqtConfig {
        serde_json::from_str(content).unwrap()
    }
}
