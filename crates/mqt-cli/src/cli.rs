//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Maintainer quality tools - CI helpers for Odoo module repositories
#[derive(Parser, Debug)]
#[command(name = "mqt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List addons paths, or module names with -m
    ///
    /// Output is comma separated, ready for the server's --addons-path or
    /// --init options.
    ///
    /// Examples:
    ///   mqt get-addons ~/build/OCA/sale-workflow
    ///   mqt get-addons -m -e sale_x_demo ~/build/OCA/sale-workflow
    GetAddons {
        /// List module names instead of addons paths
        #[arg(short = 'm')]
        modules: bool,

        /// Comma separated names to leave out
        #[arg(short = 'e', value_delimiter = ',')]
        exclude: Vec<String>,

        /// Directories to search
        paths: Vec<PathBuf>,
    },

    /// List the modules changed relative to a reference
    Changed {
        /// Branch, remote/branch, refspec or HEAD
        #[arg(long = "ref", default_value = "HEAD")]
        reference: String,

        /// Repository checkout
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show the dependency closure of a module
    Deps {
        /// Module name
        name: String,

        /// Show the modules depending on it instead
        #[arg(long)]
        reverse: bool,

        /// Comma separated addons roots, searched in order
        #[arg(long, value_delimiter = ',', required = true)]
        addons_path: Vec<PathBuf>,
    },

    /// List the modules to install before testing MODULES
    TestDeps {
        /// Comma separated addons roots, searched in order
        #[arg(long, value_delimiter = ',', required = true)]
        addons_path: Vec<PathBuf>,

        /// Modules under test
        modules: Vec<String>,
    },

    /// List applications with their dependencies and auto-install modules
    Apps {
        /// Comma separated addons roots, searched in order
        #[arg(long, value_delimiter = ',', required = true)]
        addons_path: Vec<PathBuf>,
    },

    /// Count the errors in a test server log
    ///
    /// Exits with 0 only when the count equals --expected.
    CheckLog {
        /// Log file
        file: PathBuf,

        /// Test database name
        #[arg(long, env = "MQT_TEST_DB", default_value = "openerp_test")]
        db: String,

        /// Odoo series
        #[arg(long, env = "VERSION")]
        version: String,

        /// Do not require the modules-loaded message
        #[arg(long)]
        no_check_loaded: bool,

        /// Number of errors that still counts as success
        #[arg(long, default_value_t = 0)]
        expected: usize,
    },

    /// List the python packages lint would check
    LintTargets {
        /// Comma separated basenames to leave out
        #[arg(short = 'e', long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Directories to search
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Run pylint and count failures
    Lint {
        /// pylint configuration file
        #[arg(long, env = "PYLINT_CONFIG_FILE")]
        rcfile: Option<PathBuf>,

        /// Run configuration file (TOML, JSON or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Odoo series the checks target; defaults to the branch name
        #[arg(long, env = "VERSION")]
        version: Option<String>,

        /// Also lint the modules changed relative to origin/<BRANCH>
        #[arg(long, value_name = "BRANCH")]
        pr_base: Option<String>,

        /// pylint configuration file for the changed modules
        #[arg(long, requires = "pr_base")]
        pr_rcfile: Option<PathBuf>,

        /// Directories to search
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Print the test server plan
    Plan {
        /// Run configuration file (TOML, JSON or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Odoo series, overrides the configuration
        #[arg(long, env = "VERSION")]
        version: Option<String>,

        /// Repository under test, overrides the configuration
        #[arg(long, env = "TRAVIS_BUILD_DIR")]
        build_dir: Option<PathBuf>,

        /// Directory holding the server checkout, overrides the configuration
        #[arg(long)]
        home: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
