//! Command implementations for mqt-cli
//!
//! Every command returns the process exit code on success.

pub mod addons;
pub mod lint;
pub mod log;
pub mod plan;

use std::path::PathBuf;

use mqt_fs::NormalizedPath;

pub use addons::{run_apps, run_changed, run_deps, run_get_addons, run_test_deps};
pub use lint::{LintOptions, run_lint, run_lint_targets};
pub use log::run_check_log;
pub use plan::{PlanOverrides, run_plan};

/// Input paths made absolute, so names such as `.` resolve to a directory.
pub(crate) fn normalized(paths: &[PathBuf]) -> Vec<NormalizedPath> {
    paths.iter().map(NormalizedPath::canonical).collect()
}
