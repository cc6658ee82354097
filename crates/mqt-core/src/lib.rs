//! Orchestration for Odoo repository checks
//!
//! This crate sits between the discovery crates and the `mqt` binary:
//!
//! - **Configuration**: [`MqtConfig`], an explicit description of a CI run
//! - **Test-server planning**: addons path, modules to test, modules to
//!   preinstall and the server command lines ([`plan`])
//! - **Run summary**: per-run error counts checked against the expected
//!   count ([`summarize`])
//! - **Lint driving**: lint target selection, pylint failure counting and
//!   the pull request pass over changed modules
//!
//! ```text
//!                 mqt-cli
//!                    |
//!                 mqt-core
//!                    |
//!     +--------+-----+------+----------+---------+
//!     |        |            |          |         |
//! mqt-fs  mqt-manifest  mqt-addons  mqt-testlog  mqt-git
//! ```

pub mod config;
pub mod error;
pub mod lint;
pub mod server;

pub use config::{LintConfig, MqtConfig};
pub use error::{Error, Result};
pub use lint::{
    LintOutcome, MessageStats, PullRequest, branch_base, branch_version, count_fails, lint,
    lint_pr, lint_targets, merge_stats, parse_report, pylint_params, run_pylint,
    version_from_branch,
};
pub use server::{
    CommandLine, RunResult, RunStep, Summary, TestPlan, TestRun, addons_path, addons_to_check,
    plan, server_path, server_script, summarize,
};
