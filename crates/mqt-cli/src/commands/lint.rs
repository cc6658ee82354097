//! Lint commands

use std::path::{Path, PathBuf};

use colored::Colorize;
use mqt_core::{
    LintOutcome, MessageStats, MqtConfig, PullRequest, branch_base, branch_version, lint,
    lint_pr, lint_targets,
};
use mqt_fs::NormalizedPath;
use mqt_git::GitRun;
use tracing::debug;

use super::normalized;
use crate::error::{CliError, Result};

/// Print the packages `lint` would check, one per line.
pub fn run_lint_targets(paths: &[PathBuf], exclude: &[String]) -> Result<i32> {
    for target in lint_targets(&normalized(paths), exclude) {
        println!("{target}");
    }
    Ok(0)
}

/// Command line settings of `mqt lint`.
#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    pub rcfile: Option<PathBuf>,
    pub version: Option<String>,
    /// Branch a pull request targets; enables the second pass.
    pub pr_base: Option<String>,
    pub pr_rcfile: Option<PathBuf>,
}

/// Run pylint over the packages below `paths`.
///
/// With a pull request base, the modules changed against it are linted a
/// second time with the stricter configuration. Returns 1 when any counted
/// failure was found.
pub fn run_lint(paths: &[PathBuf], config: Option<&Path>, options: LintOptions) -> Result<i32> {
    let config = match config {
        Some(path) => MqtConfig::load(&NormalizedPath::new(path))?,
        None => MqtConfig::default(),
    };

    let rcfile = options
        .rcfile
        .or_else(|| config.lint.rcfile.clone())
        .ok_or_else(|| CliError::usage("No pylint configuration file, pass --rcfile"))?;
    let rcfile = NormalizedPath::new(rcfile);
    let paths = normalized(paths);

    let version = options
        .version
        .or_else(|| Some(config.version.clone()).filter(|v| !v.is_empty()))
        .or_else(|| paths.first().and_then(checkout_version));
    if version.is_none() {
        println!(
            "{} VERSION is undefined, Odoo specific checks are not version aware",
            "warning:".yellow().bold()
        );
    }

    let (outcome, stats) = match options.pr_base {
        Some(branch) => {
            let pr_rcfile = options
                .pr_rcfile
                .or_else(|| config.lint.pr_rcfile.clone())
                .ok_or_else(|| {
                    CliError::usage("No pull request pylint configuration, pass --pr-rcfile")
                })?;
            let repo = paths
                .first()
                .cloned()
                .ok_or_else(|| CliError::usage("No path to lint"))?;
            let git = GitRun::new(repo.clone())?;
            let pr = PullRequest {
                repo,
                base_ref: branch_base(&branch),
                rcfile: NormalizedPath::new(pr_rcfile),
            };
            lint_pr(&git, &paths, &rcfile, version.as_deref(), &pr, &config.lint)?
        }
        None => lint(&paths, &rcfile, version.as_deref(), &config.lint)?,
    };
    print!("{}", format_stats(&stats, &config.lint.msgs_no_count));

    match outcome {
        LintOutcome::NoModules => {
            println!("{} no python modules found", "warning:".yellow().bold());
            Ok(0)
        }
        LintOutcome::Counted(0) => {
            println!("{} no lint failures", "Success:".green().bold());
            Ok(0)
        }
        LintOutcome::Counted(fails) => {
            println!("{} {fails} lint failure(s)", "FAIL:".red().bold());
            Ok(1)
        }
    }
}

/// Series named by the branch checked out at `path`, if it is a checkout.
fn checkout_version(path: &NormalizedPath) -> Option<String> {
    let git = GitRun::new(path.clone()).ok()?;
    match branch_version(&git) {
        Ok(version) => version,
        Err(err) => {
            debug!("no branch version for {path}: {err}");
            None
        }
    }
}

/// One line per symbol; symbols not counted as failures are marked.
fn format_stats(stats: &MessageStats, msgs_no_count: &[String]) -> String {
    let width = stats.keys().map(String::len).max().unwrap_or(0);
    stats
        .iter()
        .map(|(symbol, count)| {
            let note = if msgs_no_count.contains(symbol) {
                " (not counted)"
            } else {
                ""
            };
            format!("{symbol:<width$} {count}{note}\n")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_stats() {
        let stats: MessageStats = [("eval-used".to_string(), 1), ("unused-import".to_string(), 3)]
            .into_iter()
            .collect();

        assert_eq!(
            format_stats(&stats, &["eval-used".to_string()]),
            "eval-used     1 (not counted)\nunused-import 3\n"
        );
    }

    #[test]
    fn test_format_no_stats() {
        assert_eq!(format_stats(&MessageStats::new(), &[]), "");
    }

    #[test]
    fn test_checkout_version_outside_a_checkout() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(checkout_version(&NormalizedPath::new(dir.path())), None);
    }
}
