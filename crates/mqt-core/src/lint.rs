//! Lint target selection and pylint failure counting.
//!
//! A pull request gets a second pass: the modules it changes are linted
//! again with a stricter configuration and both tallies are added up
//! ([`lint_pr`]).

use std::collections::BTreeMap;
use std::process::Command;

use mqt_addons::{HEAD, get_subpaths, modules_changed_with};
use mqt_fs::NormalizedPath;
use mqt_git::SourceControl;
use serde::Deserialize;

use crate::config::LintConfig;
use crate::{Error, Result};

/// Program invoked by [`run_pylint`].
pub const PYLINT: &str = "pylint";

/// pylint exit status bit meaning its own invocation was wrong.
const PYLINT_USAGE_ERROR: i32 = 32;

/// Plugin understanding `--valid_odoo_versions`.
pub const PYLINT_ODOO: &str = "pylint_odoo";

/// Message counts keyed by message symbol.
pub type MessageStats = BTreeMap<String, usize>;

/// Result of a lint run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintOutcome {
    /// No python package was found below the given paths.
    NoModules,
    /// Failures counted, messages excluded from counting left out.
    Counted(usize),
}

impl LintOutcome {
    /// Counted failures, `None` when there was nothing to lint.
    pub fn fails(&self) -> Option<usize> {
        match self {
            Self::NoModules => None,
            Self::Counted(n) => Some(*n),
        }
    }
}

/// Packages to lint below `paths`, without those whose basename is in
/// `exclude`.
pub fn lint_targets(paths: &[NormalizedPath], exclude: &[String]) -> Vec<NormalizedPath> {
    without_excluded(get_subpaths(paths), exclude)
}

fn without_excluded(targets: Vec<NormalizedPath>, exclude: &[String]) -> Vec<NormalizedPath> {
    targets
        .into_iter()
        .filter(|p| {
            !p.file_name()
                .is_some_and(|name| exclude.iter().any(|e| e == name))
        })
        .collect()
}

/// Total of `stats` over every symbol not listed in `msgs_no_count`.
pub fn count_fails(stats: &MessageStats, msgs_no_count: &[String]) -> usize {
    stats
        .iter()
        .filter(|(symbol, _)| !msgs_no_count.contains(*symbol))
        .map(|(_, count)| count)
        .sum()
}

/// One entry of pylint's JSON report.
#[derive(Debug, Clone, Deserialize)]
struct PylintMessage {
    symbol: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    message: String,
}

/// Tally a pylint JSON report by message symbol.
pub fn parse_report(json: &str) -> Result<MessageStats> {
    let trimmed = json.trim();
    if trimmed.is_empty() {
        return Ok(MessageStats::new());
    }
    let messages: Vec<PylintMessage> = serde_json::from_str(trimmed)?;

    let mut stats = MessageStats::new();
    for msg in messages {
        tracing::debug!(
            symbol = %msg.symbol,
            path = %msg.path,
            line = ?msg.line,
            "{}",
            msg.message
        );
        *stats.entry(msg.symbol).or_default() += 1;
    }
    Ok(stats)
}

/// Run pylint over `targets` and count its messages by symbol.
pub fn run_pylint(
    rcfile: &NormalizedPath,
    targets: &[NormalizedPath],
    extra_params: &[String],
) -> Result<MessageStats> {
    if !rcfile.is_file() {
        return Err(Error::RcfileNotFound {
            path: rcfile.to_native(),
        });
    }

    let mut command = Command::new(PYLINT);
    command
        .arg(format!("--rcfile={rcfile}"))
        .arg("--output-format=json")
        .args(extra_params)
        .args(targets.iter().map(|t| t.to_native()));

    tracing::info!(targets = targets.len(), rcfile = %rcfile, "Running pylint");
    let output = command.output().map_err(|source| Error::Spawn {
        program: PYLINT.to_string(),
        source,
    })?;

    match output.status.code() {
        Some(code) if code & PYLINT_USAGE_ERROR == 0 => {}
        code => {
            return Err(Error::ToolFailed {
                program: PYLINT.to_string(),
                code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
    }

    parse_report(&String::from_utf8_lossy(&output.stdout))
}

/// Sum of two tallies, symbol by symbol.
pub fn merge_stats(mut stats: MessageStats, other: MessageStats) -> MessageStats {
    for (symbol, count) in other {
        *stats.entry(symbol).or_default() += count;
    }
    stats
}

/// The Odoo series named by a branch: its name up to the first `-` or `_`,
/// so `12.0-fix_sale` gives `12.0`.
pub fn version_from_branch(branch: &str) -> Option<String> {
    branch
        .split(['-', '_'])
        .next()
        .filter(|series| !series.is_empty())
        .map(str::to_string)
}

/// The Odoo series of the checked out branch of `scm`.
pub fn branch_version<S: SourceControl>(scm: &S) -> Result<Option<String>> {
    let branch = scm.get_branch_name()?;
    Ok(branch.as_deref().and_then(version_from_branch))
}

/// The reference a pull request on `branch` is compared with:
/// `origin/<branch>`, or [`HEAD`] itself.
pub fn branch_base(branch: &str) -> String {
    if branch == HEAD {
        HEAD.to_string()
    } else {
        format!("origin/{branch}")
    }
}

fn is_series_number(version: &str) -> bool {
    let mut parts = version.split('.');
    let mut numeric = || {
        parts.next().is_some_and(|part| {
            part.chars().next().is_some_and(|c| c.is_ascii_digit())
                && part.chars().all(|c| c.is_ascii_digit())
        })
    };
    numeric() && numeric()
}

/// pylint arguments for `config` when linting for the Odoo series
/// `version`.
///
/// `--valid_odoo_versions` is only passed to a numeric series with the
/// [`PYLINT_ODOO`] plugin loaded.
pub fn pylint_params(config: &LintConfig, version: Option<&str>) -> Vec<String> {
    let mut params = Vec::new();
    if !config.plugins.is_empty() {
        params.push(format!("--load-plugins={}", config.plugins.join(",")));
    }
    if let Some(version) = version.filter(|v| is_series_number(v))
        && config.plugins.iter().any(|p| p == PYLINT_ODOO)
    {
        params.push(format!("--valid_odoo_versions={version}"));
    }
    params.extend(config.extra_params.iter().cloned());
    params
}

/// Settings of the pull request pass of [`lint_pr`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Checkout holding the changed modules.
    pub repo: NormalizedPath,
    /// Reference the checkout is compared with, e.g. `origin/12.0`.
    pub base_ref: String,
    /// Stricter pylint configuration for the changed modules.
    pub rcfile: NormalizedPath,
}

/// Lint `paths` with the settings of `config`, for the Odoo series
/// `version` when known.
///
/// Returns the outcome together with the counts of every symbol found.
pub fn lint(
    paths: &[NormalizedPath],
    rcfile: &NormalizedPath,
    version: Option<&str>,
    config: &LintConfig,
) -> Result<(LintOutcome, MessageStats)> {
    let params = pylint_params(config, version);
    lint_with(paths, rcfile, &params, config, &mut run_pylint)
}

/// [`lint`], then lint the modules changed relative to `pr.base_ref` with
/// `pr.rcfile`.
///
/// The counts of both passes are added up. Without changed modules the
/// result is that of the first pass.
pub fn lint_pr<S: SourceControl>(
    scm: &S,
    paths: &[NormalizedPath],
    rcfile: &NormalizedPath,
    version: Option<&str>,
    pr: &PullRequest,
    config: &LintConfig,
) -> Result<(LintOutcome, MessageStats)> {
    let params = pylint_params(config, version);
    lint_pr_with(scm, paths, rcfile, &params, pr, config, &mut run_pylint)
}

fn lint_with<R>(
    paths: &[NormalizedPath],
    rcfile: &NormalizedPath,
    params: &[String],
    config: &LintConfig,
    run: &mut R,
) -> Result<(LintOutcome, MessageStats)>
where
    R: FnMut(&NormalizedPath, &[NormalizedPath], &[String]) -> Result<MessageStats>,
{
    let subpaths = get_subpaths(paths);
    if subpaths.is_empty() {
        tracing::warn!(paths = ?paths, "Python modules not found");
        return Ok((LintOutcome::NoModules, MessageStats::new()));
    }

    let targets = without_excluded(subpaths, &config.exclude);
    if targets.is_empty() {
        return Ok((LintOutcome::Counted(0), MessageStats::new()));
    }

    let stats = run(rcfile, &targets, params)?;
    let fails = count_fails(&stats, &config.msgs_no_count);
    Ok((LintOutcome::Counted(fails), stats))
}

fn lint_pr_with<S, R>(
    scm: &S,
    paths: &[NormalizedPath],
    rcfile: &NormalizedPath,
    params: &[String],
    pr: &PullRequest,
    config: &LintConfig,
    run: &mut R,
) -> Result<(LintOutcome, MessageStats)>
where
    S: SourceControl,
    R: FnMut(&NormalizedPath, &[NormalizedPath], &[String]) -> Result<MessageStats>,
{
    let (outcome, stats) = lint_with(paths, rcfile, params, config, run)?;
    if outcome == LintOutcome::NoModules {
        return Ok((outcome, stats));
    }

    let changed = without_excluded(
        modules_changed_with(scm, &pr.repo, &pr.base_ref)?,
        &config.exclude,
    );
    if changed.is_empty() {
        tracing::info!(base = %pr.base_ref, "No modules changed");
        return Ok((outcome, stats));
    }

    tracing::info!(base = %pr.base_ref, modules = changed.len(), "Linting changed modules");
    let pr_stats = run(&pr.rcfile, &changed, params)?;
    tracing::info!(
        fails = count_fails(&pr_stats, &config.msgs_no_count),
        "Failures in changed modules"
    );

    let stats = merge_stats(stats, pr_stats);
    let fails = count_fails(&stats, &config.msgs_no_count);
    Ok((LintOutcome::Counted(fails), stats))
}
