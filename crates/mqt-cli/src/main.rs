//! Maintainer quality tools CLI
//!
//! Command-line helpers for testing and linting Odoo addon repositories in CI.

mod cli;
mod commands;
mod error;

use std::io;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{LintOptions, PlanOverrides};
use error::Result;

fn main() {
    match run() {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!(command = ?cli.command, "Parsed command line");

    execute_command(cli.command)
}

/// Log to stderr, at debug level with `--verbose`, otherwise as `RUST_LOG`
/// says, defaulting to warnings.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(io::stderr)
        .try_init();
}

fn execute_command(cmd: Commands) -> Result<i32> {
    match cmd {
        Commands::GetAddons {
            modules,
            exclude,
            paths,
        } => commands::run_get_addons(&paths, modules, &exclude),
        Commands::Changed { reference, path } => commands::run_changed(&path, &reference),
        Commands::Deps {
            name,
            reverse,
            addons_path,
        } => commands::run_deps(&addons_path, &name, reverse),
        Commands::TestDeps {
            addons_path,
            modules,
        } => commands::run_test_deps(&addons_path, &modules),
        Commands::Apps { addons_path } => commands::run_apps(&addons_path),
        Commands::CheckLog {
            file,
            db,
            version,
            no_check_loaded,
            expected,
        } => commands::run_check_log(&file, &db, &version, !no_check_loaded, expected),
        Commands::LintTargets { exclude, paths } => {
            commands::run_lint_targets(&paths, &exclude)
        }
        Commands::Lint {
            rcfile,
            config,
            version,
            pr_base,
            pr_rcfile,
            paths,
        } => commands::run_lint(
            &paths,
            config.as_deref(),
            LintOptions {
                rcfile,
                version,
                pr_base,
                pr_rcfile,
            },
        ),
        Commands::Plan {
            config,
            version,
            build_dir,
            home,
        } => commands::run_plan(
            config.as_deref(),
            PlanOverrides {
                version,
                build_dir,
                home,
            },
        ),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "mqt", &mut io::stdout());
            Ok(0)
        }
    }
}
