//! Addon discovery and dependency commands

use std::path::{Path, PathBuf};

use clap::CommandFactory;
use mqt_addons::{
    ModuleIndex, get_addons, get_applications_with_dependencies, get_dependencies, get_dependents,
    get_modules, get_modules_changed, get_test_dependencies,
};
use mqt_fs::NormalizedPath;

use super::normalized;
use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Print the addons roots, or module names with `modules`, found below
/// `paths` as one comma separated line.
///
/// Prints the usage and returns 1 when no path is given.
pub fn run_get_addons(paths: &[PathBuf], modules: bool, exclude: &[String]) -> Result<i32> {
    if paths.is_empty() {
        let mut cmd = Cli::command();
        cmd.build();
        if let Some(sub) = cmd.find_subcommand_mut("get-addons") {
            sub.print_help()?;
        }
        return Ok(1);
    }

    let paths: Vec<_> = paths.iter().map(NormalizedPath::new).collect();
    let entries = list_addons(&paths, modules, exclude);
    println!("{}", entries.join(","));
    Ok(0)
}

fn list_addons(paths: &[NormalizedPath], modules: bool, exclude: &[String]) -> Vec<String> {
    paths
        .iter()
        .flat_map(|path| {
            if modules {
                get_modules(path)
            } else {
                get_addons(path).iter().map(ToString::to_string).collect()
            }
        })
        .filter(|entry| !exclude.contains(entry))
        .collect()
}

/// Print the directories of the modules changed relative to `reference`.
pub fn run_changed(path: &Path, reference: &str) -> Result<i32> {
    let changed = get_modules_changed(&NormalizedPath::canonical(path), reference)?;
    tracing::info!(count = changed.len(), reference, "Changed modules");

    for module in changed {
        println!("{module}");
    }
    Ok(0)
}

/// Print the dependency closure of `name`, one module per line.
pub fn run_deps(addons_path: &[PathBuf], name: &str, reverse: bool) -> Result<i32> {
    let index = ModuleIndex::from_addons_path(&normalized(addons_path));
    if !index.contains(name) {
        return Err(CliError::usage(format!(
            "Module '{name}' not found in the addons path"
        )));
    }

    let modules = if reverse {
        get_dependents(&index, name)?
    } else {
        get_dependencies(&index, name)?
    };
    for module in modules {
        println!("{module}");
    }
    Ok(0)
}

pub fn run_test_deps(addons_path: &[PathBuf], modules: &[String]) -> Result<i32> {
    let deps = get_test_dependencies(&normalized(addons_path), modules)?;
    println!("{}", deps.join(","));
    Ok(0)
}

pub fn run_apps(addons_path: &[PathBuf]) -> Result<i32> {
    let index = ModuleIndex::from_addons_path(&normalized(addons_path));
    let apps: Vec<String> = get_applications_with_dependencies(&index)?
        .into_iter()
        .collect();
    println!("{}", apps.join(","));
    Ok(0)
}
