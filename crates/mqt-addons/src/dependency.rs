//! Dependency resolution over a [`ModuleIndex`].
//!
//! Edges point from a module to each entry of its `depends` list. The graph
//! is walked depth-first with a visited set and an in-progress stack, so a
//! module is reported once and a loop surfaces as
//! [`Error::CyclicDependency`] instead of recursing forever.
//!
//! # Example
//!
//! ```
//! use mqt_addons::{ModuleDescriptor, ModuleIndex, get_dependencies};
//! use mqt_fs::NormalizedPath;
//! use mqt_manifest::Manifest;
//!
//! let module = |name: &str, src: &str| {
//!     ModuleDescriptor::new(name, NormalizedPath::new(name), Manifest::from_literal(src).unwrap())
//! };
//! let index = ModuleIndex::from_descriptors([
//!     module("sale", "{'depends': ['base']}"),
//!     module("sale_x", "{'depends': ['sale']}"),
//! ]);
//!
//! let order = get_dependencies(&index, "sale_x").unwrap();
//! assert_eq!(order, vec!["base", "sale", "sale_x"]);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashSet};

use mqt_fs::NormalizedPath;
use mqt_manifest::Manifest;

use crate::classifier::is_installable_module;
use crate::error::{Error, Result};
use crate::index::ModuleIndex;
use crate::{BASE_MODULE, LOCALIZATION_PREFIX};

/// Direction in which edges are followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

/// Adjacency lists for both directions.
struct DependencyGraph<'a> {
    forward: BTreeMap<&'a str, Vec<&'a str>>,
    reverse: BTreeMap<&'a str, Vec<&'a str>>,
}

impl<'a> DependencyGraph<'a> {
    fn new(index: &'a ModuleIndex) -> Self {
        let mut forward: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        let mut reverse: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

        for module in index.iter() {
            let deps = forward.entry(module.name.as_str()).or_default();
            for dep in module.depends() {
                deps.push(dep.as_str());
                reverse
                    .entry(dep.as_str())
                    .or_default()
                    .push(module.name.as_str());
            }
        }

        Self { forward, reverse }
    }

    fn edges(&self, direction: Direction, id: &str) -> &[&'a str] {
        let map = match direction {
            Direction::Forward => &self.forward,
            Direction::Reverse => &self.reverse,
        };
        map.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Depth-first post-order from `start`, `start` last.
    fn post_order(&self, direction: Direction, start: &'a str) -> Result<Vec<String>> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = Vec::new();
        let mut order = Vec::new();
        self.visit(direction, start, &mut visited, &mut stack, &mut order)?;
        Ok(order)
    }

    fn visit(
        &self,
        direction: Direction,
        id: &'a str,
        visited: &mut HashSet<&'a str>,
        stack: &mut Vec<&'a str>,
        order: &mut Vec<String>,
    ) -> Result<()> {
        if let Some(pos) = stack.iter().position(|s| *s == id) {
            let mut cycle: Vec<String> = stack[pos..].iter().map(|s| s.to_string()).collect();
            cycle.push(id.to_string());
            return Err(Error::CyclicDependency { cycle });
        }
        if visited.contains(id) {
            return Ok(());
        }

        stack.push(id);
        for &next in self.edges(direction, id) {
            self.visit(direction, next, visited, stack, order)?;
        }
        stack.pop();

        visited.insert(id);
        order.push(id.to_string());
        Ok(())
    }
}

/// Every module `name` needs, dependencies first and `name` last.
///
/// Names missing from the index are still listed, as leaves.
pub fn get_dependencies(modules: &ModuleIndex, name: &str) -> Result<Vec<String>> {
    DependencyGraph::new(modules).post_order(Direction::Forward, name)
}

/// Every module that needs `name`, most distant dependents first and `name`
/// last.
pub fn get_dependents(modules: &ModuleIndex, name: &str) -> Result<Vec<String>> {
    DependencyGraph::new(modules).post_order(Direction::Reverse, name)
}

/// Grow `to_install` with the auto-install modules whose dependencies are
/// all part of it, until nothing more can be added.
pub fn add_auto_install(modules: &ModuleIndex, to_install: &BTreeSet<String>) -> BTreeSet<String> {
    let mut result = to_install.clone();
    loop {
        let added: Vec<String> = modules
            .iter()
            .filter(|m| m.auto_install().is_enabled() && !result.contains(&m.name))
            .filter(|m| m.depends().iter().all(|d| result.contains(d)))
            .map(|m| m.name.clone())
            .collect();

        if added.is_empty() {
            return result;
        }
        tracing::trace!(added = ?added, "Auto-install modules");
        result.extend(added);
    }
}

/// Applications (localizations excepted) with their dependencies and the
/// auto-install modules they pull in.
pub fn get_applications_with_dependencies(modules: &ModuleIndex) -> Result<BTreeSet<String>> {
    let mut result = BTreeSet::new();
    for app in modules
        .iter()
        .filter(|m| m.application() && !m.name.starts_with(LOCALIZATION_PREFIX))
    {
        result.extend(get_dependencies(modules, &app.name)?);
    }
    Ok(add_auto_install(modules, &result))
}

/// Modules that have to be installed before `addons_list` can be tested.
///
/// Each listed module is looked up through `addons_path` in order, and the
/// first installable match contributes its direct `depends`. [`BASE_MODULE`]
/// is always required. Listed modules are removed from the result.
pub fn get_test_dependencies(
    addons_path: &[NormalizedPath],
    addons_list: &[String],
) -> Result<Vec<String>> {
    let mut result: BTreeSet<String> = BTreeSet::new();
    result.insert(BASE_MODULE.to_string());

    for name in addons_list {
        let found = addons_path
            .iter()
            .find_map(|root| is_installable_module(&root.trim_trailing_separator().join(name)));
        match found {
            Some(manifest_path) => {
                let manifest = Manifest::load(&manifest_path)?;
                result.extend(manifest.depends);
            }
            None => {
                tracing::warn!(module = %name, "Module to test not found in addons path");
            }
        }
    }

    for name in addons_list {
        result.remove(name);
    }
    Ok(result.into_iter().collect())
}
