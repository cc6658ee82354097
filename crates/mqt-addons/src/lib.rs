//! Odoo addon discovery and dependency resolution.
//!
//! - [`classifier`] decides whether a directory is a module
//! - [`walker`] finds addons roots, module lists and lint subpaths
//! - [`index`] loads module descriptors along an addons path
//! - [`dependency`] computes dependency, dependent and auto-install closures
//! - [`changed`] maps a git diff onto the modules it touches

pub mod changed;
pub mod classifier;
pub mod dependency;
pub mod error;
pub mod index;
pub mod walker;

pub use changed::{HEAD, get_modules_changed, modules_changed_with};
pub use classifier::{is_installable_module, is_module};
pub use dependency::{
    add_auto_install, get_applications_with_dependencies, get_dependencies, get_dependents,
    get_test_dependencies,
};
pub use error::{Error, Result};
pub use index::{ModuleDescriptor, ModuleIndex};
pub use walker::{AddonsWalker, get_addons, get_module_paths, get_modules, get_subpaths};

/// The module every Odoo database starts from.
pub const BASE_MODULE: &str = "base";

/// Name prefix of localization modules.
pub const LOCALIZATION_PREFIX: &str = "l10n_";
