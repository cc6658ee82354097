//! Shared test fixtures for the maintainer quality tools workspace.
//!
//! This crate is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`addons`]: [`AddonTree`] builder for module directory layouts
//! - [`git`]: git repository fixtures built with `git2`

pub mod addons;
pub mod git;

pub use addons::AddonTree;
