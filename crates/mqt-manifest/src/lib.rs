//! Odoo module manifest parsing.
//!
//! Manifests are Python files holding a single literal dictionary. They are
//! read with a strict literal parser ([`literal::parse_literal`]) that
//! accepts strings, numbers, booleans, `None`, lists, tuples, sets and dicts
//! and rejects every other expression, so nothing in a manifest is ever
//! executed.

pub mod error;
pub mod literal;
pub mod manifest;
pub mod version;

pub use error::{Error, Result};
pub use literal::parse_literal;
pub use manifest::{AutoInstall, ExternalDependencies, Manifest};
pub use version::OdooVersion;
