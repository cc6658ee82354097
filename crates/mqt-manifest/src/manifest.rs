//! Typed view of an Odoo module manifest.
//!
//! # Example manifest
//!
//! ```python
//! {
//!     'name': 'Sale Order Lot',
//!     'version': '12.0.1.0.0',
//!     'author': 'Odoo Community Association (OCA)',
//!     'license': 'AGPL-3',
//!     'depends': ['sale_stock'],
//!     'data': ['views/sale_order.xml'],
//!     'installable': True,
//! }
//! ```

use std::path::PathBuf;

use mqt_fs::{NormalizedPath, io};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::literal::parse_literal;

/// Manifest fields the tools care about.
///
/// Only `depends` must have the expected type. The flags follow Python
/// truthiness, and descriptive keys holding something other than text are
/// dropped. Keys that are not modelled here are kept in [`Manifest::extra`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Manifest {
    /// Human readable module name.
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    /// Module version, usually `<odoo series>.x.y.z`.
    #[serde(default, deserialize_with = "text")]
    pub version: Option<String>,
    /// Names of the modules this one requires.
    #[serde(default)]
    pub depends: Vec<String>,
    /// Whether the module can be installed. Absent means installable.
    #[serde(default = "default_installable", deserialize_with = "truthy")]
    pub installable: bool,
    /// Whether the module is a full application.
    #[serde(default, deserialize_with = "truthy")]
    pub application: bool,
    /// Automatic installation once the dependencies are present.
    #[serde(default)]
    pub auto_install: AutoInstall,
    #[serde(default, deserialize_with = "text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub license: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub website: Option<String>,
    /// Python packages and binaries required on the host.
    #[serde(default, deserialize_with = "or_default")]
    pub external_dependencies: ExternalDependencies,
    /// Everything else found in the manifest.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_installable() -> bool {
    true
}

/// Python truthiness of a literal value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn truthy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| is_truthy(&value))
}

/// Text of a descriptive key. Numbers are kept in their literal form.
fn text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn or_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// The `auto_install` key.
///
/// Recent Odoo series also accept a list of module names; any list counts as
/// enabled and the whole `depends` set still has to be satisfied. Any other
/// value is read as a flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AutoInstall {
    Flag(bool),
    Modules(Vec<String>),
}

impl Default for AutoInstall {
    fn default() -> Self {
        Self::Flag(false)
    }
}

impl<'de> Deserialize<'de> for AutoInstall {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if let Value::Array(items) = &value
            && !items.is_empty()
            && let Some(modules) = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        {
            return Ok(Self::Modules(modules));
        }
        Ok(Self::Flag(is_truthy(&value)))
    }
}

impl AutoInstall {
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Modules(_) => true,
        }
    }
}

/// External requirements declared by a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExternalDependencies {
    #[serde(default)]
    pub python: Vec<String>,
    #[serde(default)]
    pub bin: Vec<String>,
}

impl Manifest {
    /// Parse manifest source text.
    pub fn from_literal(source: &str) -> Result<Self> {
        Self::from_literal_at(source, PathBuf::from("<string>"))
    }

    /// Read and parse the manifest file at `path`.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let source = io::read_text(path)?;
        let manifest = Self::from_literal_at(&source, path.to_native())?;
        tracing::trace!(path = %path, depends = ?manifest.depends, "Loaded manifest");
        Ok(manifest)
    }

    fn from_literal_at(source: &str, path: PathBuf) -> Result<Self> {
        let value = parse_literal(source).map_err(|e| e.in_file(path.clone()))?;
        if !value.is_object() {
            return Err(Error::InvalidManifest {
                path,
                reason: "manifest is not a dictionary".into(),
            });
        }
        serde_json::from_value(value).map_err(|e| Error::InvalidManifest {
            path,
            reason: e.to_string(),
        })
    }
}
