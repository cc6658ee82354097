//! Read-only I/O helpers

use std::fs;

use crate::{Error, NormalizedPath, Result};

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read a file as text, replacing invalid UTF-8 sequences.
pub fn read_text_lossy(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    let bytes = fs::read(&native_path).map_err(|e| Error::io(&native_path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// List the entry names of a directory, sorted byte-wise.
///
/// Filesystem listing order is unspecified, so every walker goes through
/// this function to get a stable order. Names that are not valid UTF-8 are
/// skipped with a warning.
pub fn list_dir(path: &NormalizedPath) -> Result<Vec<String>> {
    let native_path = path.to_native();
    let entries = fs::read_dir(&native_path).map_err(|e| Error::io(&native_path, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&native_path, e))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                tracing::warn!(dir = %path, name = ?raw, "Skipping non UTF-8 entry");
            }
        }
    }
    names.sort();
    Ok(names)
}

/// List the child paths of a directory, sorted by name.
pub fn list_children(path: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    let path = path.trim_trailing_separator();
    Ok(list_dir(&path)?
        .iter()
        .map(|name| path.join(name))
        .collect())
}
