//! Reads the module identifier from a `go.mod` manifest.

use crate::errors::{GenError, Result};
use std::fs;
use std::path::Path;

pub const MANIFEST_FILE: &str = "go.mod";

/// Read the module path declared by the manifest at `path`.
///
/// The first line starting with `module` must carry the module path as its
/// second whitespace-separated token.
pub fn read_module_name(path: &Path) -> Result<String> {
    let contents = fs::read_to_string(path).map_err(|e| GenError::Manifest {
        path: path.to_path_buf(),
        message: format!("failed to open manifest: {e}"),
    })?;

    parse_module_name(&contents).ok_or_else(|| GenError::Manifest {
        path: path.to_path_buf(),
        message: "module name not found".to_string(),
    })
}

/// Pure parsing step of [`read_module_name`]
pub fn parse_module_name(contents: &str) -> Option<String> {
    contents
        .lines()
        .filter(|line| line.starts_with("module"))
        .find_map(|line| line.split_whitespace().nth(1))
        .map(|name| name.trim_matches('"').to_string())
}
