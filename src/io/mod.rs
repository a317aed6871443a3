pub mod manifest;
pub mod walker;

pub use manifest::read_module_name;
pub use walker::{go_files, is_go_file, service_files, subdirectories, GoFileWalker};

use crate::errors::{IoResultExt, Result};
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_path(path)
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_path(path)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_path(path)?;
    }
    Ok(())
}

pub fn dir_exists(path: &Path) -> bool {
    path.exists() && path.is_dir()
}
