use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

use super::core::GenConfig;

pub const CONFIG_FILE: &str = ".polycode.toml";

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<GenConfig, String> {
    let config = toml::from_str::<GenConfig>(contents)
        .map_err(|e| format!("Failed to parse {CONFIG_FILE}: {e}"))?;
    config
        .validate()
        .map_err(|e| format!("Invalid {CONFIG_FILE}: {e}"))?;
    Ok(config)
}

/// Try loading config from a specific path, logging why it was not used
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<GenConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // A missing config file is the normal case
    if error.kind() != std::io::ErrorKind::NotFound {
        warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Load `.polycode.toml` from the project root, falling back to defaults
pub fn load_config(root: &Path) -> GenConfig {
    try_load_config_from_path(&root.join(CONFIG_FILE)).unwrap_or_default()
}
