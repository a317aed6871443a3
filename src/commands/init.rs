use crate::config::{GenConfig, CONFIG_FILE};
use crate::errors::{GenError, Result};
use crate::io;
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_PREAMBLE: &str = "# polycode-gen configuration\n\
# Every key is optional; command-line flags override these values.\n\n";

/// Write a `.polycode.toml` holding the default settings into `root`
pub fn init_config(root: &Path, force: bool) -> Result<PathBuf> {
    let config_path = root.join(CONFIG_FILE);

    if config_path.exists() && !force {
        return Err(GenError::Config {
            path: config_path,
            message: "configuration file already exists, use --force to overwrite".to_string(),
        });
    }

    let body = toml::to_string(&GenConfig::default()).map_err(|e| GenError::Config {
        path: config_path.clone(),
        message: e.to_string(),
    })?;
    io::write_file(&config_path, &format!("{CONFIG_PREAMBLE}{body}"))?;
    info!("Created {}", config_path.display());

    Ok(config_path)
}
