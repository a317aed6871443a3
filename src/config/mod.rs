//! Generator configuration.
//!
//! Settings come from an optional `.polycode.toml` in the project root;
//! command-line flags override individual values afterwards.

mod core;
mod loader;

pub use self::core::GenConfig;
pub use loader::{load_config, parse_and_validate_config, CONFIG_FILE};
