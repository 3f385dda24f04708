//! Configuration module for front-deploy
//!
//! Resolution order:
//! 1. Environment variables with the key's name (highest priority)
//! 2. Config file (`deploy.toml` or `--config <path>`)
//! 3. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    expand_home, load_with_warnings, with_env_overrides, ConfigWarning, CONFIG_KEYS,
    DEFAULT_CONFIG_FILE,
};
pub use types::{Auth, DeployConfig, DEFAULT_PORT};
