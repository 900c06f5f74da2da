//! Configuration file parsing and management
//!
//! This module handles:
//! - Config file discovery (explicit path or XDG config directory)
//! - TOML parsing with serde
//! - Command-line overrides on top of the file
//! - Validation of values and of the source/replica roots

mod discovery;
mod roots;
mod types;
mod validation;

use std::fs;
use std::path::Path;

pub use discovery::ConfigDiscovery;
pub use roots::{prepare_replica_root, validate_log_path, validate_roots};
pub use types::{Config, ConfigOverrides, DEFAULT_LOG_PATH, DEFAULT_SYNC_INTERVAL_SECS};
pub use validation::ConfigValidator;

use crate::error::{ConfigError, Result};

/// Configuration manager that coordinates discovery, parsing, overrides and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load the effective configuration
    ///
    /// With `no_config` set no file is read and only the defaults plus the
    /// overrides apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is unreadable or invalid, or if the
    /// resulting configuration fails validation.
    pub fn load(
        cli_config_path: Option<&Path>,
        no_config: bool,
        overrides: ConfigOverrides,
    ) -> Result<Config> {
        let mut config = if no_config {
            Config::default()
        } else {
            match ConfigDiscovery::discover(cli_config_path) {
                Some(path) => Self::load_file(&path)?,
                None => Config::default(),
            }
        };

        overrides.apply(&mut config);
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Parse a single config file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
