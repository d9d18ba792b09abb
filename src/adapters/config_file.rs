//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a single JSON document on the host
//! filesystem.  Missing fields take their defaults, a missing file means
//! "nothing stored" and yields [`DeviceConfig::default()`].  Values are
//! range-checked on both load and save.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::DeviceConfig;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "GARAGEDOOR_CONFIG";

pub struct JsonFileConfig {
    path: PathBuf,
}

impl JsonFileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the path from `GARAGEDOOR_CONFIG`, falling back to `arg`.
    pub fn from_env_or(arg: Option<String>) -> Option<Self> {
        std::env::var(CONFIG_PATH_ENV)
            .ok()
            .or(arg)
            .map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonFileConfig {
    fn load(&self) -> Result<DeviceConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Config {} not found, using defaults", self.path.display());
                return Ok(DeviceConfig::default());
            }
            Err(e) => {
                warn!("Config {}: {}", self.path.display(), e);
                return Err(ConfigError::IoError);
            }
        };
        let config: DeviceConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("Config {}: {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        config.validate()?;
        info!("Config loaded from {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &DeviceConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config).map_err(|_| ConfigError::IoError)?;
        fs::write(&self.path, text).map_err(|e| {
            warn!("Config {}: {}", self.path.display(), e);
            ConfigError::IoError
        })?;
        info!("Config saved to {}", self.path.display());
        Ok(())
    }
}
