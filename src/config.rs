use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub ssh_file_config: PathBuf,
    pub columns: usize,
    pub shortcut_width: usize,
    pub connect_delay_ms: u64,
    pub update_delay_ms: u64,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let ssh_file_config = dirs::home_dir()
            .map(|home| home.join(".ssh").join("config"))
            .unwrap_or_else(|| PathBuf::from(".ssh/config"));
        let log_dir = dirs::data_local_dir()
            .map(|dir| dir.join("kroppzeug").join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"));

        Self {
            ssh_file_config,
            columns: 2,
            shortcut_width: 16,
            connect_delay_ms: 1000,
            update_delay_ms: 3000,
            log_dir,
        }
    }
}

impl AppConfig {
    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    pub fn update_delay(&self) -> Duration {
        Duration::from_millis(self.update_delay_ms)
    }
}

#[derive(Debug)]
pub struct ConfigManager {
    config_file: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or(Error::NoConfigDir)
            .context("Could not find config directory")?
            .join("kroppzeug");

        Ok(Self::with_file(config_dir.join("kroppzeug.toml")))
    }

    pub fn with_file(config_file: impl Into<PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
        }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_file
    }

    /// The settings file is optional and never written back.
    pub fn load_config(&self) -> Result<AppConfig> {
        if !self.config_file.exists() {
            tracing::debug!("No settings file at {:?}, using defaults", self.config_file);
            return Ok(AppConfig::default());
        }

        let content =
            fs::read_to_string(&self.config_file).context("Failed to read settings file")?;

        let mut config: AppConfig = toml::from_str(&content)
            .map_err(Error::Settings)
            .context("Failed to parse settings file")?;

        // A zero column count would divide by zero in the layout.
        if config.columns == 0 {
            config.columns = 1;
        }

        Ok(config)
    }
}
