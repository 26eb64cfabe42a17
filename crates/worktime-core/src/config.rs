//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the origin the offline shell is installed from and the cache version tag.
//!
//! Configuration is stored at `~/.config/worktime/config.json`. The
//! `WORKTIME_ORIGIN` environment variable overrides the stored origin.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::offline::{ShellManifest, DEFAULT_CACHE_VERSION};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "worktime";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Key-value store file holding the settings record
const STORAGE_FILE: &str = "storage.json";

/// Environment variable overriding `shell_origin`
pub const ORIGIN_ENV: &str = "WORKTIME_ORIGIN";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Scope URL the offline shell is served from
    pub shell_origin: Option<String>,
    #[serde(default = "default_cache_version")]
    pub cache_version: String,
}

fn default_cache_version() -> String {
    DEFAULT_CACHE_VERSION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shell_origin: None,
            cache_version: default_cache_version(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(origin) = std::env::var(ORIGIN_ENV) {
            if !origin.trim().is_empty() {
                config.shell_origin = Some(origin.trim().to_string());
            }
        }
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// File backing the settings key-value store
    pub fn storage_path(&self) -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(STORAGE_FILE))
    }

    /// Directory holding cache generations of the offline shell
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join("shell"))
    }

    /// Directory for log files
    pub fn log_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join("logs"))
    }

    /// Shell manifest for the configured origin, if one is set
    pub fn shell_manifest(&self) -> Result<Option<ShellManifest>> {
        match self.shell_origin {
            Some(ref origin) => {
                let manifest = ShellManifest::parse(origin, &self.cache_version)
                    .with_context(|| format!("Invalid shell origin {}", origin))?;
                Ok(Some(manifest))
            }
            None => Ok(None),
        }
    }
}
