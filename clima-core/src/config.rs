use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::ConfigError;

pub const DEFAULT_SPINNER_MIN_MS: u64 = 500;
pub const DEFAULT_SPLASH_MS: u64 = 2000;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// spinner_min_ms = 500
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Override for the weather endpoint, mostly useful against a local mock.
    pub base_url: Option<String>,

    /// Override for the IP geolocation endpoint.
    pub location_url: Option<String>,

    /// Minimum time the loading indicator stays visible.
    pub spinner_min_ms: Option<u64>,

    /// How long the splash animation plays before the main screen.
    pub splash_ms: Option<u64>,
}

impl Config {
    /// Load config from an explicit path. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "clima", "clima")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// Returns the stored API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn spinner_min_duration(&self) -> Duration {
        Duration::from_millis(self.spinner_min_ms.unwrap_or(DEFAULT_SPINNER_MIN_MS))
    }

    pub fn splash_duration(&self) -> Duration {
        Duration::from_millis(self.splash_ms.unwrap_or(DEFAULT_SPLASH_MS))
    }
}
