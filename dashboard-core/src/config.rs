use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    display::TemperatureConversion,
    model::{TimeFormat, UnitSystem},
};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "WEATHERBIT_API_KEY";

const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Where the current-location panel gets its coordinates from.
///
/// Example TOML:
/// [geolocation]
/// mode = "fixed"
/// latitude = 40.75
/// longitude = -73.99
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum GeolocationConfig {
    Ip {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    Fixed {
        latitude: f64,
        longitude: f64,
    },
    Disabled,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        GeolocationConfig::Ip { url: None }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Weatherbit API key. Never compiled into the binary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override for the provider base URL, e.g. a local mock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    pub units: UnitSystem,
    pub time_format: TimeFormat,
    pub temperature_conversion: TemperatureConversion,

    /// Quiet period after the last keystroke before a search is fetched.
    pub search_debounce_ms: u64,

    pub geolocation: GeolocationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            units: UnitSystem::default(),
            time_format: TimeFormat::default(),
            temperature_conversion: TemperatureConversion::default(),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            geolocation: GeolocationConfig::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment, falling back to the config file.
    pub fn api_key(&self) -> Result<String> {
        self.api_key_with_env(std::env::var(API_KEY_ENV).ok())
    }

    pub fn api_key_with_env(&self, env_value: Option<String>) -> Result<String> {
        env_value
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
            .ok_or_else(|| {
                anyhow!(
                    "No Weatherbit API key configured.\n\
                     Hint: run `weather-dashboard configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
