use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::provider::{openmeteo, openweather};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_CITY: &str = "São Paulo";

/// Base URLs of the two weather services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_openweather_url")]
    pub openweather: String,
    #[serde(default = "default_open_meteo_url")]
    pub open_meteo: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openweather: default_openweather_url(),
            open_meteo: default_open_meteo_url(),
        }
    }
}

fn default_openweather_url() -> String {
    openweather::DEFAULT_BASE_URL.to_string()
}

fn default_open_meteo_url() -> String {
    openmeteo::DEFAULT_BASE_URL.to_string()
}

fn default_language() -> String {
    openweather::DEFAULT_LANGUAGE.to_string()
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// language = "pt_br"
/// default_city = "São Paulo"
///
/// [endpoints]
/// openweather = "https://api.openweathermap.org/data/2.5"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeather API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Display-language hint for condition descriptions.
    #[serde(default = "default_language")]
    pub language: String,

    /// City used when none is given on the command line.
    #[serde(default = "default_city")]
    pub default_city: String,

    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            language: default_language(),
            default_city: default_city(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config directory, or defaults on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
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
        let dirs = ProjectDirs::from("dev", "raincard", "raincard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the stored key; a blank key clears it.
    pub fn set_api_key(&mut self, api_key: &str) {
        let trimmed = api_key.trim();
        self.api_key = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    /// The key to use: `env_value` when non-blank, else the stored one.
    ///
    /// An empty string means no key is configured at all.
    pub fn credential(&self, env_value: Option<&str>) -> String {
        env_value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| self.api_key.as_deref().map(str::trim))
            .unwrap_or_default()
            .to_string()
    }

    /// [`Config::credential`] with the value of [`API_KEY_ENV`].
    pub fn resolve_credential(&self) -> String {
        let env_value = std::env::var(API_KEY_ENV).ok();
        self.credential(env_value.as_deref())
    }
}
