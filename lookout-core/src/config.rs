use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt, fs,
    path::{Path, PathBuf},
};

use crate::units::UnitSystem;

/// Upstream services that need an API key. Open Notify is keyless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceId {
    OpenWeather,
    CoinApi,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::OpenWeather => "openweather",
            ServiceId::CoinApi => "coinapi",
        }
    }

    pub const fn all() -> &'static [ServiceId] {
        &[ServiceId::OpenWeather, ServiceId::CoinApi]
    }

    /// Environment variable that overrides the stored key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ServiceId::OpenWeather => "LOOKOUT_OPENWEATHER_API_KEY",
            ServiceId::CoinApi => "LOOKOUT_COINAPI_API_KEY",
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "openweather" => Ok(ServiceId::OpenWeather),
            "coinapi" => Ok(ServiceId::CoinApi),
            _ => Err(anyhow!("Unknown service '{value}'. Supported services: openweather, coinapi.")),
        }
    }
}

/// Credentials for a single service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub api_key: String,
}

/// Base URLs of the upstream endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub weather_url: String,
    pub iss_url: String,
    pub assets_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            weather_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            iss_url: "http://api.open-notify.org/iss-now.json".to_string(),
            assets_url: "https://rest.coinapi.io/v1/assets".to_string(),
        }
    }
}

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Unit system the menu starts with.
    #[serde(default)]
    pub units: Option<UnitSystem>,

    /// Start in verbose display mode.
    #[serde(default)]
    pub verbose: Option<bool>,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Example TOML:
    /// [services.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,

    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            units: None,
            verbose: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            services: HashMap::new(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config dir, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
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

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
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
        let dirs = ProjectDirs::from("dev", "lookout", "lookout")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace stored keys with non-empty values from the environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for id in ServiceId::all() {
            if let Some(key) = lookup(id.env_var()).filter(|k| !k.trim().is_empty()) {
                self.upsert_service_api_key(*id, key.trim().to_string());
            }
        }
    }

    /// Set or replace the API key of a service.
    pub fn upsert_service_api_key(&mut self, service: ServiceId, api_key: String) {
        self.services.insert(service.as_str().to_string(), ServiceConfig { api_key });
    }

    /// Returns the API key for a service, if present.
    pub fn service_api_key(&self, service: ServiceId) -> Option<&str> {
        self.services.get(service.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_service_configured(&self, service: ServiceId) -> bool {
        self.service_api_key(service).is_some()
    }

    pub fn default_units(&self) -> UnitSystem {
        self.units.unwrap_or_default()
    }

    pub fn default_verbose(&self) -> bool {
        self.verbose.unwrap_or(false)
    }
}
