//! Client configuration.
//!
//! Configuration is stored in `config.yaml` inside the ticketdesk config
//! directory (`$TICKETDESK_CONFIG_DIR`, or the platform config dir) and holds
//! the API connection settings. The API base URL is resolved once at startup:
//!
//! 1. explicit override (`--api-base`)
//! 2. `TICKETDESK_API_BASE` environment variable
//! 3. `api.base_url` from the config file
//! 4. [`DEFAULT_API_BASE`]

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DeskError, Result};

pub const DEFAULT_API_BASE: &str = "http://localhost:3000/api";
pub const API_BASE_ENV: &str = "TICKETDESK_API_BASE";
pub const CONFIG_DIR_ENV: &str = "TICKETDESK_CONFIG_DIR";

pub const VALID_CONFIG_KEYS: &[&str] = &["api.base_url", "api.connect_timeout_secs"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "ApiConfig::is_default")]
    pub api: ApiConfig,
}

/// API connection settings as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Connect timeout in seconds (default: 30)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,
}

impl ApiConfig {
    fn is_default(&self) -> bool {
        *self == ApiConfig::default()
    }
}

impl Config {
    /// Directory holding `config.yaml`
    pub fn config_dir() -> PathBuf {
        if let Ok(dir) = env::var(CONFIG_DIR_ENV)
            && !dir.is_empty()
        {
            return PathBuf::from(dir);
        }
        ProjectDirs::from("", "", "ticketdesk")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".ticketdesk"))
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Read a value by dotted key
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match key {
            "api.base_url" => Ok(self.api.base_url.clone()),
            "api.connect_timeout_secs" => {
                Ok(self.api.connect_timeout_secs.map(|s| s.to_string()))
            }
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a value by dotted key, validating it first
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                parse_base_url(value)?;
                self.api.base_url = Some(value.to_string());
            }
            "api.connect_timeout_secs" => {
                let secs: u64 = value.parse().map_err(|_| {
                    DeskError::Config(format!(
                        "api.connect_timeout_secs must be a whole number of seconds, got '{value}'"
                    ))
                })?;
                self.api.connect_timeout_secs = Some(secs);
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> DeskError {
    DeskError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        VALID_CONFIG_KEYS.join(", ")
    ))
}

fn parse_base_url(value: &str) -> Result<Url> {
    let url = Url::parse(value.trim())
        .map_err(|e| DeskError::Config(format!("invalid API base URL '{value}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DeskError::Config(format!(
            "invalid API base URL '{value}': expected an http or https URL"
        )));
    }
    Ok(url)
}

/// Where the effective base URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrlSource {
    Override,
    Environment,
    ConfigFile,
    Default,
}

impl fmt::Display for BaseUrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseUrlSource::Override => write!(f, "command line"),
            BaseUrlSource::Environment => write!(f, "{API_BASE_ENV}"),
            BaseUrlSource::ConfigFile => write!(f, "config file"),
            BaseUrlSource::Default => write!(f, "default"),
        }
    }
}

/// Resolved settings handed to the HTTP client constructor
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub source: BaseUrlSource,
    pub connect_timeout: Duration,
}

impl ApiSettings {
    /// Settings pointing at an explicit base URL with default timeouts
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            source: BaseUrlSource::Override,
            connect_timeout: Duration::from_secs(30),
        })
    }

    /// Resolve settings from an optional override, the process environment and the config file
    pub fn from_env(override_url: Option<&str>, config: &Config) -> Result<Self> {
        let env_url = env::var(API_BASE_ENV).ok();
        Self::resolve(override_url, env_url.as_deref(), config)
    }

    pub fn resolve(
        override_url: Option<&str>,
        env_url: Option<&str>,
        config: &Config,
    ) -> Result<Self> {
        let non_empty = |s: &&str| !s.trim().is_empty();

        let (raw, source) = if let Some(url) = override_url.filter(non_empty) {
            (url.to_string(), BaseUrlSource::Override)
        } else if let Some(url) = env_url.filter(non_empty) {
            (url.to_string(), BaseUrlSource::Environment)
        } else if let Some(url) = config.api.base_url.as_deref().filter(non_empty) {
            (url.to_string(), BaseUrlSource::ConfigFile)
        } else {
            (DEFAULT_API_BASE.to_string(), BaseUrlSource::Default)
        };

        let connect_timeout = Duration::from_secs(config.api.connect_timeout_secs.unwrap_or(30));

        Ok(Self {
            base_url: parse_base_url(&raw)?,
            source,
            connect_timeout,
        })
    }
}
