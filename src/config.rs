//! Top-level application configuration.
//!
//! Configuration is stored in `config.yaml` under the platform config
//! directory and includes:
//! - The base URL of the account service
//! - The request timeout
//! - How long success notifications stay visible
//!
//! `ROSTER_CONFIG_DIR` and `ROSTER_DATA_DIR` relocate the config and session
//! storage directories; `ROSTER_BASE_URL` overrides the configured base URL.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

pub const DEFAULT_BASE_URL: &str = "https://reqres.in";

/// Keys accepted by `roster config get/set`
pub const CONFIG_KEYS: &[&str] = &["base_url", "request_timeout", "notice_ttl"];

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the account service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Lifetime of success notifications in seconds (default: 3)
    #[serde(default = "default_notice_ttl")]
    pub notice_ttl: u64,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_notice_ttl() -> u64 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout: default_request_timeout(),
            notice_ttl: default_notice_ttl(),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "roster", "roster")
        .ok_or_else(|| RosterError::Config("could not determine a home directory".to_string()))
}

fn dir_from_env(var: &str) -> Option<PathBuf> {
    env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

impl Config {
    /// Directory holding `config.yaml`
    pub fn config_dir() -> Result<PathBuf> {
        match dir_from_env("ROSTER_CONFIG_DIR") {
            Some(dir) => Ok(dir),
            None => Ok(project_dirs()?.config_dir().to_path_buf()),
        }
    }

    /// Directory holding persistent session storage
    pub fn data_dir() -> Result<PathBuf> {
        match dir_from_env("ROSTER_DATA_DIR") {
            Some(dir) => Ok(dir),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.yaml"))
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            RosterError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RosterError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).map_err(|e| {
            RosterError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;
        Ok(())
    }

    /// Base URL from `ROSTER_BASE_URL`, the config file, or the default
    pub fn base_url(&self) -> String {
        if let Ok(url) = env::var("ROSTER_BASE_URL")
            && !url.is_empty()
        {
            return url;
        }

        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_ttl)
    }

    /// Read a single value by key
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "base_url" => Ok(self.base_url()),
            "request_timeout" => Ok(self.request_timeout.to_string()),
            "notice_ttl" => Ok(self.notice_ttl.to_string()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a single value by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" => {
                crate::directory::http::parse_base_url(value)?;
                self.base_url = Some(value.trim().to_string());
            }
            "request_timeout" => {
                let seconds = parse_seconds(key, value)?;
                if seconds == 0 {
                    return Err(RosterError::Config(
                        "request_timeout must be at least 1 second".to_string(),
                    ));
                }
                self.request_timeout = seconds;
            }
            "notice_ttl" => self.notice_ttl = parse_seconds(key, value)?,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn parse_seconds(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        RosterError::Config(format!(
            "invalid value '{value}' for {key}: expected a number of seconds"
        ))
    })
}

fn unknown_key(key: &str) -> RosterError {
    RosterError::Config(format!(
        "unknown config key '{key}', expected one of: {}",
        CONFIG_KEYS.join(", ")
    ))
}
