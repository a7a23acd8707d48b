/*!
 * Service configuration
 *
 * Values are layered: built-in defaults, then an optional TOML file, then
 * environment variables. Command-line flags are applied on top by the binary.
 */

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wizard_server::{RateLimitConfig, ServerConfig};

use crate::error::{Result, WizardError};

/// Complete configuration for one service instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite file holding cached system coordinates
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// ESI root, without the `/universe/...` suffix
    #[serde(default = "default_esi_base_url")]
    pub esi_base_url: String,

    /// Upper bound on one ESI request, in seconds
    #[serde(default = "default_esi_timeout_secs")]
    pub esi_timeout_secs: u64,

    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    #[serde(default)]
    pub log_level: LogLevel,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log file path (None = stdout)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            esi_base_url: default_esi_base_url(),
            esi_timeout_secs: default_esi_timeout_secs(),
            rate_limit: RateLimitSettings::default(),
            log_level: LogLevel::default(),
            log_format: LogFormat::default(),
            log_file: None,
        }
    }
}

/// Per-client quotas as written in config files. Zero is rejected when the
/// config is turned into a [`ServerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_per_minute")]
    pub per_minute: u32,

    #[serde(default = "default_per_hour")]
    pub per_hour: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            per_minute: default_per_minute(),
            per_hour: default_per_hour(),
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Output format for stdout logging. File logging is always JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| WizardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents)
            .map_err(|e| WizardError::config(format!("{}: {}", path.display(), e)))
    }

    /// Defaults or the given file, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from environment-style variables.
    ///
    /// `lookup` returns the value of a variable, or `None` when it is unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("API_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("API_PORT") {
            self.port = parse_number("API_PORT", &port)?;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("ESI_BASE_URL") {
            self.esi_base_url = url;
        }
        if let Some(enabled) = lookup("RATE_LIMIT_ENABLED") {
            self.rate_limit.enabled = parse_bool("RATE_LIMIT_ENABLED", &enabled)?;
        }
        if let Some(limit) = lookup("RATE_LIMIT_PER_MINUTE") {
            self.rate_limit.per_minute = parse_number("RATE_LIMIT_PER_MINUTE", &limit)?;
        }
        if let Some(limit) = lookup("RATE_LIMIT_PER_HOUR") {
            self.rate_limit.per_hour = parse_number("RATE_LIMIT_PER_HOUR", &limit)?;
        }
        if let Some(debug) = lookup("DEBUG") {
            if parse_bool("DEBUG", &debug)? {
                self.log_level = LogLevel::Debug;
            }
        }
        Ok(())
    }

    /// Validate and convert into the server's runtime configuration
    pub fn to_server_config(&self) -> Result<ServerConfig> {
        if self.host.trim().is_empty() {
            return Err(WizardError::config("host must not be empty"));
        }
        if self.esi_timeout_secs == 0 {
            return Err(WizardError::config("esi_timeout_secs must be greater than zero"));
        }

        Ok(ServerConfig {
            host: self.host.clone(),
            port: self.port,
            database_path: self.database_path.to_string_lossy().into_owned(),
            esi_base_url: self.esi_base_url.clone(),
            esi_timeout: Duration::from_secs(self.esi_timeout_secs),
            rate_limit: RateLimitConfig {
                enabled: self.rate_limit.enabled,
                per_minute: non_zero("rate_limit.per_minute", self.rate_limit.per_minute)?,
                per_hour: non_zero("rate_limit.per_hour", self.rate_limit.per_hour)?,
            },
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| WizardError::config(format!("{} must be a number, got {:?}", key, value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(WizardError::config(format!(
            "{} must be true or false, got {:?}",
            key, value
        ))),
    }
}

fn non_zero(key: &str, value: u32) -> Result<NonZeroU32> {
    NonZeroU32::new(value)
        .ok_or_else(|| WizardError::config(format!("{} must be greater than zero", key)))
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("wizard_calculator.db")
}

fn default_esi_base_url() -> String {
    system_cache::ESI_BASE_URL.to_string()
}

fn default_esi_timeout_secs() -> u64 {
    system_cache::DEFAULT_TIMEOUT.as_secs()
}

fn default_per_minute() -> u32 {
    60
}

fn default_per_hour() -> u32 {
    1000
}
