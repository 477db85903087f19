//! Configuration loading from file and environment variables.

use beerstore_db::DbRuntimeSettings;
use serde::Deserialize;
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// SQLite busy timeout, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "beerstore_beer=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_db_path() -> String {
    "beer.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    DbRuntimeSettings::default().busy_timeout_ms
}

fn default_pool_max_size() -> u32 {
    DbRuntimeSettings::default().pool_max_size
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl DatabaseConfig {
    /// Pool tunables derived from this section.
    pub fn runtime_settings(&self) -> DbRuntimeSettings {
        DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Returns the configuration and whether the file existed. A missing file
/// is not an error; the caller decides how to report it.
///
/// Environment variable overrides:
/// - `BEERSTORE_DB_PATH` overrides `database.path`
/// - `BEERSTORE_DB_BUSY_TIMEOUT_MS` overrides `database.busy_timeout_ms`
/// - `BEERSTORE_DB_POOL_MAX_SIZE` overrides `database.pool_max_size` (must be positive)
/// - `BEERSTORE_LOG_LEVEL` overrides `logging.level`
/// - `BEERSTORE_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: &str) -> Result<(Config, bool), ConfigError> {
    let (mut config, found) = match std::fs::read_to_string(path) {
        Ok(contents) => (toml::from_str(&contents)?, true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (Config::default(), false),
        Err(e) => return Err(ConfigError::FileRead(e)),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok((config, found))
}

fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(db_path) = var("BEERSTORE_DB_PATH") {
        config.database.path = db_path;
    }
    if let Some(parsed) = var("BEERSTORE_DB_BUSY_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
        config.database.busy_timeout_ms = parsed;
    }
    if let Some(parsed) = var("BEERSTORE_DB_POOL_MAX_SIZE")
        .and_then(|v| v.parse().ok())
        .filter(|&size: &u32| size > 0)
    {
        config.database.pool_max_size = parsed;
    }
    if let Some(level) = var("BEERSTORE_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("BEERSTORE_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
}
