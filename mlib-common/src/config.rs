//! Configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables (surfaced through the same overrides)
//! 3. TOML configuration file
//! 4. Compiled defaults (fallback)
//!
//! The resolved [`Config`] is constructed once at startup and handed to each
//! component explicitly; nothing here keeps process-wide state.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "music_library.toml";

/// Complete service configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub lyrics_api: LyricsApiConfig,
    pub logging: LoggingConfig,
    /// File the settings were read from; `None` when running on defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds in-flight requests get to finish after a shutdown signal
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_grace_secs: 5,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// SQLite database settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file (created on first run)
    pub path: PathBuf,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("music_library.db"),
            max_connections: 10,
        }
    }
}

/// External lyrics lookup service
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LyricsApiConfig {
    /// Base URL; the client requests `{base_url}/info`
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for LyricsApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            timeout_secs: 10,
        }
    }
}

impl LyricsApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Where log lines are written
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    File,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    pub output: LogOutput,
    /// Log file path, required when `output = "file"`
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Stdout,
            file: None,
        }
    }
}

/// Command-line and environment overrides applied on top of the TOML file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub lyrics_api_url: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from the TOML file and apply overrides
    ///
    /// An explicitly requested config file must exist. When no path is given,
    /// a missing `music_library.toml` falls back to compiled defaults. The
    /// outcome is recorded in [`Config::source`] for the caller to log once
    /// tracing is up.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let explicit = overrides.config_path.is_some();
        let path = overrides
            .config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            let mut config = Self::from_file(&path)?;
            config.source = Some(path);
            config
        } else if explicit {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        } else {
            Config::default()
        };

        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(path) = overrides.database_path {
            self.database.path = path;
        }
        if let Some(url) = overrides.lyrics_api_url {
            self.lyrics_api.base_url = url;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Reject settings the service cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            return Err(Error::Config(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        let url = self.lyrics_api.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "lyrics_api.base_url must be an http(s) URL, got '{}'",
                url
            )));
        }

        if self.logging.output == LogOutput::File && self.logging.file.is_none() {
            return Err(Error::Config(
                "logging.file is required when logging.output = \"file\"".to_string(),
            ));
        }

        Ok(())
    }
}
