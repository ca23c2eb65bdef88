//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{ApiClientConfig, MonitoringWindow, DEFAULT_BASE_URL};
use crate::auth::REFRESH_WINDOW_SECS;
use crate::session::FileSessionStore;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub monitoring: MonitoringConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote energy API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Where the session record lives
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Defaults to `<data dir>/energy-monitor/auth_tokens.json`
    pub path: Option<String>,
}

/// Token refresh configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_refresh_window")]
    pub refresh_window_secs: i64,
}

fn default_refresh_window() -> i64 {
    REFRESH_WINDOW_SECS
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            refresh_window_secs: default_refresh_window(),
        }
    }
}

/// Monitoring view configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_window_hours")]
    pub window_hours: i64,

    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_timezone_offset")]
    pub timezone_offset_minutes: i32,
}

fn default_poll_interval() -> u64 {
    120 // 2 minutes
}

fn default_window_hours() -> i64 {
    3
}

fn default_timezone() -> String {
    "America/Mexico_City".to_string()
}

fn default_timezone_offset() -> i32 {
    -360
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            window_hours: default_window_hours(),
            timezone: default_timezone(),
            timezone_offset_minutes: default_timezone_offset(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("energy-monitor").join("config.toml")),
            Some(PathBuf::from("/etc/energy-monitor/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("ENERGY_MONITOR_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(path) = std::env::var("ENERGY_MONITOR_SESSION_FILE") {
            self.session.path = Some(path);
        }
        if let Ok(level) = std::env::var("ENERGY_MONITOR_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("ENERGY_MONITOR_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Window sent with every monitoring request
    pub fn monitoring_window(&self) -> MonitoringWindow {
        MonitoringWindow {
            hours: self.monitoring.window_hours,
            timezone: self.monitoring.timezone.clone(),
            timezone_offset_minutes: self.monitoring.timezone_offset_minutes,
        }
    }

    /// Settings for [`crate::api::ApiClient::new`]
    pub fn client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.api.base_url.clone(),
            request_timeout_secs: self.api.request_timeout_secs,
            refresh_window_secs: self.auth.refresh_window_secs,
            monitoring: self.monitoring_window(),
        }
    }

    /// Offset used to render wall-clock times. Out-of-range offsets fall
    /// back to UTC.
    pub fn display_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.monitoring.timezone_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.monitoring.poll_interval_secs.max(1))
    }

    pub fn session_path(&self) -> PathBuf {
        self.session
            .path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(FileSessionStore::default_path)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Energy Monitor Configuration
#
# Environment variables override these settings:
# - ENERGY_MONITOR_API_URL
# - ENERGY_MONITOR_SESSION_FILE
# - ENERGY_MONITOR_LOG_LEVEL
# - ENERGY_MONITOR_LOG_FORMAT

[api]
# Base URL of the energy API ("https://" is assumed when no scheme is given)
base_url = "http://localhost:3001"

# Request timeout in seconds
request_timeout_secs = 30

[session]
# Where the access/refresh tokens are stored
# path = "~/.local/share/energy-monitor/auth_tokens.json"

[auth]
# Refresh the access token when it expires within this many seconds
refresh_window_secs = 300

[monitoring]
# How often the monitoring view re-fetches (seconds)
poll_interval_secs = 120

# Hours of history requested for the realtime chart
window_hours = 3

# Timezone sent to the API and used for displayed times
timezone = "America/Mexico_City"
timezone_offset_minutes = -360

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses_to_defaults() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3001");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.auth.refresh_window_secs, 300);
        assert_eq!(config.monitoring.poll_interval_secs, 120);
        assert_eq!(config.monitoring_window(), MonitoringWindow::default());
        assert!(config.session.path.is_none());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::parse("[api]\nbase_url = \"api.example.com\"\n").unwrap();
        assert_eq!(config.api.base_url, "api.example.com");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.poll_interval(), Duration::from_secs(120));
    }

    #[test]
    fn test_display_offset() {
        let mut config = Config::default();
        assert_eq!(config.display_offset().local_minus_utc(), -6 * 3600);

        config.monitoring.timezone_offset_minutes = 100_000;
        assert_eq!(config.display_offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url =").unwrap();

        match Config::load(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(matches!(
            Config::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_session_path_override() {
        let mut config = Config::default();
        config.session.path = Some("/tmp/tokens.json".to_string());
        assert_eq!(config.session_path(), PathBuf::from("/tmp/tokens.json"));
    }
}
