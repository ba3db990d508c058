//! Configuration loading and constants.
//!
//! Every setting has a built-in default, so the service runs with no file at all.
//! An optional TOML file can override the bind address, logging format and drain
//! timeout. The initial health state comes only from the `HEALTH_START_STATE`
//! environment variable, read once at startup.

use const_format::formatcp;
use serde::Deserialize;
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::health::HealthState;

// =============================================================================
// Network Defaults
// =============================================================================

/// Listen on all interfaces
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Port probed by the load balancer
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Time in-flight requests get to finish after a shutdown signal
pub const DEFAULT_DRAIN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Paths and Strings
// =============================================================================

/// Health probe path
pub const HEALTHZ_PATH: &str = "/healthz";

/// Local-only admin toggle path
pub const SET_HEALTH_PATH: &str = "/admin/set-health";

/// Environment variable selecting the startup health state
pub const HEALTH_START_STATE_ENV: &str = "HEALTH_START_STATE";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "immutable_health=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// First line of the landing banner
pub const BANNER_TITLE: &str = "Immutable Infrastructure POC Running!";

// =============================================================================
// Response Bodies
// =============================================================================

pub const METHOD_NOT_ALLOWED_BODY: &str = "Only GET is supported.";

pub const FORBIDDEN_BODY: &str = formatcp!("Forbidden: {} is local-only.", SET_HEALTH_PATH);

pub const BAD_REQUEST_BODY: &str = formatcp!(
    "Bad Request: state must be {} or {}.",
    HealthState::Healthy.as_str(),
    HealthState::Unhealthy.as_str()
);

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server configuration
    pub http: HttpServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Initial health state, never read from the file
    #[serde(skip)]
    pub start_state: HealthState,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub drain_timeout_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            drain_timeout_seconds: DEFAULT_DRAIN_TIMEOUT_SECS,
        }
    }
}

impl HttpServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Validation(format!("Invalid http.host or http.port: {}", e)))
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_seconds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults, then apply the environment.
    pub fn resolve(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_start_state_env(std::env::var_os(HEALTH_START_STATE_ENV).as_deref());
        Ok(config)
    }

    /// Seed the start state from a raw `HEALTH_START_STATE` value.
    ///
    /// Absent, unreadable (non UTF-8) and unrecognised values all mean `Healthy`.
    pub fn apply_start_state_env(&mut self, value: Option<&OsStr>) {
        let value = value.map(|v| v.to_str().unwrap_or_default());
        self.start_state = HealthState::from_start_env(value);
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.format.as_str() {
            "text" | "json" => {}
            other => {
                return Err(ConfigError::Validation(format!(
                    "Unknown logging.format '{}', expected \"text\" or \"json\"",
                    other
                )))
            }
        }
        self.http.socket_addr()?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.start_state, HealthState::Healthy);
        assert!(!config.logging.is_json());
        assert_eq!(DEFAULT_LOG_FILTER, "immutable_health=info");
        assert_eq!(
            config.http.socket_addr().unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_error_bodies() {
        assert_eq!(FORBIDDEN_BODY, "Forbidden: /admin/set-health is local-only.");
        assert_eq!(BAD_REQUEST_BODY, "Bad Request: state must be Healthy or Unhealthy.");
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let config = AppConfig::parse(
            r#"
            [http]
            port = 9090
            "#,
        )
        .unwrap();
        assert_eq!(config.http.port, 9090);
        assert_eq!(config.http.host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http.drain_timeout_seconds, DEFAULT_DRAIN_TIMEOUT_SECS);
        assert_eq!(config.start_state, HealthState::Healthy);
    }

    #[test]
    fn test_parse_rejects_unknown_log_format() {
        let err = AppConfig::parse("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_parse_rejects_bad_host() {
        let err = AppConfig::parse("[http]\nhost = \"not an address\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nformat = \"json\"").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_file_cannot_set_start_state() {
        let mut config = AppConfig::parse("[health]\nstart_state = \"Unhealthy\"\n").unwrap();
        assert_eq!(config.start_state, HealthState::Healthy);

        config.apply_start_state_env(None);
        assert_eq!(config.start_state, HealthState::Healthy);
    }

    #[test]
    fn test_start_state_from_env_value() {
        let mut config = AppConfig::default();

        config.apply_start_state_env(Some(OsStr::new("UNHEALTHY")));
        assert_eq!(config.start_state, HealthState::Unhealthy);

        config.apply_start_state_env(Some(OsStr::new("anything")));
        assert_eq!(config.start_state, HealthState::Healthy);

        config.apply_start_state_env(Some(OsStr::new("unhealthy")));
        config.apply_start_state_env(None);
        assert_eq!(config.start_state, HealthState::Healthy);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_env_value_is_healthy() {
        use std::os::unix::ffi::OsStrExt;

        let mut config = AppConfig::default();
        config.start_state = HealthState::Unhealthy;
        config.apply_start_state_env(Some(OsStr::from_bytes(b"Unhealth\xff")));
        assert_eq!(config.start_state, HealthState::Healthy);
    }
}
