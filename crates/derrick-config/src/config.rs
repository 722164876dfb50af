//! Configuration schema.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Root configuration for both derrick binaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DerrickConfig {
    /// HTTP read API settings.
    pub server: ServerConfig,
    /// Record store settings.
    pub store: StoreConfig,
    /// Scraper/ingest settings.
    pub scraper: ScraperConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8080".
    pub http_addr: String,
    /// Per-request handling timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Graceful shutdown drain timeout in seconds.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            request_timeout_ms: 30_000,
            shutdown_timeout_secs: 30,
        }
    }
}

/// Record store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Path of the SQLite database file.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "well_data.db".to_string(),
        }
    }
}

/// Scraper and ingest-loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScraperConfig {
    /// Detail-page URL of the portal; the API number is passed as the `api`
    /// query parameter.
    pub detail_url: String,
    /// User-Agent header sent with every fetch.
    pub user_agent: String,
    /// Path of the identifier list: one API number per line, no header.
    pub api_numbers_path: String,
    /// Pause between identifiers, milliseconds. The portal has no published
    /// rate limit; one request per second keeps us polite.
    pub delay_ms: u64,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Fetch attempts per identifier before giving up on it.
    pub retry_attempts: u32,
    /// Default coordinate reference system stamped onto records that have
    /// none. The portal never states one.
    pub default_crs: Option<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            detail_url: "https://wwwapps.emnrd.nm.gov/OCD/OCDPermitting/Data/WellDetails.aspx"
                .to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            api_numbers_path: "api_numbers.csv".to_string(),
            delay_ms: 1000,
            request_timeout_secs: 15,
            retry_attempts: 3,
            default_crs: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON lines.
    Json,
    /// Human-readable output.
    Pretty,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Whether logging is enabled.
    pub enabled: bool,
    /// Filter directive, e.g. "info" or "derrick=debug".
    pub level: String,
    /// Output format.
    pub format: LogFormat,
    /// ANSI colors (pretty format only).
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            ansi: false,
        }
    }
}

impl LoggingConfig {
    /// Converts into the telemetry crate's logging configuration.
    #[must_use]
    pub fn to_log_config(&self) -> derrick_telemetry::LogConfig {
        derrick_telemetry::LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            json_format: self.format == LogFormat::Json,
            ansi: self.ansi,
        }
    }
}

impl DerrickConfig {
    /// Validates the final configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError::Validation`] naming the first unusable
    /// setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::validation_error(format!(
                "server.http_addr '{}' is not a socket address",
                self.server.http_addr
            )));
        }
        if self.store.path.trim().is_empty() {
            return Err(ConfigError::validation_error("store.path is empty"));
        }
        if !self.scraper.detail_url.starts_with("http") {
            return Err(ConfigError::validation_error(format!(
                "scraper.detail_url '{}' is not an http(s) URL",
                self.scraper.detail_url
            )));
        }
        if self.scraper.retry_attempts == 0 {
            return Err(ConfigError::validation_error(
                "scraper.retry_attempts must be at least 1",
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::validation_error("logging.level is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(DerrickConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let config = DerrickConfig::default();
        assert_eq!(config.server.http_addr, "0.0.0.0:8080");
        assert_eq!(config.store.path, "well_data.db");
        assert_eq!(config.scraper.delay_ms, 1000);
        assert_eq!(config.scraper.retry_attempts, 3);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.scraper.default_crs.is_none());
    }

    #[test]
    fn test_bad_addr_fails_validation() {
        let mut config = DerrickConfig::default();
        config.server.http_addr = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_retries_fails_validation() {
        let mut config = DerrickConfig::default();
        config.scraper.retry_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_config_conversion() {
        let mut logging = LoggingConfig::default();
        logging.format = LogFormat::Pretty;
        logging.level = "debug".to_string();

        let log = logging.to_log_config();
        assert!(!log.json_format);
        assert_eq!(log.level, "debug");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: DerrickConfig = toml::from_str(
            r#"
            [server]
            http_addr = "127.0.0.1:3000"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.http_addr, "127.0.0.1:3000");
        // Untouched sections and fields keep their defaults.
        assert_eq!(config.server.request_timeout_ms, 30_000);
        assert_eq!(config.store.path, "well_data.db");
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<DerrickConfig, _> = toml::from_str(
            r#"
            [server]
            http_adr = "typo"
            "#,
        );
        assert!(result.is_err());
    }
}
