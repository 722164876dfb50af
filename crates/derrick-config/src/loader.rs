//! Configuration loader with layered approach.
//!
//! The loader applies configuration in layers, with later layers overriding
//! earlier ones:
//! 1. Default values (built into the code)
//! 2. Configuration file (TOML or JSON)
//! 3. Environment variables (`DERRICK__SECTION__KEY`)

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::config::LogFormat;
use crate::{ConfigError, DerrickConfig};

/// Layered configuration loader.
///
/// # Example
///
/// ```no_run
/// use derrick_config::{ConfigLoader, ENV_PREFIX};
///
/// # fn main() -> Result<(), derrick_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_dotenv()
///     .with_optional_file("derrick.toml")?
///     .with_env_prefix(ENV_PREFIX)
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: DerrickConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Creates a loader seeded with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: DerrickConfig::default(),
            env_prefix: None,
        }
    }

    /// Loads configuration from a TOML (`.toml`) or JSON (`.json`) file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file is missing, unreadable, or
    /// does not parse.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Loads configuration from a file when it exists; silently keeps the
    /// current layer otherwise.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string in the given format ("toml" or
    /// "json").
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };
        Ok(self)
    }

    /// Sets the environment variable prefix for overrides, applied at
    /// [`ConfigLoader::load`]. Variables use the form
    /// `PREFIX__SECTION__KEY`, e.g. `DERRICK__SERVER__HTTP_ADDR`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Loads a `.env` file into the process environment when present.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        let _ = dotenvy::dotenv();
        self
    }

    /// Applies environment overrides and validates the final configuration.
    pub fn load(mut self) -> Result<DerrickConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }
        self.config.validate()?;
        Ok(self.config)
    }

    fn parse_file(content: &str, path: &Path) -> Result<DerrickConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::validation_error(format!(
                "unsupported configuration file format: {}",
                path.display()
            ))),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let env_vars: HashMap<String, String> = env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();
        for (key, value) in env_vars {
            self.apply_env_var(&key, &value, prefix)?;
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();

        match parts.as_slice() {
            ["SERVER", "HTTP_ADDR"] => {
                self.config.server.http_addr = value.to_string();
            }
            ["SERVER", "REQUEST_TIMEOUT_MS"] => {
                self.config.server.request_timeout_ms = parse_int(key, value)?;
            }
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                self.config.server.shutdown_timeout_secs = parse_int(key, value)?;
            }

            ["STORE", "PATH"] => {
                self.config.store.path = value.to_string();
            }

            ["SCRAPER", "DETAIL_URL"] => {
                self.config.scraper.detail_url = value.to_string();
            }
            ["SCRAPER", "USER_AGENT"] => {
                self.config.scraper.user_agent = value.to_string();
            }
            ["SCRAPER", "API_NUMBERS_PATH"] => {
                self.config.scraper.api_numbers_path = value.to_string();
            }
            ["SCRAPER", "DELAY_MS"] => {
                self.config.scraper.delay_ms = parse_int(key, value)?;
            }
            ["SCRAPER", "REQUEST_TIMEOUT_SECS"] => {
                self.config.scraper.request_timeout_secs = parse_int(key, value)?;
            }
            ["SCRAPER", "RETRY_ATTEMPTS"] => {
                self.config.scraper.retry_attempts = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }
            ["SCRAPER", "DEFAULT_CRS"] => {
                self.config.scraper.default_crs = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }

            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "ANSI"] => {
                self.config.logging.ansi = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            // Unknown key - ignore (could also warn)
            _ => {}
        }

        Ok(())
    }
}

fn parse_int(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_defaults() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config.server.http_addr, "0.0.0.0:8080");
        assert_eq!(config.store.path, "well_data.db");
    }

    #[test]
    fn test_loader_with_string_toml() {
        let toml = r#"
            [server]
            http_addr = "127.0.0.1:3000"

            [scraper]
            delay_ms = 250
        "#;
        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.server.http_addr, "127.0.0.1:3000");
        assert_eq!(config.scraper.delay_ms, 250);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"store": {"path": "/tmp/wells.db"}}"#;
        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.store.path, "/tmp/wells.db");
    }

    #[test]
    fn test_loader_with_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"\nformat = \"pretty\"").unwrap();

        let config = ConfigLoader::new()
            .with_file(file.path())
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_with_file_not_found() {
        assert!(ConfigLoader::new()
            .with_file("/nonexistent/derrick.toml")
            .is_err());
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/derrick.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.server.http_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_apply_env_var_server_addr() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__SERVER__HTTP_ADDR", "192.168.1.1:9000", "TEST")
            .unwrap();
        assert_eq!(loader.config.server.http_addr, "192.168.1.1:9000");
    }

    #[test]
    fn test_apply_env_var_scraper() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__SCRAPER__DELAY_MS", "2000", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__SCRAPER__DEFAULT_CRS", "NAD83", "TEST")
            .unwrap();
        assert_eq!(loader.config.scraper.delay_ms, 2000);
        assert_eq!(loader.config.scraper.default_crs.as_deref(), Some("NAD83"));
    }

    #[test]
    fn test_apply_env_var_invalid_integer() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_var("TEST__SCRAPER__DELAY_MS", "fast", "TEST");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_env_var_log_format() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__LOGGING__FORMAT", "pretty", "TEST")
            .unwrap();
        assert_eq!(loader.config.logging.format, LogFormat::Pretty);

        let bad = loader.apply_env_var("TEST__LOGGING__FORMAT", "xml", "TEST");
        assert!(bad.is_err());
    }

    #[test]
    fn test_apply_env_var_unknown_key_is_ignored() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__NOPE__NOTHING", "x", "TEST")
            .unwrap();
        assert_eq!(loader.config, DerrickConfig::default());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_complete_toml_config() {
        let toml = r#"
            [server]
            http_addr = "0.0.0.0:8080"
            request_timeout_ms = 15000
            shutdown_timeout_secs = 60

            [store]
            path = "/var/lib/derrick/wells.db"

            [scraper]
            detail_url = "https://portal.example/WellDetails.aspx"
            api_numbers_path = "ids.csv"
            delay_ms = 1500
            request_timeout_secs = 20
            retry_attempts = 5
            default_crs = "NAD83"

            [logging]
            enabled = true
            level = "info"
            format = "json"
            ansi = false
        "#;
        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.store.path, "/var/lib/derrick/wells.db");
        assert_eq!(config.scraper.retry_attempts, 5);
        assert_eq!(config.scraper.default_crs.as_deref(), Some("NAD83"));
        assert_eq!(config.server.shutdown_timeout_secs, 60);
    }
}
