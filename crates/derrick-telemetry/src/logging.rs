//! Structured logging setup.
//!
//! JSON output for production, pretty output for development, both behind a
//! `tracing_subscriber::EnvFilter` so `RUST_LOG`-style directives work.
//!
//! # Example
//!
//! ```rust,ignore
//! use derrick_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(api_number = "30-015-12345", "record saved");
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::{TelemetryError, TelemetryResult};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled at all.
    pub enabled: bool,
    /// Filter directive (e.g. "info", "derrick=debug").
    pub level: String,
    /// JSON output when true, pretty output when false.
    pub json_format: bool,
    /// ANSI colors for the pretty format.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            ansi: false,
        }
    }
}

impl LogConfig {
    /// Human-readable debug logging for local development.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            ansi: true,
        }
    }
}

/// Initializes the global subscriber from the given configuration.
///
/// # Errors
///
/// Returns [`TelemetryError::LoggingInit`] when the level filter does not
/// parse or when a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| TelemetryError::LoggingInit(format!("invalid log level: {e}")))?;

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(filter);
        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(config.ansi)
            .with_target(true)
            .with_filter(filter);
        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert!(config.enabled);
        assert!(config.json_format);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_development_config() {
        let config = LogConfig::development();
        assert!(!config.json_format);
        assert!(config.ansi);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_disabled_logging_is_a_no_op() {
        let config = LogConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(init_logging(&config).is_ok());
        // Calling again stays fine; nothing was installed.
        assert!(init_logging(&config).is_ok());
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let config = LogConfig {
            level: "not a valid filter directive".to_string(),
            ..Default::default()
        };
        assert!(init_logging(&config).is_err());
    }
}
