//! Configuration error types.

use std::path::Path;

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    ReadError {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing failed.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing failed.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// An environment variable override did not parse.
    #[error("invalid environment override {key}: {reason}")]
    EnvParse {
        /// The offending variable name.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The final configuration is not usable.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl ConfigError {
    /// File-not-found error for `path`.
    pub fn file_not_found(path: &Path) -> Self {
        Self::FileNotFound {
            path: path.display().to_string(),
        }
    }

    /// Read error for `path`.
    pub fn read_error(path: &Path, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.display().to_string(),
            source,
        }
    }

    /// Environment override parse error.
    pub fn env_parse_error(key: &str, reason: impl Into<String>) -> Self {
        Self::EnvParse {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Validation error.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
