//! Typed, layered configuration for derrick services.
//!
//! Configuration is applied in layers, later layers overriding earlier ones:
//! built-in defaults, then an optional TOML/JSON file, then environment
//! variables of the form `DERRICK__SECTION__KEY`. Both binaries load their
//! settings through [`ConfigLoader`].

pub mod config;
pub mod error;
pub mod loader;

pub use config::{
    DerrickConfig, LogFormat, LoggingConfig, ScraperConfig, ServerConfig, StoreConfig,
};
pub use error::ConfigError;
pub use loader::ConfigLoader;

/// The conventional environment variable prefix.
pub const ENV_PREFIX: &str = "DERRICK";
