//! Logging bootstrap for derrick services.
//!
//! Both binaries initialize structured logging through this crate: an
//! `EnvFilter`-driven `tracing-subscriber` stack emitting JSON for
//! production or a pretty human format for development.

pub mod logging;

pub use logging::{init_logging, LogConfig};

/// Result alias for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors raised while initializing telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Logging initialization failed.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}
