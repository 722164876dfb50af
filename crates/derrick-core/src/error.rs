//! Error types for derrick.
//!
//! [`DerrickError`] is the standard error type shared by the library crates.
//! Each variant belongs to an [`ErrorCategory`], and categories map onto HTTP
//! status codes so the server crate can translate failures into responses
//! without inspecting individual variants.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`DerrickError`].
pub type DerrickResult<T> = Result<T, DerrickError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Request or input validation errors (bad parameters, malformed input).
    Validation,
    /// Resource not found.
    NotFound,
    /// Internal errors (storage, serialization, invariant breakage).
    Internal,
    /// External collaborator errors (the portal, the network).
    External,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::External => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Standard error type for derrick.
///
/// # Example
///
/// ```
/// use derrick_core::{DerrickError, ErrorCategory};
///
/// fn check_document(html: &str) -> Result<(), DerrickError> {
///     if html.trim().is_empty() {
///         return Err(DerrickError::validation("document is empty"));
///     }
///     Ok(())
/// }
///
/// let err = check_document("").unwrap_err();
/// assert_eq!(err.category(), ErrorCategory::Validation);
/// ```
#[derive(Error, Debug)]
pub enum DerrickError {
    /// Input validation failed.
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
    },

    /// Resource not found.
    #[error("not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
        /// The identifier that was looked up, when known.
        resource_id: Option<String>,
    },

    /// Internal error.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
    },

    /// External collaborator failed.
    #[error("external error: {message}")]
    External {
        /// Human-readable error message.
        message: String,
    },
}

impl DerrickError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_id: None,
        }
    }

    /// Creates a not-found error carrying the identifier that missed.
    pub fn not_found_id(message: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_id: Some(resource_id.into()),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates an external-collaborator error.
    pub fn external(message: impl Into<String>) -> Self {
        Self::External {
            message: message.into(),
        }
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Internal { .. } => ErrorCategory::Internal,
            Self::External { .. } => ErrorCategory::External,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Builds the serializable response envelope for this error.
    ///
    /// The envelope carries a short `error` string and, when available, a
    /// `details` string. Internal sources are summarized, never dumped as
    /// backtraces.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        match self {
            Self::Validation { message } => ErrorEnvelope::new(message.clone()),
            Self::NotFound { message, .. } => ErrorEnvelope::new(message.clone()),
            Self::Internal { message } | Self::External { message } => {
                ErrorEnvelope::with_details("An error occurred", message.clone())
            }
        }
    }
}

/// Serializable `{error, details}` payload for error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Short error description.
    pub error: String,
    /// Optional supporting detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorEnvelope {
    /// Envelope with only the `error` field.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Envelope with `error` and `details`.
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
