//! Typed error handling for the dashboard service
//!
//! Everything that crosses the API boundary is a [`DashboardError`], which
//! knows its HTTP status, a stable error code, and how to render itself as a
//! JSON [`ErrorResponse`].
//!
//! # Propagation policy
//!
//! - Validation failures are recovered locally into structured data and
//!   answered with 422 plus per-field messages; they are never raised as
//!   opaque errors.
//! - Persistence failures on create/update are logged where they occur and
//!   then propagated unchanged: a write that silently fails must not report
//!   success.
//! - Persistence failures on delete never reach this type: the delete
//!   operation converts them into a soft structured result (see
//!   `actions::DeleteFailure`), because a failed delete leaves the row
//!   visible and recoverable in place.

use crate::core::validation::FormErrors;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The main error type for the dashboard service
#[derive(Debug)]
pub enum DashboardError {
    /// A form submission failed validation (recovered, per-field messages)
    Validation { message: String, errors: FormErrors },

    /// A write against the store failed
    Storage {
        operation: &'static str,
        source: anyhow::Error,
    },

    /// A referenced row does not exist
    NotFound { resource: &'static str, id: String },

    /// Login with unknown, malformed, or mismatching credentials
    InvalidCredentials,

    /// The process environment is not usable
    Config(ConfigError),

    /// Read-side or otherwise uncategorized failure
    Internal(anyhow::Error),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Validation { message, .. } => write!(f, "{}", message),
            DashboardError::Storage { operation, source } => {
                write!(f, "Failed to {}: {}", operation, source)
            }
            DashboardError::NotFound { resource, id } => {
                write!(f, "{} with id '{}' not found", resource, id)
            }
            DashboardError::InvalidCredentials => write!(f, "Invalid credentials."),
            DashboardError::Config(e) => write!(f, "{}", e),
            DashboardError::Internal(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Storage { source, .. } => Some(source.as_ref()),
            DashboardError::Internal(e) => Some(e.as_ref()),
            DashboardError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for DashboardError {
    fn from(error: anyhow::Error) -> Self {
        DashboardError::Internal(error)
    }
}

impl From<ConfigError> for DashboardError {
    fn from(error: ConfigError) -> Self {
        DashboardError::Config(error)
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Field → message list, present for validation failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl DashboardError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            DashboardError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::NotFound { .. } => StatusCode::NOT_FOUND,
            DashboardError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            DashboardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::Validation { .. } => "VALIDATION_ERROR",
            DashboardError::Storage { .. } => "STORAGE_ERROR",
            DashboardError::NotFound { .. } => "NOT_FOUND",
            DashboardError::InvalidCredentials => "INVALID_CREDENTIALS",
            DashboardError::Config(_) => "CONFIG_ERROR",
            DashboardError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response body
    pub fn to_response(&self) -> ErrorResponse {
        let errors = match self {
            DashboardError::Validation { errors, .. } => Some(
                errors
                    .messages()
                    .into_iter()
                    .map(|(field, messages)| {
                        (
                            field.to_string(),
                            messages.into_iter().map(str::to_string).collect(),
                        )
                    })
                    .collect(),
            ),
            _ => None,
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            errors,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Configuration errors
// =============================================================================

/// Errors raised while reading configuration from the environment
#[derive(Debug)]
pub enum ConfigError {
    /// One or more required environment variables are unset
    MissingVars(Vec<&'static str>),

    /// A variable is set but does not parse
    Invalid {
        name: &'static str,
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVars(names) => {
                write!(
                    f,
                    "Missing required environment variables for database configuration: {}",
                    names.join(", ")
                )
            }
            ConfigError::Invalid { name, message } => {
                write!(f, "Invalid value for {}: {}", name, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
