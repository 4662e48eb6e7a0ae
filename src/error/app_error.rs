use axum::extract::rejection::{JsonRejection, QueryRejection};
use thiserror::Error;

use crate::error::DatabaseErrorConverter;

/// Application-wide error type that represents all possible errors in the
/// system.
///
/// This enum provides structured error handling for the different failure
/// scenarios, supporting automatic conversion from anyhow, diesel, and
/// request-extractor errors with enough context for debugging and user
/// feedback.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Duplicate entry error for unique constraint violations
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors from request body validation
    #[error("Validation failed for {} field(s)", errors.len())]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(error: crate::config::ConfigError) -> Self {
        match error {
            crate::config::ConfigError::ValidationError { field, message } => {
                AppError::Validation {
                    field,
                    reason: message,
                }
            }
            other => AppError::Configuration {
                key: "configuration".to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }
}

impl From<diesel_async::pooled_connection::bb8::RunError> for AppError {
    fn from(error: diesel_async::pooled_connection::bb8::RunError) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::from(error),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let errors = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, failures)| {
                failures.iter().map(move |failure| ValidationFieldError {
                    field: field.to_string(),
                    message: failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {field}")),
                })
            })
            .collect();
        AppError::ValidationErrors { errors }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
