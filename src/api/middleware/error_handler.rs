//! Error handler for converting AppError to HTTP responses.
//!
//! This module implements the IntoResponse trait for AppError,
//! providing consistent error response formatting across the API.
//! Internal error sources are logged server-side and never leak into
//! the response body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - NotFound → 404 NOT_FOUND
    /// - Duplicate → 409 CONFLICT
    /// - Validation → 400 BAD_REQUEST
    /// - ValidationErrors → 400 BAD_REQUEST
    /// - BadRequest → 400 BAD_REQUEST
    /// - Database → 500 INTERNAL_SERVER_ERROR
    /// - Configuration → 500 INTERNAL_SERVER_ERROR
    /// - ConnectionPool → 503 SERVICE_UNAVAILABLE
    /// - Internal → 500 INTERNAL_SERVER_ERROR
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);

        // Log server-side before sanitizing. Sources carry connection
        // strings and SQL fragments that must not reach the client.
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else if status == StatusCode::SERVICE_UNAVAILABLE {
            tracing::warn!(error = ?self, "Request rejected, database unavailable");
        }

        let error_response = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::not_found_error(entity, field, value),
            AppError::Duplicate {
                entity,
                field,
                value,
            } => ErrorResponse::duplicate_error(entity, field, value),
            AppError::Validation { field, reason } => {
                ErrorResponse::validation_error(field, reason)
            }
            AppError::ValidationErrors { errors } => {
                let fields: Vec<_> = errors
                    .iter()
                    .map(|e| json!({ "field": e.field, "message": e.message }))
                    .collect();
                ErrorResponse::new("VALIDATION_ERROR", "Validation failed")
                    .with_details(json!({ "errors": fields }))
            }
            AppError::BadRequest { message } => ErrorResponse::new("BAD_REQUEST", message),
            AppError::Database { operation, .. } => ErrorResponse::new(
                "DATABASE_ERROR",
                format!("Database operation failed: {}", operation),
            )
            .with_details(json!({ "operation": operation })),
            AppError::Configuration { key, .. } => {
                ErrorResponse::new("CONFIGURATION_ERROR", format!("Configuration error: {}", key))
                    .with_details(json!({ "key": key }))
            }
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable")
            }
            AppError::Internal { .. } => {
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::ValidationErrors { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFieldError;

    async fn response_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_not_found_status_code() {
        let error = AppError::NotFound {
            entity: "EpgSource".to_string(),
            field: "id".to_string(),
            value: "123".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_duplicate_status_code() {
        let error = AppError::Duplicate {
            entity: "PeriodicTask".to_string(),
            field: "name".to_string(),
            value: "recron_epg_1".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_status_code() {
        let error = AppError::Validation {
            field: "timezone".to_string(),
            reason: "must not be empty".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_errors_status_code() {
        let error = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "kind".to_string(),
                message: "Source kind must be 'epg' or 'playlist'".to_string(),
            }],
        };
        assert_eq!(error_to_status_code(&error), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bad_request_status_code() {
        let error = AppError::BadRequest {
            message: "Invalid input".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_database_status_code() {
        let error = AppError::Database {
            operation: "sync schedules".to_string(),
            source: anyhow::anyhow!("Connection failed"),
        };
        assert_eq!(
            error_to_status_code(&error),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_configuration_status_code() {
        let error = AppError::Configuration {
            key: "database.url".to_string(),
            source: anyhow::anyhow!("Missing config"),
        };
        assert_eq!(
            error_to_status_code(&error),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_connection_pool_status_code() {
        let error = AppError::ConnectionPool {
            source: anyhow::anyhow!("Pool exhausted"),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_internal_status_code() {
        let error = AppError::Internal {
            source: anyhow::anyhow!("Unexpected error"),
        };
        assert_eq!(
            error_to_status_code(&error),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_not_found_response_body() {
        let error = AppError::NotFound {
            entity: "PeriodicTask".to_string(),
            field: "name".to_string(),
            value: "recron_epg_9".to_string(),
        };

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response_body(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["message"], "PeriodicTask with name 'recron_epg_9' not found");
    }

    #[tokio::test]
    async fn test_duplicate_response_body() {
        let error = AppError::Duplicate {
            entity: "PeriodicTask".to_string(),
            field: "name".to_string(),
            value: "recron_playlist_3".to_string(),
        };

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = response_body(response).await;
        assert_eq!(body["code"], "DUPLICATE");
        assert_eq!(body["details"]["value"], "recron_playlist_3");
    }

    #[tokio::test]
    async fn test_validation_response_body() {
        let error = AppError::Validation {
            field: "timezone".to_string(),
            reason: "must not be empty".to_string(),
        };

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_body(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["field"], "timezone");
    }

    #[tokio::test]
    async fn test_validation_errors_response_lists_fields() {
        let error = AppError::ValidationErrors {
            errors: vec![
                ValidationFieldError {
                    field: "timezone".to_string(),
                    message: "Timezone must not be empty".to_string(),
                },
                ValidationFieldError {
                    field: "kind".to_string(),
                    message: "Source kind must be 'epg' or 'playlist'".to_string(),
                },
            ],
        };

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_body(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["errors"].as_array().unwrap().len(), 2);
        assert_eq!(body["details"]["errors"][0]["field"], "timezone");
    }

    #[tokio::test]
    async fn test_internal_error_body_is_sanitized() {
        let error = AppError::Internal {
            source: anyhow::anyhow!("postgres://user:secret@db/recron exploded"),
        };

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response_body(response).await;
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert_eq!(body["message"], "An internal error occurred");
        assert!(!body.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_database_error_body_names_operation_only() {
        let error = AppError::Database {
            operation: "list periodic tasks".to_string(),
            source: anyhow::anyhow!("relation does not exist"),
        };

        let response = error.into_response();
        let body = response_body(response).await;

        assert_eq!(body["code"], "DATABASE_ERROR");
        assert_eq!(body["details"]["operation"], "list periodic tasks");
        assert!(!body.to_string().contains("relation"));
    }

    #[tokio::test]
    async fn test_connection_pool_error_body() {
        let error = AppError::ConnectionPool {
            source: anyhow::anyhow!("timed out waiting for connection"),
        };

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = response_body(response).await;
        assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
        assert_eq!(body["message"], "Database connection unavailable");
    }
}
