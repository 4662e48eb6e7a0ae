//! Error response DTOs.

use serde::Serialize;
use serde_json::{Value as JsonValue, json};
use utoipa::ToSchema;

/// Standard error response format.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "code": "NOT_FOUND",
    "message": "EpgSource with id '42' not found",
    "request_id": "0f8fad5b-d9cb-469f-a165-70867728950e"
}))]
pub struct ErrorResponse {
    /// Machine-readable error code
    #[schema(example = "NOT_FOUND")]
    pub code: String,

    /// Human-readable error message
    #[schema(example = "EpgSource with id '42' not found")]
    pub message: String,

    /// Optional structured details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<JsonValue>,

    /// Request ID for correlating with logs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response with the given code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            request_id: None,
        }
    }

    /// Attaches structured details to the response.
    pub fn with_details(mut self, details: JsonValue) -> Self {
        self.details = Some(details);
        self
    }

    /// Attaches a request ID for log correlation.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Creates a not-found error response.
    pub fn not_found_error(entity: &str, field: &str, value: &str) -> Self {
        Self::new(
            "NOT_FOUND",
            format!("{} with {} '{}' not found", entity, field, value),
        )
    }

    /// Creates a duplicate-resource error response.
    pub fn duplicate_error(entity: &str, field: &str, value: &str) -> Self {
        Self::new(
            "DUPLICATE",
            format!("{} with {} '{}' already exists", entity, field, value),
        )
        .with_details(json!({ "entity": entity, "field": field, "value": value }))
    }

    /// Creates a single-field validation error response.
    pub fn validation_error(field: &str, reason: &str) -> Self {
        Self::new("VALIDATION_ERROR", format!("{}: {}", field, reason))
            .with_details(json!({ "field": field, "reason": reason }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serialization_skips_empty_fields() {
        let response = ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred");
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["code"], "INTERNAL_ERROR");
        assert_eq!(value["message"], "An internal error occurred");
        assert!(value.get("details").is_none());
        assert!(value.get("request_id").is_none());
    }

    #[test]
    fn test_error_response_with_details_and_request_id() {
        let response = ErrorResponse::new("DATABASE_ERROR", "Database operation failed")
            .with_details(json!({ "operation": "sync schedules" }))
            .with_request_id("req-123");
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["details"]["operation"], "sync schedules");
        assert_eq!(value["request_id"], "req-123");
    }

    #[test]
    fn test_not_found_error_message() {
        let response = ErrorResponse::not_found_error("EpgSource", "id", "42");

        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.message, "EpgSource with id '42' not found");
    }

    #[test]
    fn test_duplicate_error_details() {
        let response = ErrorResponse::duplicate_error("PeriodicTask", "name", "recron_epg_1");
        let details = response.details.unwrap();

        assert_eq!(response.code, "DUPLICATE");
        assert_eq!(details["field"], "name");
        assert_eq!(details["value"], "recron_epg_1");
    }

    #[test]
    fn test_validation_error_shape() {
        let response = ErrorResponse::validation_error("timezone", "must not be empty");

        assert_eq!(response.code, "VALIDATION_ERROR");
        assert_eq!(response.message, "timezone: must not be empty");
    }
}
