//! Request ID middleware for request tracing.
//!
//! This middleware ensures every request has a unique identifier for tracing
//! and correlation purposes. It either uses an existing X-Request-ID header
//! or generates a new UUID.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID stored in request extensions for downstream access.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Middleware that ensures every request has a unique request ID.
///
/// # Behavior
/// - If the request contains an X-Request-ID header, uses that value
/// - If no header is present, generates a new UUID v4
/// - Stores the request ID in request extensions for downstream handlers
/// - Adds the request ID to the response headers
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    // Get existing request ID from header or generate new one
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // Store in request extensions for downstream access
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    // Process request
    let mut response = next.run(request).await;

    // Add request ID to response headers
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}
