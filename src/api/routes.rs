//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use std::time::Duration;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::config::ServerConfig;
use crate::state::AppState;

/// Composes every documented route into one OpenAPI-aware router.
///
/// Health probes live at the root, everything else under `/api/v1`.
fn api_router() -> OpenApiRouter<AppState> {
    let v1_routes = OpenApiRouter::new()
        .merge(handlers::settings::settings_routes())
        .merge(handlers::sources::source_routes())
        .merge(handlers::schedules::schedule_routes())
        .merge(handlers::actions::action_routes());

    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::health::health_routes())
        .nest("/api/v1", v1_routes)
}

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID middleware (runs first) - generates/propagates request IDs
/// 2. Logging middleware (runs second) - logs requests with request IDs
/// 3. Request timeout, CORS, and response compression
///
/// # Routes
/// - `/health`, `/health/live`, `/health/ready` - Health probes
/// - `/api/v1/settings` - Settings document read/replace
/// - `/api/v1/sources` - Source catalog with schedule state
/// - `/api/v1/schedules` - Active schedule listing
/// - `/api/v1/actions/*` - Reconciliation actions
/// - `/swagger-ui` - Interactive API documentation
///
/// # Example
/// ```ignore
/// let state = AppState::new(pool, &settings.scheduler);
/// let router = create_router(state, &settings.server);
/// ```
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let (router, api) = api_router().split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout)))
        // Middleware is applied in reverse order - last added runs first
        // So logging runs after request_id has set the ID
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
