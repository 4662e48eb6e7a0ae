//! Reconciliation action request handlers.
//!
//! Actions mirror the operator commands: sync the persisted descriptors
//! against the settings document, render the active schedule view, remove
//! everything this service owns, or disable the built-in interval tasks
//! that would otherwise double-schedule a source. Each returns an
//! [`ActionResponse`] whose `success` flag reports the reconcile outcome;
//! transport-level failures surface as error responses instead.

use crate::api::doc::ACTIONS_TAG;
use crate::api::dto::ActionResponse;
use crate::error::AppResult;
use crate::state::AppState;
use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Creates action-related routes.
pub fn action_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(sync_schedules))
        .routes(routes!(view_schedules))
        .routes(routes!(remove_all_schedules))
        .routes(routes!(disable_builtin_intervals))
}

/// POST /api/v1/actions/sync - Reconcile descriptors with settings
#[utoipa::path(
    post,
    path = "/actions/sync",
    tag = ACTIONS_TAG,
    responses(
        (status = 200, description = "Reconcile outcome", body = ActionResponse),
        (status = 503, description = "Database unavailable")
    )
)]
async fn sync_schedules(State(state): State<AppState>) -> AppResult<Json<ActionResponse>> {
    let outcome = state.services.schedules.sync().await?;
    Ok(Json(ActionResponse::from(outcome)))
}

/// POST /api/v1/actions/view - Render the active schedule summary
#[utoipa::path(
    post,
    path = "/actions/view",
    tag = ACTIONS_TAG,
    responses(
        (status = 200, description = "Active schedule summary", body = ActionResponse)
    )
)]
async fn view_schedules(State(state): State<AppState>) -> AppResult<Json<ActionResponse>> {
    let outcome = state.services.schedules.view().await?;
    Ok(Json(ActionResponse::from(outcome)))
}

/// POST /api/v1/actions/remove-all - Remove every owned schedule descriptor
#[utoipa::path(
    post,
    path = "/actions/remove-all",
    tag = ACTIONS_TAG,
    responses(
        (status = 200, description = "Removal outcome", body = ActionResponse)
    )
)]
async fn remove_all_schedules(State(state): State<AppState>) -> AppResult<Json<ActionResponse>> {
    let outcome = state.services.schedules.remove_all().await?;
    Ok(Json(ActionResponse::from(outcome)))
}

/// POST /api/v1/actions/disable-builtin-intervals - Disable built-in interval tasks
#[utoipa::path(
    post,
    path = "/actions/disable-builtin-intervals",
    tag = ACTIONS_TAG,
    responses(
        (status = 200, description = "Disable outcome", body = ActionResponse)
    )
)]
async fn disable_builtin_intervals(State(state): State<AppState>) -> AppResult<Json<ActionResponse>> {
    let outcome = state.services.schedules.disable_builtin_intervals().await?;
    Ok(Json(ActionResponse::from(outcome)))
}
