//! Active schedule request handlers.

use crate::api::doc::SCHEDULES_TAG;
use crate::api::dto::ActiveScheduleResponse;
use crate::error::AppResult;
use crate::state::AppState;
use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Creates schedule-related routes.
pub fn schedule_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_schedules))
}

/// GET /api/v1/schedules - List actively scheduled sources
#[utoipa::path(
    get,
    path = "/schedules",
    tag = SCHEDULES_TAG,
    responses(
        (status = 200, description = "Persisted schedules owned by this service", body = Vec<ActiveScheduleResponse>),
        (status = 503, description = "Database unavailable")
    )
)]
async fn list_schedules(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ActiveScheduleResponse>>> {
    let schedules = state.services.schedules.active_schedules().await?;
    let responses: Vec<ActiveScheduleResponse> = schedules
        .into_iter()
        .map(ActiveScheduleResponse::from)
        .collect();

    Ok(Json(responses))
}
