//! Source catalog request handlers.

use crate::api::doc::SOURCES_TAG;
use crate::api::dto::{SourceStateQuery, SourceStateResponse};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedQuery;
use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Creates source-related routes.
pub fn source_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_sources))
}

/// GET /api/v1/sources - List sources with their schedule state
#[utoipa::path(
    get,
    path = "/sources",
    tag = SOURCES_TAG,
    params(SourceStateQuery),
    responses(
        (status = 200, description = "Sources with schedule state", body = Vec<SourceStateResponse>),
        (status = 400, description = "Invalid kind filter")
    )
)]
async fn list_sources(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<SourceStateQuery>,
) -> AppResult<Json<Vec<SourceStateResponse>>> {
    let states = state.services.schedules.source_states().await?;
    let filter = query.kind_filter();

    let responses: Vec<SourceStateResponse> = states
        .into_iter()
        .filter(|s| filter.is_none_or(|kind| s.kind == kind))
        .map(SourceStateResponse::from)
        .collect();

    Ok(Json(responses))
}
