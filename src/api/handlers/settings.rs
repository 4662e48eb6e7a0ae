//! Schedule settings request handlers.

use crate::api::doc::SETTINGS_TAG;
use crate::api::dto::{ActionResponse, SettingsDocument, TimezonesResponse};
use crate::error::AppResult;
use crate::scheduling::timezone::timezone_choices;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;
use axum::{Json, extract::State};
use serde_json::Value as JsonValue;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Creates settings-related routes.
pub fn settings_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_settings, put_settings))
        .routes(routes!(list_timezones))
}

/// GET /api/v1/settings - Fetch the current schedule settings document
#[utoipa::path(
    get,
    path = "/settings",
    tag = SETTINGS_TAG,
    responses(
        (status = 200, description = "Current settings document", body = Object),
        (status = 503, description = "Database unavailable")
    )
)]
async fn get_settings(State(state): State<AppState>) -> AppResult<Json<JsonValue>> {
    let config = state.services.schedules.current_settings().await?;
    Ok(Json(config.to_value()))
}

/// PUT /api/v1/settings - Replace the settings document and reconcile
#[utoipa::path(
    put,
    path = "/settings",
    tag = SETTINGS_TAG,
    request_body = SettingsDocument,
    responses(
        (status = 200, description = "Settings saved and schedules reconciled", body = ActionResponse),
        (status = 400, description = "Malformed settings document")
    )
)]
async fn put_settings(
    State(state): State<AppState>,
    ValidatedJson(doc): ValidatedJson<SettingsDocument>,
) -> AppResult<Json<ActionResponse>> {
    let outcome = state.services.schedules.save_settings(doc.into_value()).await?;
    Ok(Json(ActionResponse::from(outcome)))
}

/// GET /api/v1/settings/timezones - List selectable timezone identifiers
#[utoipa::path(
    get,
    path = "/settings/timezones",
    tag = SETTINGS_TAG,
    responses(
        (status = 200, description = "Curated timezone list", body = TimezonesResponse)
    )
)]
async fn list_timezones() -> Json<TimezonesResponse> {
    let timezones = timezone_choices().iter().map(|z| z.to_string()).collect();
    Json(TimezonesResponse { timezones })
}
