use utoipa::OpenApi;

pub const HEALTH_TAG: &str = "Health";
pub const SETTINGS_TAG: &str = "Settings";
pub const SOURCES_TAG: &str = "Sources";
pub const SCHEDULES_TAG: &str = "Schedules";
pub const ACTIONS_TAG: &str = "Actions";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Recron",
        description = "Schedule reconciliation service for EPG and playlist refreshes",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::scheduling::SourceKind,
        )
    ),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = SETTINGS_TAG, description = "Schedule settings document endpoints"),
        (name = SOURCES_TAG, description = "Source catalog endpoints"),
        (name = SCHEDULES_TAG, description = "Active schedule listing endpoints"),
        (name = ACTIONS_TAG, description = "Reconciliation action endpoints"),
    )
)]
pub struct ApiDoc;
