//! Schedule settings DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use utoipa::ToSchema;
use validator::Validate;

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for replacing the schedule settings document.
///
/// The document is a flat key/value map: a `timezone` entry plus
/// `<kind>_<id>_enabled` and `<kind>_<id>_schedule` entries per source.
/// Unknown keys are preserved so other writers of the shared settings
/// row are not clobbered.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
#[schema(example = json!({
    "timezone": "Europe/Berlin",
    "epg_1_enabled": true,
    "epg_1_schedule": "30 4 * * *",
    "playlist_2_enabled": false
}))]
pub struct SettingsDocument {
    /// IANA timezone identifier used to interpret cron expressions
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Timezone must not be empty"))]
    #[schema(example = "Europe/Berlin")]
    pub timezone: Option<String>,

    /// Per-source enabled flags and cron expressions, plus any foreign keys
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub entries: JsonMap<String, JsonValue>,
}

impl SettingsDocument {
    /// Converts the document back into the raw JSON blob the service layer
    /// persists.
    pub fn into_value(self) -> JsonValue {
        let mut map = self.entries;
        if let Some(tz) = self.timezone {
            map.insert("timezone".to_string(), JsonValue::String(tz));
        }
        JsonValue::Object(map)
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body listing the selectable timezone identifiers.
#[derive(Debug, Serialize, ToSchema)]
pub struct TimezonesResponse {
    /// Curated IANA timezone identifiers, UTC first
    #[schema(example = json!(["UTC", "Europe/Berlin", "America/New_York"]))]
    pub timezones: Vec<String>,
}
