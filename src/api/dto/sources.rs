//! Source catalog DTOs for API requests and responses.

use crate::scheduling::{SourceKind, SourceScheduleState};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

// ============================================================================
// Request DTOs
// ============================================================================

/// Query parameters for listing source schedule states.
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct SourceStateQuery {
    /// Restrict the listing to one source kind
    #[validate(custom(function = validate_kind))]
    #[param(example = "epg")]
    pub kind: Option<String>,
}

fn validate_kind(kind: &str) -> Result<(), ValidationError> {
    if SourceKind::ALL.iter().any(|k| k.as_str() == kind) {
        Ok(())
    } else {
        let mut error = ValidationError::new("kind");
        error.message = Some("Source kind must be 'epg' or 'playlist'".into());
        Err(error)
    }
}

impl SourceStateQuery {
    /// Parses the validated kind filter, if any.
    pub fn kind_filter(&self) -> Option<SourceKind> {
        self.kind
            .as_deref()
            .and_then(|k| SourceKind::ALL.iter().copied().find(|s| s.as_str() == k))
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body describing one source and its schedule state.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "kind": "epg",
    "source_id": 1,
    "source_name": "tvguide-eu",
    "detail": "https://example.com/epg.xml",
    "enabled": true,
    "schedule": "30 4 * * *",
    "suggested_schedule": "0 4 * * *",
    "descriptor_key": "recron_epg_1",
    "has_descriptor": true
}))]
pub struct SourceStateResponse {
    /// Which catalog the source comes from
    pub kind: SourceKind,
    pub source_id: i32,
    pub source_name: String,
    /// Feed URL or account server, when known
    pub detail: Option<String>,
    /// Whether the settings document enables this source's schedule
    pub enabled: bool,
    /// Configured cron expression from the settings document
    pub schedule: Option<String>,
    /// Fallback cron expression used when none is configured
    pub suggested_schedule: String,
    /// Key of the persisted task descriptor for this source
    pub descriptor_key: String,
    /// Whether a persisted descriptor currently exists
    pub has_descriptor: bool,
}

impl From<SourceScheduleState> for SourceStateResponse {
    fn from(state: SourceScheduleState) -> Self {
        Self {
            kind: state.kind,
            source_id: state.source_id,
            source_name: state.source_name,
            detail: state.detail,
            enabled: state.enabled,
            schedule: state.schedule,
            suggested_schedule: state.suggested_schedule.to_string(),
            descriptor_key: state.descriptor_key,
            has_descriptor: state.has_descriptor,
        }
    }
}
