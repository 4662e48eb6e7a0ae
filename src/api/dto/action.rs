//! Action outcome DTOs for API responses.

use crate::services::ActionOutcome;
use serde::Serialize;
use utoipa::ToSchema;

/// Response body for reconciliation actions.
///
/// `success` is false when any schedule failed validation or persistence;
/// the message then leads with the failure lines.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "success": true,
    "message": "Synced 2 (Europe/Berlin): tvguide-eu, main-account"
}))]
pub struct ActionResponse {
    #[schema(example = true)]
    pub success: bool,

    /// Multi-line human-readable summary of what the action did
    #[schema(example = "Synced 2 (Europe/Berlin): tvguide-eu, main-account")]
    pub message: String,
}

impl From<ActionOutcome> for ActionResponse {
    fn from(outcome: ActionOutcome) -> Self {
        Self {
            success: outcome.success,
            message: outcome.message,
        }
    }
}
