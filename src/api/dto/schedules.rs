//! Active schedule DTOs for API responses.

use crate::scheduling::{ActiveSchedule, SourceKind};
use serde::Serialize;
use utoipa::ToSchema;

/// Response body describing one actively scheduled source.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "kind": "playlist",
    "source_id": 2,
    "source_name": "main-account",
    "cron": "0 5 * * *",
    "local_time": "05:00 Europe/Berlin"
}))]
pub struct ActiveScheduleResponse {
    /// Which catalog the source comes from
    pub kind: SourceKind,
    pub source_id: i32,
    pub source_name: String,
    /// Normalized five-field cron expression
    #[schema(example = "0 5 * * *")]
    pub cron: String,
    /// Wall-clock rendering for fixed-time schedules
    #[schema(example = "05:00 Europe/Berlin")]
    pub local_time: Option<String>,
}

impl From<ActiveSchedule> for ActiveScheduleResponse {
    fn from(schedule: ActiveSchedule) -> Self {
        Self {
            kind: schedule.kind,
            source_id: schedule.source_id,
            source_name: schedule.source_name,
            cron: schedule.cron.to_string(),
            local_time: schedule.local_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::CronSpec;

    #[test]
    fn test_active_schedule_response_from_schedule() {
        let schedule = ActiveSchedule {
            kind: SourceKind::Playlist,
            source_id: 2,
            source_name: "main-account".to_string(),
            cron: CronSpec::parse("0 5 * * *").unwrap(),
            local_time: Some("05:00 Europe/Berlin".to_string()),
        };

        let response = ActiveScheduleResponse::from(schedule);
        assert_eq!(response.kind, SourceKind::Playlist);
        assert_eq!(response.cron, "0 5 * * *");
        assert_eq!(response.local_time.as_deref(), Some("05:00 Europe/Berlin"));
    }

    #[test]
    fn test_active_schedule_response_without_local_time() {
        let schedule = ActiveSchedule {
            kind: SourceKind::Epg,
            source_id: 9,
            source_name: "guide".to_string(),
            cron: CronSpec::parse("*/30 * * * *").unwrap(),
            local_time: None,
        };

        let response = ActiveScheduleResponse::from(schedule);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["cron"], "*/30 * * * *");
        assert_eq!(value["local_time"], serde_json::Value::Null);
    }
}
