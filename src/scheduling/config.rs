//! The user-facing schedule settings blob.
//!
//! Settings arrive as one flat JSON object: a `timezone` key plus
//! `<kind>_<id>_enabled` and `<kind>_<id>_schedule` pairs per source.
//! The blob is stored verbatim; this type is the read view over it, with
//! the tolerant coercions the settings UI ends up needing.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use super::kind::SourceKind;

/// Settings key naming the display and conversion timezone.
pub const TIMEZONE_KEY: &str = "timezone";

/// Timezone assumed when the blob has none.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Suggested cron expression for newly scheduled sources.
pub const DEFAULT_SCHEDULE: &str = "0 3 * * *";

/// Read view over the flat settings object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleConfig {
    values: BTreeMap<String, JsonValue>,
}

impl ScheduleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the view from a stored blob. Anything that is not a JSON
    /// object (including an absent blob's `null`) reads as empty.
    pub fn from_value(value: JsonValue) -> Self {
        match value {
            JsonValue::Object(map) => Self {
                values: map.into_iter().collect(),
            },
            _ => Self::default(),
        }
    }

    pub fn to_value(&self) -> JsonValue {
        JsonValue::Object(self.values.clone().into_iter().collect())
    }

    pub fn set(&mut self, key: impl Into<String>, value: JsonValue) {
        self.values.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The configured timezone, or [`DEFAULT_TIMEZONE`] when absent,
    /// empty, or not a string.
    pub fn timezone(&self) -> &str {
        self.timezone_or(DEFAULT_TIMEZONE)
    }

    /// The configured timezone with an explicit fallback.
    pub fn timezone_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.values.get(TIMEZONE_KEY).and_then(JsonValue::as_str) {
            Some(zone) if !zone.is_empty() => zone,
            _ => default,
        }
    }

    /// Whether scheduling is switched on for one source.
    ///
    /// Settings forms deliver booleans in several spellings, so any of
    /// `true`, `"true"`, `"1"`, `"yes"`, `"on"` (case-insensitive), or a
    /// nonzero number counts as on. Absent keys are off.
    pub fn enabled(&self, kind: SourceKind, id: i32) -> bool {
        self.values
            .get(&kind.enabled_key(id))
            .is_some_and(truthy)
    }

    /// The configured cron expression for one source, trimmed. Absent,
    /// blank, or non-string values read as unconfigured.
    pub fn schedule(&self, kind: SourceKind, id: i32) -> Option<&str> {
        self.values
            .get(&kind.schedule_key(id))
            .and_then(JsonValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Bool(b) => *b,
        JsonValue::String(s) => {
            matches!(s.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
        }
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}
