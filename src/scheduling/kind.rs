//! Source kinds and the per-kind scheduling contract.
//!
//! Each kind fixes the settings-key shapes, the descriptor key in the
//! shared task table, and the downstream action a due descriptor fires.
//! Adding a kind means adding a variant here; everything downstream is
//! generic over the kind.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use utoipa::ToSchema;

/// Ownership namespace for descriptor keys in the shared task table.
///
/// Every task this service creates is named `recron_<kind>_<id>`, so bulk
/// operations can target exactly the rows this service owns and nothing
/// else sharing the table.
pub const OWNER_PREFIX: &str = "recron";

/// Key prefix (with the kind/id separator) matching all owned descriptors.
pub fn owned_key_prefix() -> String {
    format!("{OWNER_PREFIX}_")
}

/// The kinds of refreshable sources this service schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// An EPG guide-data feed.
    Epg,
    /// A playlist provider account.
    Playlist,
}

impl SourceKind {
    /// All kinds in reconciliation order.
    pub const ALL: [SourceKind; 2] = [SourceKind::Epg, SourceKind::Playlist];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Epg => "epg",
            SourceKind::Playlist => "playlist",
        }
    }

    /// Reference to the downstream action fired when a descriptor of this
    /// kind comes due.
    pub fn action_ref(&self) -> &'static str {
        match self {
            SourceKind::Epg => "epg.refresh_all",
            SourceKind::Playlist => "playlist.refresh_account",
        }
    }

    /// Positional argument payload for the action. The EPG refresh takes
    /// no arguments; the playlist refresh takes the account id.
    pub fn action_args(&self, id: i32) -> JsonValue {
        match self {
            SourceKind::Epg => json!([]),
            SourceKind::Playlist => json!([id]),
        }
    }

    /// Descriptor key owned by this service for one source.
    pub fn descriptor_key(&self, id: i32) -> String {
        format!("{OWNER_PREFIX}_{}_{id}", self.as_str())
    }

    /// Settings key holding the per-source enabled flag.
    pub fn enabled_key(&self, id: i32) -> String {
        format!("{}_{id}_enabled", self.as_str())
    }

    /// Settings key holding the per-source cron expression.
    pub fn schedule_key(&self, id: i32) -> String {
        format!("{}_{id}_schedule", self.as_str())
    }

    /// Name of the host engine's built-in interval refresh task for one
    /// source. Those rows belong to the host; they are disabled when they
    /// would double-fire against an owned descriptor, never deleted.
    pub fn builtin_interval_task(&self, id: i32) -> String {
        match self {
            SourceKind::Epg => format!("epg_source_{id}_interval"),
            SourceKind::Playlist => format!("playlist_{id}_interval"),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
