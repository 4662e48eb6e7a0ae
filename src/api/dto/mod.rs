//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `action` - Reconciliation action outcome DTOs
//! - `error` - Common error response DTOs
//! - `schedules` - Active schedule listing DTOs
//! - `settings` - Schedule settings document DTOs
//! - `sources` - Source catalog DTOs

mod action;
mod error;
mod schedules;
mod settings;
mod sources;

pub use action::ActionResponse;
pub use error::ErrorResponse;
pub use schedules::ActiveScheduleResponse;
pub use settings::{SettingsDocument, TimezonesResponse};
pub use sources::{SourceStateQuery, SourceStateResponse};
