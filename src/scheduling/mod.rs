//! Schedule reconciliation core.
//!
//! Everything needed to turn per-source schedule settings into persisted
//! periodic task descriptors: cron validation and normalization, wall-clock
//! timezone conversion, the source-kind contract, the settings blob view,
//! the descriptor store seam, and the reconciler that ties them together.

pub mod config;
pub mod cron;
pub mod kind;
pub mod reconciler;
pub mod store;
pub mod timezone;

pub use config::{ScheduleConfig, DEFAULT_SCHEDULE, DEFAULT_TIMEZONE, TIMEZONE_KEY};
pub use cron::{CronError, CronSpec};
pub use kind::{SourceKind, OWNER_PREFIX};
pub use reconciler::{
    ActiveSchedule, FailureStage, ReconcileReport, Reconciler, RemovedSchedule, ScheduleFailure,
    SourceScheduleState, SyncedSchedule,
};
pub use store::{
    MemorySettingsStore, MemoryTaskStore, ScheduleDescriptor, SettingsStore, TaskStore,
};
pub use timezone::{is_known, ConversionError};
