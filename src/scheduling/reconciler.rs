//! Drives persisted schedule descriptors to match the settings.
//!
//! Reconciliation is a full sweep: for every source in the catalog, the
//! configured schedule is validated, normalized, shifted to UTC, and
//! upserted; sources that are switched off or unconfigured get their
//! descriptor deleted. One bad source never blocks the rest, so the sweep
//! always runs to completion and the report names everything that
//! happened.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::catalog::Source;
use crate::error::AppResult;

use super::config::{ScheduleConfig, DEFAULT_SCHEDULE};
use super::cron::CronSpec;
use super::kind::{self, SourceKind};
use super::store::{ScheduleDescriptor, TaskStore};
use super::timezone;

/// Where in the pipeline a per-source failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// The configured expression failed validation.
    Validation,
    /// The store rejected the write.
    Store,
}

/// A descriptor that was created or refreshed.
#[derive(Debug, Clone)]
pub struct SyncedSchedule {
    pub kind: SourceKind,
    pub source_id: i32,
    pub source_name: String,
    /// True when the descriptor did not exist before this sweep.
    pub created: bool,
}

/// A descriptor that was deleted because its source is no longer
/// scheduled.
#[derive(Debug, Clone)]
pub struct RemovedSchedule {
    pub kind: SourceKind,
    pub source_id: i32,
    pub source_name: String,
}

/// A source the sweep could not bring in line.
#[derive(Debug, Clone)]
pub struct ScheduleFailure {
    pub kind: SourceKind,
    pub source_id: i32,
    pub source_name: String,
    /// The offending expression, empty for failures without one.
    pub expression: String,
    pub detail: String,
    pub stage: FailureStage,
}

/// Everything one reconciliation sweep did.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    pub synced: Vec<SyncedSchedule>,
    pub removed: Vec<RemovedSchedule>,
    pub failures: Vec<ScheduleFailure>,
    /// Non-fatal notes, currently only failed timezone conversions.
    pub warnings: Vec<String>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn created_count(&self) -> usize {
        self.synced.iter().filter(|s| s.created).count()
    }

    pub fn synced_names(&self) -> Vec<&str> {
        self.synced.iter().map(|s| s.source_name.as_str()).collect()
    }

    pub fn removed_names(&self) -> Vec<&str> {
        self.removed.iter().map(|r| r.source_name.as_str()).collect()
    }
}

/// An enabled descriptor paired with its source, for listings.
#[derive(Debug, Clone)]
pub struct ActiveSchedule {
    pub kind: SourceKind,
    pub source_id: i32,
    pub source_name: String,
    /// Stored firing schedule, UTC.
    pub cron: CronSpec,
    /// Wall-clock `HH:MM` in the display timezone, when the schedule has
    /// a literal time and the display timezone is not UTC.
    pub local_time: Option<String>,
}

/// Combined settings and store view of one source.
#[derive(Debug, Clone)]
pub struct SourceScheduleState {
    pub kind: SourceKind,
    pub source_id: i32,
    pub source_name: String,
    /// Truncated URL for listings.
    pub detail: Option<String>,
    pub enabled: bool,
    /// Raw configured expression, unvalidated.
    pub schedule: Option<String>,
    /// Prefill offered when no expression is configured yet.
    pub suggested_schedule: &'static str,
    pub descriptor_key: String,
    pub has_descriptor: bool,
}

/// Reconciles the task store against sources and settings.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn TaskStore>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Runs one full sweep over `sources`.
    ///
    /// `timezone` is the effective timezone the caller resolved from the
    /// same settings, applied when shifting literal schedule times to
    /// UTC. Failures are collected per source; the sweep never stops
    /// early.
    pub async fn reconcile(
        &self,
        sources: &[Source],
        config: &ScheduleConfig,
        timezone: &str,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        for source in sources {
            let enabled = config.enabled(source.kind, source.id);
            match config.schedule(source.kind, source.id) {
                Some(expression) if enabled => {
                    self.apply(source, expression, timezone, &mut report).await;
                }
                _ => self.clear(source, &mut report).await,
            }
        }
        info!(
            synced = report.synced.len(),
            created = report.created_count(),
            removed = report.removed.len(),
            failed = report.failures.len(),
            timezone = %timezone,
            "Reconciliation sweep finished"
        );
        report
    }

    /// Deletes every descriptor this service owns, returning the count.
    /// Foreign rows in the shared table are untouched.
    pub async fn remove_all(&self) -> AppResult<usize> {
        let removed = self.store.delete_prefixed(&kind::owned_key_prefix()).await?;
        info!(removed = removed, "Removed all owned schedule descriptors");
        Ok(removed)
    }

    /// Enabled descriptors for `sources`, with an optional wall-clock
    /// rendering in the display timezone.
    pub async fn active_schedules(
        &self,
        sources: &[Source],
        timezone: &str,
    ) -> AppResult<Vec<ActiveSchedule>> {
        let mut active = Vec::new();
        for source in sources {
            let key = source.kind.descriptor_key(source.id);
            let Some(descriptor) = self.store.find(&key).await? else {
                continue;
            };
            if !descriptor.enabled {
                continue;
            }
            let local_time = local_display(&descriptor.cron, timezone);
            active.push(ActiveSchedule {
                kind: source.kind,
                source_id: source.id,
                source_name: source.name.clone(),
                cron: descriptor.cron,
                local_time,
            });
        }
        Ok(active)
    }

    /// The settings-plus-store view of every source, for settings UIs.
    pub async fn source_states(
        &self,
        sources: &[Source],
        config: &ScheduleConfig,
    ) -> AppResult<Vec<SourceScheduleState>> {
        let mut states = Vec::with_capacity(sources.len());
        for source in sources {
            let key = source.kind.descriptor_key(source.id);
            let has_descriptor = self.store.find(&key).await?.is_some();
            states.push(SourceScheduleState {
                kind: source.kind,
                source_id: source.id,
                source_name: source.name.clone(),
                detail: source.url.as_deref().map(truncate_detail),
                enabled: config.enabled(source.kind, source.id),
                schedule: config
                    .schedule(source.kind, source.id)
                    .map(str::to_string),
                suggested_schedule: DEFAULT_SCHEDULE,
                descriptor_key: key,
                has_descriptor,
            });
        }
        Ok(states)
    }

    async fn apply(
        &self,
        source: &Source,
        expression: &str,
        timezone: &str,
        report: &mut ReconcileReport,
    ) {
        let spec = match CronSpec::parse(expression) {
            Ok(spec) => spec.normalize(),
            Err(err) => {
                warn!(
                    source = %source.name,
                    id = source.id,
                    expression = expression,
                    error = %err,
                    "Rejected cron expression"
                );
                report.failures.push(ScheduleFailure {
                    kind: source.kind,
                    source_id: source.id,
                    source_name: source.name.clone(),
                    expression: expression.to_string(),
                    detail: err.to_string(),
                    stage: FailureStage::Validation,
                });
                return;
            }
        };

        let spec = shift_to_utc(source, spec, timezone, report);
        let key = source.kind.descriptor_key(source.id);
        let descriptor = ScheduleDescriptor {
            key: key.clone(),
            cron: spec.clone(),
            task: source.kind.action_ref().to_string(),
            args: source.kind.action_args(source.id),
            enabled: true,
            description: format!("Refresh triggered by: {} ({})", source.name, timezone),
        };

        match self.store.upsert(descriptor).await {
            Ok(created) => {
                info!(
                    task = %key,
                    source = %source.name,
                    schedule = %spec,
                    created = created,
                    "Synced schedule descriptor"
                );
                report.synced.push(SyncedSchedule {
                    kind: source.kind,
                    source_id: source.id,
                    source_name: source.name.clone(),
                    created,
                });
            }
            Err(err) => {
                error!(task = %key, error = %err, "Failed to persist schedule descriptor");
                report.failures.push(ScheduleFailure {
                    kind: source.kind,
                    source_id: source.id,
                    source_name: source.name.clone(),
                    expression: spec.to_string(),
                    detail: err.to_string(),
                    stage: FailureStage::Store,
                });
            }
        }
    }

    async fn clear(&self, source: &Source, report: &mut ReconcileReport) {
        let key = source.kind.descriptor_key(source.id);
        match self.store.delete(&key).await {
            Ok(0) => {}
            Ok(_) => {
                info!(task = %key, source = %source.name, "Removed schedule descriptor");
                report.removed.push(RemovedSchedule {
                    kind: source.kind,
                    source_id: source.id,
                    source_name: source.name.clone(),
                });
            }
            Err(err) => {
                error!(task = %key, error = %err, "Failed to remove schedule descriptor");
                report.failures.push(ScheduleFailure {
                    kind: source.kind,
                    source_id: source.id,
                    source_name: source.name.clone(),
                    expression: String::new(),
                    detail: err.to_string(),
                    stage: FailureStage::Store,
                });
            }
        }
    }
}

/// Shifts a literal schedule time into UTC.
///
/// Composite time fields pass through untouched, as does everything when
/// the configured timezone is already UTC. A conversion failure keeps the
/// configured time and records a warning instead of dropping the source.
fn shift_to_utc(
    source: &Source,
    spec: CronSpec,
    timezone: &str,
    report: &mut ReconcileReport,
) -> CronSpec {
    if timezone == timezone::UTC {
        return spec;
    }
    let Some((hour, minute)) = spec.literal_time() else {
        debug!(
            source = %source.name,
            schedule = %spec,
            "Schedule has no literal time, skipping timezone conversion"
        );
        return spec;
    };
    match timezone::to_utc(hour, minute, timezone) {
        Ok((utc_hour, utc_minute)) => {
            info!(
                source = %source.name,
                from = format!("{hour:02}:{minute:02}"),
                to = format!("{utc_hour:02}:{utc_minute:02}"),
                zone = %timezone,
                "Converted schedule time to UTC"
            );
            spec.with_time(utc_hour, utc_minute)
        }
        Err(err) => {
            warn!(
                source = %source.name,
                zone = %timezone,
                error = %err,
                "Timezone conversion failed, keeping configured time"
            );
            report.warnings.push(format!(
                "{}: timezone conversion failed ({err}), keeping configured time",
                source.name
            ));
            spec
        }
    }
}

fn local_display(cron: &CronSpec, timezone: &str) -> Option<String> {
    if timezone == timezone::UTC {
        return None;
    }
    let (hour, minute) = cron.literal_time()?;
    match timezone::to_local(hour, minute, timezone) {
        Ok((lh, lm)) => Some(format!("{lh:02}:{lm:02}")),
        Err(err) => {
            debug!(zone = %timezone, error = %err, "Skipping local time display");
            None
        }
    }
}

/// Shortens a URL for listings: anything past fifty characters is cut
/// there and marked with an ellipsis; shorter URLs pass through as-is.
fn truncate_detail(url: &str) -> String {
    if url.chars().count() <= 50 {
        return url.to_string();
    }
    let mut detail: String = url.chars().take(50).collect();
    detail.push_str("...");
    detail
}
