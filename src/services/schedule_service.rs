//! Schedule service for business logic operations.
//!
//! Coordinates the source catalog, the settings blob, and the reconciler,
//! and renders the human-readable outcome messages the actions return.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::warn;

use crate::catalog::{Source, SourceCatalog};
use crate::error::AppResult;
use crate::scheduling::{
    ActiveSchedule, FailureStage, ReconcileReport, Reconciler, ScheduleConfig, SettingsStore,
    SourceKind, SourceScheduleState, TaskStore,
};

/// Result of one user-facing action.
///
/// `message` is a multi-line, human-readable summary; `success` is false
/// only when at least one source failed validation or storage.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Schedule service handling settings persistence and reconciliation.
///
/// All collaborators sit behind trait objects, so cloning is cheap and the
/// service can run against in-memory stores in tests.
#[derive(Clone)]
pub struct ScheduleService {
    catalog: Arc<dyn SourceCatalog>,
    settings: Arc<dyn SettingsStore>,
    reconciler: Reconciler,
    store: Arc<dyn TaskStore>,
    default_timezone: String,
}

impl ScheduleService {
    /// Creates a new ScheduleService.
    ///
    /// # Arguments
    /// * `catalog` - Source listing used on every reconciliation
    /// * `store` - Persisted schedule descriptor store
    /// * `settings` - Persisted settings blob store
    /// * `default_timezone` - Fallback when the blob names no timezone
    pub fn new(
        catalog: Arc<dyn SourceCatalog>,
        store: Arc<dyn TaskStore>,
        settings: Arc<dyn SettingsStore>,
        default_timezone: String,
    ) -> Self {
        Self {
            catalog,
            settings,
            reconciler: Reconciler::new(store.clone()),
            store,
            default_timezone,
        }
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Loads the persisted settings blob.
    ///
    /// An absent row reads as an empty configuration, which means every
    /// source disabled.
    pub async fn current_settings(&self) -> AppResult<ScheduleConfig> {
        let blob = self.settings.load().await?;
        Ok(blob.map(ScheduleConfig::from_value).unwrap_or_default())
    }

    /// Persists a new settings blob, then reconciles every source against
    /// it.
    ///
    /// Persistence failures propagate; reconciliation failures are
    /// collected per source into the outcome message.
    pub async fn save_settings(&self, blob: JsonValue) -> AppResult<ActionOutcome> {
        let config = ScheduleConfig::from_value(blob);
        self.settings.save(&config.to_value()).await?;

        let timezone = config.timezone_or(&self.default_timezone).to_string();
        let sources = self.load_sources().await;
        let report = self.reconciler.reconcile(&sources, &config, &timezone).await;

        let mut lines = failure_lines(&report);
        lines.push(format!("Settings saved (timezone: {timezone})"));
        if !report.synced.is_empty() {
            lines.push(format!(
                "Activated {}: {}",
                report.synced.len(),
                report.synced_names().join(", ")
            ));
        }
        if !report.removed.is_empty() {
            lines.push(format!(
                "Deactivated {}: {}",
                report.removed.len(),
                report.removed_names().join(", ")
            ));
        }
        lines.extend(report.warnings.iter().cloned());

        Ok(ActionOutcome {
            success: report.is_clean(),
            message: lines.join("\n"),
        })
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Reconciles every source against the persisted settings.
    pub async fn sync(&self) -> AppResult<ActionOutcome> {
        let config = self.current_settings().await?;
        let timezone = config.timezone_or(&self.default_timezone).to_string();
        let sources = self.load_sources().await;
        let report = self.reconciler.reconcile(&sources, &config, &timezone).await;

        let mut lines = failure_lines(&report);
        if !report.synced.is_empty() {
            lines.push(format!(
                "Synced {} ({}): {}",
                report.synced.len(),
                timezone,
                report.synced_names().join(", ")
            ));
        }
        if !report.removed.is_empty() {
            lines.push(format!(
                "Removed {}: {}",
                report.removed.len(),
                report.removed_names().join(", ")
            ));
        }
        if lines.is_empty() {
            lines.push("No schedules configured".to_string());
        }
        lines.extend(report.warnings.iter().cloned());

        Ok(ActionOutcome {
            success: report.is_clean(),
            message: lines.join("\n"),
        })
    }

    /// Lists the currently enabled schedules as a readable summary.
    pub async fn view(&self) -> AppResult<ActionOutcome> {
        let active = self.active_schedules().await?;
        if active.is_empty() {
            return Ok(ActionOutcome::ok("No active schedules"));
        }

        let mut lines = vec!["Active schedules:".to_string()];
        let timezone = self.display_timezone().await?;
        for schedule in &active {
            match &schedule.local_time {
                Some(local) => lines.push(format!(
                    "- {}: {} ({} {})",
                    schedule.source_name, schedule.cron, local, timezone
                )),
                None => lines.push(format!("- {}: {}", schedule.source_name, schedule.cron)),
            }
        }
        Ok(ActionOutcome::ok(lines.join("\n")))
    }

    /// Deletes every schedule descriptor this service owns.
    pub async fn remove_all(&self) -> AppResult<ActionOutcome> {
        let removed = self.reconciler.remove_all().await?;
        Ok(ActionOutcome::ok(format!("Removed {removed} schedules")))
    }

    /// Disables the host engine's built-in per-source interval tasks so
    /// only the cron schedules fire.
    ///
    /// Missing interval rows are skipped silently; store errors on one
    /// row do not stop the rest.
    pub async fn disable_builtin_intervals(&self) -> AppResult<ActionOutcome> {
        let sources = self.load_sources().await;
        let mut disabled = 0usize;
        for source in &sources {
            let task_name = source.kind.builtin_interval_task(source.id);
            match self.store.set_enabled(&task_name, false).await {
                Ok(changed) => disabled += usize::from(changed),
                Err(err) => {
                    warn!(
                        task = %task_name,
                        error = %err,
                        "Failed to disable built-in interval task"
                    );
                }
            }
        }
        Ok(ActionOutcome::ok(format!(
            "Disabled {disabled} built-in interval tasks"
        )))
    }

    // ========================================================================
    // Typed read APIs
    // ========================================================================

    /// Structured listing of enabled schedules.
    pub async fn active_schedules(&self) -> AppResult<Vec<ActiveSchedule>> {
        let timezone = self.display_timezone().await?;
        let sources = self.load_sources().await;
        self.reconciler.active_schedules(&sources, &timezone).await
    }

    /// Combined settings and store view of every source.
    pub async fn source_states(&self) -> AppResult<Vec<SourceScheduleState>> {
        let config = self.current_settings().await?;
        let sources = self.load_sources().await;
        self.reconciler.source_states(&sources, &config).await
    }

    // ========================================================================
    // Private Helpers
    // ========================================================================

    async fn display_timezone(&self) -> AppResult<String> {
        let config = self.current_settings().await?;
        Ok(config.timezone_or(&self.default_timezone).to_string())
    }

    /// Lists every schedulable source, both kinds in kind order.
    ///
    /// A catalog read failure for one kind is logged and treated as an
    /// empty listing so actions still run against what is reachable.
    async fn load_sources(&self) -> Vec<Source> {
        let mut sources = Vec::new();
        for kind in SourceKind::ALL {
            match self.catalog.list(kind).await {
                Ok(mut listed) => sources.append(&mut listed),
                Err(err) => {
                    warn!(kind = %kind, error = %err, "Source catalog unavailable");
                }
            }
        }
        sources
    }
}

/// Per-source failure lines, validation failures quoting the expression.
fn failure_lines(report: &ReconcileReport) -> Vec<String> {
    report
        .failures
        .iter()
        .map(|failure| match failure.stage {
            FailureStage::Validation => format!(
                "Invalid cron for {}: {}",
                failure.source_name, failure.expression
            ),
            FailureStage::Store => format!(
                "Failed to sync {}: {}",
                failure.source_name, failure.detail
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::error::AppError;
    use crate::scheduling::{MemorySettingsStore, MemoryTaskStore};
    use async_trait::async_trait;
    use serde_json::json;

    struct FailingCatalog;

    #[async_trait]
    impl SourceCatalog for FailingCatalog {
        async fn list(&self, _kind: SourceKind) -> AppResult<Vec<Source>> {
            Err(AppError::Database {
                operation: "list sources".to_string(),
                source: anyhow::anyhow!("catalog offline"),
            })
        }
    }

    fn service_with(
        sources: Vec<Source>,
        settings: MemorySettingsStore,
    ) -> (ScheduleService, Arc<MemoryTaskStore>) {
        let store = Arc::new(MemoryTaskStore::new());
        let service = ScheduleService::new(
            Arc::new(StaticCatalog::new(sources)),
            store.clone(),
            Arc::new(settings),
            "UTC".to_string(),
        );
        (service, store)
    }

    #[tokio::test]
    async fn save_settings_persists_and_activates() {
        let (service, store) = service_with(
            vec![Source::new(SourceKind::Epg, 7, "Guide A")],
            MemorySettingsStore::new(),
        );

        let outcome = service
            .save_settings(json!({
                "timezone": "Asia/Kolkata",
                "epg_7_enabled": true,
                "epg_7_schedule": "30 9 * * *",
            }))
            .await
            .unwrap();

        assert!(outcome.success);
        assert!(outcome.message.contains("Settings saved (timezone: Asia/Kolkata)"));
        assert!(outcome.message.contains("Activated 1: Guide A"));

        // Kolkata is UTC+5:30 year round, so 09:30 local stores as 04:00.
        let descriptor = store.find("recron_epg_7").await.unwrap().unwrap();
        assert_eq!(descriptor.cron.to_string(), "0 4 * * *");

        let persisted = service.current_settings().await.unwrap();
        assert_eq!(persisted.timezone(), "Asia/Kolkata");
    }

    #[tokio::test]
    async fn save_settings_reports_deactivations() {
        let settings = MemorySettingsStore::new();
        let (service, store) = service_with(
            vec![Source::new(SourceKind::Playlist, 3, "Account A")],
            settings,
        );
        service
            .save_settings(json!({
                "playlist_3_enabled": true,
                "playlist_3_schedule": "0 3 * * *",
            }))
            .await
            .unwrap();
        assert!(store.find("recron_playlist_3").await.unwrap().is_some());

        let outcome = service
            .save_settings(json!({ "playlist_3_enabled": false }))
            .await
            .unwrap();

        assert!(outcome.success);
        assert!(outcome.message.contains("Deactivated 1: Account A"));
        assert!(store.find("recron_playlist_3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sync_without_settings_reports_nothing_configured() {
        let (service, _store) = service_with(
            vec![Source::new(SourceKind::Epg, 1, "Guide A")],
            MemorySettingsStore::new(),
        );

        let outcome = service.sync().await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.message, "No schedules configured");
    }

    #[tokio::test]
    async fn sync_skips_invalid_sources_but_commits_valid_ones() {
        let settings = MemorySettingsStore::with_blob(json!({
            "epg_1_enabled": true,
            "epg_1_schedule": "61 3 * * *",
            "epg_2_enabled": true,
            "epg_2_schedule": "0 3 * * *",
        }));
        let (service, store) = service_with(
            vec![
                Source::new(SourceKind::Epg, 1, "Broken"),
                Source::new(SourceKind::Epg, 2, "Working"),
            ],
            settings,
        );

        let outcome = service.sync().await.unwrap();

        assert!(!outcome.success);
        assert!(outcome.message.contains("Invalid cron for Broken: 61 3 * * *"));
        assert!(outcome.message.contains("Synced 1 (UTC): Working"));
        assert!(store.find("recron_epg_1").await.unwrap().is_none());
        assert!(store.find("recron_epg_2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn view_shows_local_time_next_to_utc_schedule() {
        let settings = MemorySettingsStore::with_blob(json!({
            "timezone": "Asia/Kolkata",
            "epg_5_enabled": true,
            "epg_5_schedule": "30 9 * * *",
        }));
        let (service, _store) = service_with(
            vec![Source::new(SourceKind::Epg, 5, "Guide A")],
            settings,
        );
        service.sync().await.unwrap();

        let outcome = service.view().await.unwrap();

        assert!(outcome.success);
        assert!(outcome.message.starts_with("Active schedules:"));
        assert!(outcome.message.contains("- Guide A: 0 4 * * * (09:30 Asia/Kolkata)"));
    }

    #[tokio::test]
    async fn view_without_descriptors_is_still_successful() {
        let (service, _store) = service_with(
            vec![Source::new(SourceKind::Epg, 5, "Guide A")],
            MemorySettingsStore::new(),
        );

        let outcome = service.view().await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.message, "No active schedules");
    }

    #[tokio::test]
    async fn remove_all_counts_deleted_descriptors() {
        let settings = MemorySettingsStore::with_blob(json!({
            "epg_1_enabled": true,
            "epg_1_schedule": "0 3 * * *",
            "playlist_2_enabled": true,
            "playlist_2_schedule": "15 4 * * *",
        }));
        let (service, store) = service_with(
            vec![
                Source::new(SourceKind::Epg, 1, "Guide A"),
                Source::new(SourceKind::Playlist, 2, "Account A"),
            ],
            settings,
        );
        service.sync().await.unwrap();

        let outcome = service.remove_all().await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.message, "Removed 2 schedules");
        assert!(store.find("recron_epg_1").await.unwrap().is_none());
        assert!(store.find("recron_playlist_2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn disable_builtin_intervals_counts_flipped_rows() {
        let (service, store) = service_with(
            vec![
                Source::new(SourceKind::Epg, 4, "Guide A"),
                Source::new(SourceKind::Playlist, 9, "Account A"),
            ],
            MemorySettingsStore::new(),
        );
        // Only the EPG interval row exists; the playlist one is absent.
        store
            .upsert(crate::scheduling::ScheduleDescriptor {
                key: "epg_source_4_interval".to_string(),
                cron: "0 0 * * *".parse().unwrap(),
                task: "epg.refresh_all".to_string(),
                args: json!([]),
                enabled: true,
                description: String::new(),
            })
            .await
            .unwrap();

        let outcome = service.disable_builtin_intervals().await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.message, "Disabled 1 built-in interval tasks");
        let row = store.find("epg_source_4_interval").await.unwrap().unwrap();
        assert!(!row.enabled);
    }

    #[tokio::test]
    async fn unavailable_catalog_reads_as_empty() {
        let store = Arc::new(MemoryTaskStore::new());
        let service = ScheduleService::new(
            Arc::new(FailingCatalog),
            store,
            Arc::new(MemorySettingsStore::new()),
            "UTC".to_string(),
        );

        let outcome = service.sync().await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.message, "No schedules configured");
    }

    #[tokio::test]
    async fn source_states_reflect_settings_and_store() {
        let settings = MemorySettingsStore::with_blob(json!({
            "epg_1_enabled": true,
            "epg_1_schedule": "0 3 * * *",
        }));
        let (service, _store) = service_with(
            vec![
                Source::new(SourceKind::Epg, 1, "Guide A").with_url("http://example.com/guide.xml"),
                Source::new(SourceKind::Epg, 2, "Guide B"),
            ],
            settings,
        );
        service.sync().await.unwrap();

        let states = service.source_states().await.unwrap();

        assert_eq!(states.len(), 2);
        assert!(states[0].enabled);
        assert!(states[0].has_descriptor);
        assert_eq!(states[0].schedule.as_deref(), Some("0 3 * * *"));
        assert!(!states[1].enabled);
        assert!(!states[1].has_descriptor);
        assert_eq!(states[1].suggested_schedule, "0 3 * * *");
    }
}
