//! Persisted schedule descriptors and the storage seams.
//!
//! [`TaskStore`] abstracts the shared periodic task table and
//! [`SettingsStore`] the settings blob, so the reconciler and service
//! layer run identically against the database-backed repositories and the
//! in-memory implementations the tests use.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::{AppError, AppResult};

use super::cron::CronSpec;

/// One persisted schedule entry, always UTC-normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDescriptor {
    /// Unique task name, `recron_<kind>_<id>` for owned entries.
    pub key: String,
    /// Firing schedule in UTC.
    pub cron: CronSpec,
    /// Downstream action reference.
    pub task: String,
    /// Positional action arguments.
    pub args: JsonValue,
    pub enabled: bool,
    /// Human-readable provenance shown in the task table UI.
    pub description: String,
}

/// The shared periodic task table.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn find(&self, key: &str) -> AppResult<Option<ScheduleDescriptor>>;

    /// Creates the entry or replaces the existing one with the same key.
    /// Returns true when a new entry was created. The two steps are
    /// atomic with respect to concurrent upserts of the same key.
    async fn upsert(&self, descriptor: ScheduleDescriptor) -> AppResult<bool>;

    /// Deletes the entry if present. Returns the number deleted (0 or 1).
    async fn delete(&self, key: &str) -> AppResult<usize>;

    /// All entries whose key starts with `prefix`, in key order.
    async fn list_prefixed(&self, prefix: &str) -> AppResult<Vec<ScheduleDescriptor>>;

    /// Deletes every entry whose key starts with `prefix`, returning the
    /// count actually removed.
    async fn delete_prefixed(&self, prefix: &str) -> AppResult<usize>;

    /// Flips the enabled flag on an arbitrary task row, owned or not.
    /// Returns whether a row was there to flip.
    async fn set_enabled(&self, key: &str, enabled: bool) -> AppResult<bool>;
}

/// The persisted settings blob.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> AppResult<Option<JsonValue>>;
    async fn save(&self, blob: &JsonValue) -> AppResult<()>;
}

/// In-memory [`TaskStore`] with the same create-or-replace semantics as
/// the database-backed one.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    entries: Mutex<BTreeMap<String, ScheduleDescriptor>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, ScheduleDescriptor>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn find(&self, key: &str) -> AppResult<Option<ScheduleDescriptor>> {
        Ok(self.lock().get(key).cloned())
    }

    async fn upsert(&self, descriptor: ScheduleDescriptor) -> AppResult<bool> {
        let mut entries = self.lock();
        Ok(entries.insert(descriptor.key.clone(), descriptor).is_none())
    }

    async fn delete(&self, key: &str) -> AppResult<usize> {
        Ok(usize::from(self.lock().remove(key).is_some()))
    }

    async fn list_prefixed(&self, prefix: &str) -> AppResult<Vec<ScheduleDescriptor>> {
        Ok(self
            .lock()
            .values()
            .filter(|d| d.key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn delete_prefixed(&self, prefix: &str) -> AppResult<usize> {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - entries.len())
    }

    async fn set_enabled(&self, key: &str, enabled: bool) -> AppResult<bool> {
        let mut entries = self.lock();
        match entries.get_mut(key) {
            Some(descriptor) => {
                descriptor.enabled = enabled;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory [`SettingsStore`].
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    blob: Mutex<Option<JsonValue>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts out holding `blob`.
    pub fn with_blob(blob: JsonValue) -> Self {
        Self {
            blob: Mutex::new(Some(blob)),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> AppResult<Option<JsonValue>> {
        match self.blob.lock() {
            Ok(guard) => Ok(guard.clone()),
            Err(poisoned) => Ok(poisoned.into_inner().clone()),
        }
    }

    async fn save(&self, blob: &JsonValue) -> AppResult<()> {
        let mut guard = match self.blob.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(blob.clone());
        Ok(())
    }
}

/// Always-failing [`TaskStore`] wrapper for exercising per-source error
/// handling in tests.
#[cfg(test)]
pub struct FailingTaskStore;

#[cfg(test)]
#[async_trait]
impl TaskStore for FailingTaskStore {
    async fn find(&self, _key: &str) -> AppResult<Option<ScheduleDescriptor>> {
        Err(storage_down())
    }

    async fn upsert(&self, _descriptor: ScheduleDescriptor) -> AppResult<bool> {
        Err(storage_down())
    }

    async fn delete(&self, _key: &str) -> AppResult<usize> {
        Err(storage_down())
    }

    async fn list_prefixed(&self, _prefix: &str) -> AppResult<Vec<ScheduleDescriptor>> {
        Err(storage_down())
    }

    async fn delete_prefixed(&self, _prefix: &str) -> AppResult<usize> {
        Err(storage_down())
    }

    async fn set_enabled(&self, _key: &str, _enabled: bool) -> AppResult<bool> {
        Err(storage_down())
    }
}

#[cfg(test)]
fn storage_down() -> AppError {
    AppError::Database {
        operation: "test task store".to_string(),
        source: anyhow::anyhow!("storage unavailable"),
    }
}
