//! Repository layer for data access operations.
//!
//! Provides async access to the shared periodic task table, the source
//! catalog tables, and the settings blob.

mod periodic_task_repo;
mod settings_repo;
mod source_repo;

pub use periodic_task_repo::PeriodicTaskRepository;
pub use settings_repo::SettingsRepository;
pub use source_repo::SourceRepository;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Since `AsyncDbPool` uses `Arc` internally, cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub periodic_tasks: PeriodicTaskRepository,
    pub sources: SourceRepository,
    pub settings: SettingsRepository,
}

impl Repositories {
    /// Creates a new Repositories instance with all repositories initialized.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            periodic_tasks: PeriodicTaskRepository::new(pool.clone()),
            sources: SourceRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool),
        }
    }
}
