//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod schedule_service;

pub use schedule_service::{ActionOutcome, ScheduleService};

use std::sync::Arc;

use crate::catalog::DbSourceCatalog;
use crate::config::SchedulerConfig;
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since underlying pools use `Arc` internally.
#[derive(Clone)]
pub struct Services {
    pub schedules: ScheduleService,
}

impl Services {
    /// Creates a new Services instance from Repositories.
    pub fn new(repos: Repositories, scheduler: &SchedulerConfig) -> Self {
        Self {
            schedules: ScheduleService::new(
                Arc::new(DbSourceCatalog::new(repos.sources)),
                Arc::new(repos.periodic_tasks),
                Arc::new(repos.settings),
                scheduler.default_timezone.clone(),
            ),
        }
    }
}
