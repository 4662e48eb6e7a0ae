//! Settings repository for the persisted schedule configuration blob.
//!
//! The configuration lives in a single JSONB row so the whole blob is
//! read and written atomically. Row 1 is the only row the table ever
//! holds.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::Value as JsonValue;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::scheduling::SettingsStore;
use crate::schema::schedule_settings::dsl;

const SETTINGS_ROW_ID: i32 = 1;

/// [`SettingsStore`] backed by the `schedule_settings` table.
#[derive(Clone)]
pub struct SettingsRepository {
    pool: AsyncDbPool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for SettingsRepository {
    async fn load(&self) -> AppResult<Option<JsonValue>> {
        let mut conn = self.pool.get().await?;

        dsl::schedule_settings
            .filter(dsl::id.eq(SETTINGS_ROW_ID))
            .select(dsl::data)
            .first::<JsonValue>(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn save(&self, blob: &JsonValue) -> AppResult<()> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(dsl::schedule_settings)
            .values((dsl::id.eq(SETTINGS_ROW_ID), dsl::data.eq(blob)))
            .on_conflict(dsl::id)
            .do_update()
            .set((
                dsl::data.eq(blob),
                dsl::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}
