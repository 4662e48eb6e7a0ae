use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{NewPeriodicTask, PeriodicTask, PeriodicTaskChanges};
use crate::scheduling::{CronSpec, ScheduleDescriptor, TaskStore};
use crate::schema::periodic_tasks::dsl;

/// [`TaskStore`] backed by the shared `periodic_tasks` table.
#[derive(Clone)]
pub struct PeriodicTaskRepository {
    pool: AsyncDbPool,
}

impl PeriodicTaskRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PeriodicTaskRepository {
    async fn find(&self, key: &str) -> AppResult<Option<ScheduleDescriptor>> {
        let mut conn = self.pool.get().await?;

        let row = dsl::periodic_tasks
            .filter(dsl::name.eq(key))
            .select(PeriodicTask::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find periodic task"))?;

        row.map(decode).transpose()
    }

    async fn upsert(&self, descriptor: ScheduleDescriptor) -> AppResult<bool> {
        let mut conn = self.pool.get().await?;

        let cron = descriptor.cron.to_string();

        // Select-then-write inside one transaction so concurrent upserts
        // of the same key cannot interleave between the two steps. The
        // unique index on name backstops anything outside the
        // transaction.
        conn.transaction::<bool, diesel::result::Error, _>(|conn| {
            async move {
                let existing: Option<i32> = dsl::periodic_tasks
                    .filter(dsl::name.eq(&descriptor.key))
                    .select(dsl::id)
                    .first(conn)
                    .await
                    .optional()?;

                match existing {
                    Some(id) => {
                        diesel::update(dsl::periodic_tasks.filter(dsl::id.eq(id)))
                            .set((
                                PeriodicTaskChanges {
                                    cron_expression: &cron,
                                    task: &descriptor.task,
                                    args: &descriptor.args,
                                    enabled: descriptor.enabled,
                                    description: &descriptor.description,
                                },
                                dsl::updated_at.eq(diesel::dsl::now),
                            ))
                            .execute(conn)
                            .await?;
                        Ok(false)
                    }
                    None => {
                        diesel::insert_into(dsl::periodic_tasks)
                            .values(NewPeriodicTask {
                                name: &descriptor.key,
                                cron_expression: &cron,
                                task: &descriptor.task,
                                args: &descriptor.args,
                                enabled: descriptor.enabled,
                                description: &descriptor.description,
                            })
                            .execute(conn)
                            .await?;
                        Ok(true)
                    }
                }
            }
            .scope_boxed()
        })
        .await
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "upsert periodic task"))
    }

    async fn delete(&self, key: &str) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::delete(dsl::periodic_tasks.filter(dsl::name.eq(key)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete periodic task"))
    }

    async fn list_prefixed(&self, prefix: &str) -> AppResult<Vec<ScheduleDescriptor>> {
        let mut conn = self.pool.get().await?;

        let rows = dsl::periodic_tasks
            .filter(dsl::name.like(like_prefix(prefix)))
            .order(dsl::name.asc())
            .select(PeriodicTask::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list periodic tasks"))?;

        rows.into_iter().map(decode).collect()
    }

    async fn delete_prefixed(&self, prefix: &str) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::delete(dsl::periodic_tasks.filter(dsl::name.like(like_prefix(prefix))))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete periodic tasks"))
    }

    async fn set_enabled(&self, key: &str, enabled: bool) -> AppResult<bool> {
        let mut conn = self.pool.get().await?;

        let changed = diesel::update(dsl::periodic_tasks.filter(dsl::name.eq(key)))
            .set((
                dsl::enabled.eq(enabled),
                dsl::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update periodic task"))?;

        Ok(changed > 0)
    }
}

/// Maps a table row to the domain descriptor, re-validating the stored
/// expression. A row that fails here was corrupted outside this service.
fn decode(row: PeriodicTask) -> AppResult<ScheduleDescriptor> {
    let cron = CronSpec::parse(&row.cron_expression).map_err(|e| AppError::Database {
        operation: "decode periodic task".to_string(),
        source: anyhow::anyhow!("stored cron '{}' is invalid: {e}", row.cron_expression),
    })?;
    Ok(ScheduleDescriptor {
        key: row.name,
        cron,
        task: row.task,
        args: row.args,
        enabled: row.enabled,
        description: row.description,
    })
}

/// Builds a LIKE pattern matching names starting with `prefix`, escaping
/// the LIKE metacharacters the prefix itself contains (descriptor
/// prefixes always contain underscores).
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
