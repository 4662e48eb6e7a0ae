//! Migrate command handler
//!
//! Handles database migration operations including dry-run and rollback.

use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;

use crate::config::settings::Settings;
use crate::db::MIGRATIONS;
use crate::error::{AppError, AppResult};

/// Handler for the migrate command
pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    /// Create a new migrate command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the migrate command with dry-run and rollback support
    ///
    /// # Arguments
    /// * `dry_run` - If true, shows pending migrations without applying them
    /// * `rollback` - Optional number of migrations to rollback
    ///
    /// # Returns
    /// Returns Ok(()) on success, or AppError on failure
    ///
    /// # Errors
    /// - Database connection errors
    /// - Migration execution errors
    /// - Configuration validation errors
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        // Validate database configuration first
        self.config.database.validate()?;

        if dry_run {
            self.show_pending_migrations().await?;
            return Ok(());
        }

        if let Some(steps) = rollback {
            self.rollback_migrations(steps).await?;
        } else {
            self.run_migrations().await?;
        }

        Ok(())
    }

    /// Show pending migrations without applying them
    async fn show_pending_migrations(&self) -> AppResult<()> {
        println!("Checking for pending migrations...");

        let pending_count =
            with_blocking_connection(self.config.database.url.clone(), |conn| {
                let pending =
                    conn.pending_migrations(MIGRATIONS)
                        .map_err(|e| AppError::Database {
                            operation: "check pending migrations".to_string(),
                            source: anyhow::anyhow!("Migration error: {}", e),
                        })?;
                Ok(pending.len())
            })
            .await?;

        if pending_count == 0 {
            println!("✓ No pending migrations found - database is up to date");
        } else {
            println!("Found {} pending migration(s)", pending_count);
            println!("\nRun without --dry-run to apply these migrations");
        }

        Ok(())
    }

    /// Run pending migrations
    async fn run_migrations(&self) -> AppResult<()> {
        println!("Running database migrations...");

        let applied_migrations =
            with_blocking_connection(self.config.database.url.clone(), |conn| {
                let applied =
                    conn.run_pending_migrations(MIGRATIONS)
                        .map_err(|e| AppError::Database {
                            operation: "run pending migrations".to_string(),
                            source: anyhow::anyhow!("Migration error: {}", e),
                        })?;
                Ok(applied.iter().map(|m| m.to_string()).collect::<Vec<_>>())
            })
            .await?;

        if applied_migrations.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied_migrations.len());
            for migration in &applied_migrations {
                println!("  - {}", migration);
            }
            println!("Database migration completed successfully");
        }

        Ok(())
    }

    /// Rollback the specified number of migrations
    async fn rollback_migrations(&self, steps: u32) -> AppResult<()> {
        if steps == 0 {
            return Err(AppError::Validation {
                field: "rollback_steps".to_string(),
                reason: "Number of rollback steps must be greater than 0".to_string(),
            });
        }

        println!("Rolling back {} migration(s)...", steps);

        let reverted_count =
            with_blocking_connection(self.config.database.url.clone(), move |conn| {
                let applied = conn.applied_migrations().map_err(|e| AppError::Database {
                    operation: "get applied migrations".to_string(),
                    source: anyhow::anyhow!("Migration error: {}", e),
                })?;

                if applied.len() < steps as usize {
                    return Err(AppError::Validation {
                        field: "rollback_steps".to_string(),
                        reason: format!(
                            "Cannot rollback {} migrations - only {} applied migrations available",
                            steps,
                            applied.len()
                        ),
                    });
                }

                let mut reverted_count = 0;
                for _ in 0..steps {
                    conn.revert_last_migration(MIGRATIONS)
                        .map_err(|e| AppError::Database {
                            operation: "revert migration".to_string(),
                            source: anyhow::anyhow!("Migration rollback error: {}", e),
                        })?;
                    reverted_count += 1;
                }

                Ok(reverted_count)
            })
            .await?;

        println!("✓ Rolled back {} migration(s)", reverted_count);
        println!("Migration rollback completed successfully");

        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}

/// Runs a migration operation over a blocking connection on the blocking pool.
///
/// The diesel MigrationHarness only works with synchronous connections.
async fn with_blocking_connection<T, F>(database_url: String, operation: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> AppResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        use diesel::Connection;

        let mut conn = PgConnection::establish(&database_url).map_err(|e| AppError::Database {
            operation: "establish migration connection".to_string(),
            source: anyhow::anyhow!("Connection error: {}", e),
        })?;

        operation(&mut conn)
    })
    .await
    .map_err(|e| AppError::Internal {
        source: anyhow::Error::from(e),
    })?
}
