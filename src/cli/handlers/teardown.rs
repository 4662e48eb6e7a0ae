//! Teardown command handler
//!
//! Removes every persisted schedule descriptor this service owns and
//! disables the built-in per-source interval tasks. Descriptors written
//! by other tools in the shared table are left untouched.

use crate::config::settings::Settings;
use crate::db::establish_async_connection_pool;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Handler for the teardown command
pub struct TeardownCommandHandler {
    config: Settings,
}

impl TeardownCommandHandler {
    /// Create a new teardown command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the teardown command
    ///
    /// # Arguments
    /// * `yes` - Confirmation flag. Without it the command refuses to run.
    ///
    /// # Returns
    /// Returns Ok(()) after removal, or AppError on failure
    ///
    /// # Errors
    /// - Validation error when --yes is missing
    /// - Database connection errors
    /// - Descriptor removal errors
    pub async fn execute(&self, yes: bool) -> AppResult<()> {
        if !yes {
            println!("Teardown removes every schedule this service owns.");
            println!("A later sync recreates them from the settings document.");
            println!("\nRe-run with --yes to confirm.");
            return Err(AppError::Validation {
                field: "yes".to_string(),
                reason: "Teardown requires explicit --yes confirmation".to_string(),
            });
        }

        self.config.database.validate()?;

        let pool = establish_async_connection_pool(&self.config.database).await?;
        let state = AppState::new(pool, &self.config.scheduler);

        let removed = state.services.schedules.remove_all().await?;
        println!("{}", removed.message);

        let disabled = state.services.schedules.disable_builtin_intervals().await?;
        println!("{}", disabled.message);

        println!("Teardown completed successfully");
        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
