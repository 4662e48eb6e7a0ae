//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::settings::Settings;
use crate::error::AppResult;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    /// Create a new serve command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the serve command with optional dry-run support
    ///
    /// # Arguments
    /// * `dry_run` - If true, validates configuration and exits without starting server
    ///
    /// # Returns
    /// Returns Ok(()) on success, or AppError on failure
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Server startup errors (if not dry-run)
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            self.validate_only().await
        } else {
            // For actual server startup, this returns Ok and lets main.rs handle it
            Ok(())
        }
    }

    /// Validate configuration without starting the server
    pub async fn validate_only(&self) -> AppResult<()> {
        self.validate_configuration()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ Database URL is configured");
        println!(
            "✓ Scheduler timezone: {} (sync on start: {})",
            self.config.scheduler.default_timezone, self.config.scheduler.sync_on_start
        );
        println!("✓ Logger configuration is valid");

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    /// Validate the current configuration
    fn validate_configuration(&self) -> AppResult<()> {
        self.config.validate().map_err(|e| e.into())
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
