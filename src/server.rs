//! Server module for managing HTTP server lifecycle
//!
//! This module handles server initialization, startup, and graceful shutdown.

use crate::api::routes::create_router;
use crate::config::{DatabaseConfig, Environment, settings::Settings};
use crate::db::{MIGRATIONS, establish_async_connection_pool};
use crate::state::AppState;
use tokio::net::TcpListener;
use tokio::signal;

/// HTTP server manager
pub struct Server {
    settings: Settings,
}

impl Server {
    /// Create a new server with the given settings
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start the server and run until shutdown signal
    ///
    /// This method:
    /// 1. Logs startup information
    /// 2. Applies pending migrations when auto_migrate is enabled
    /// 3. Initializes database connection pool
    /// 4. Creates application state and optionally reconciles schedules
    /// 5. Binds to configured address
    /// 6. Starts the HTTP server with graceful shutdown
    ///
    /// # Returns
    /// Returns Ok(()) on successful shutdown, or error on startup failure
    ///
    /// # Errors
    /// - Database connection pool initialization errors
    /// - Migration errors when auto_migrate is enabled
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        // Log application startup information
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %Environment::from_env().as_str(),
            "Application starting"
        );

        // Log server configuration
        tracing::info!(
            host = %self.settings.server.host,
            port = %self.settings.server.port,
            request_timeout = %self.settings.server.request_timeout,
            keep_alive_timeout = %self.settings.server.keep_alive_timeout,
            "Server configuration loaded"
        );

        // Log database configuration (without sensitive URL details)
        tracing::info!(
            max_connections = %self.settings.database.max_connections,
            min_connections = %self.settings.database.min_connections,
            connection_timeout = %self.settings.database.connection_timeout,
            auto_migrate = %self.settings.database.auto_migrate,
            "Database configuration loaded"
        );

        // Log scheduler configuration
        tracing::info!(
            default_timezone = %self.settings.scheduler.default_timezone,
            sync_on_start = %self.settings.scheduler.sync_on_start,
            "Scheduler configuration loaded"
        );

        // Log logger configuration
        tracing::info!(
            level = %self.settings.logger.level,
            console_enabled = %self.settings.logger.console.enabled,
            file_enabled = %self.settings.logger.file.enabled,
            "Logger configuration loaded"
        );

        tracing::info!("Configuration loaded successfully");

        // Apply pending migrations before opening the pool
        if self.settings.database.auto_migrate {
            tracing::info!("Applying pending migrations...");
            run_pending_migrations(&self.settings.database).await?;
        }

        // Initialize database connection pool
        tracing::info!("Initializing database connection pool...");
        let pool = establish_async_connection_pool(&self.settings.database).await?;
        tracing::info!("Database connection pool initialized");

        // Create application state with services
        let state = AppState::new(pool, &self.settings.scheduler);
        tracing::info!("Application state created");

        // Reconcile persisted descriptors against the settings document once
        // at startup. Failures are logged and do not abort startup.
        if self.settings.scheduler.sync_on_start {
            tracing::info!("Reconciling schedules on startup");
            match state.services.schedules.sync().await {
                Ok(outcome) if outcome.success => {
                    tracing::info!(message = %outcome.message, "Startup reconcile complete");
                }
                Ok(outcome) => {
                    tracing::warn!(message = %outcome.message, "Startup reconcile finished with failures");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Startup reconcile failed");
                }
            }
        }

        // Create router with all routes and middleware
        let router = create_router(state, &self.settings.server);
        tracing::info!("Router configured");

        // Bind to the configured address
        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        // Start the server with graceful shutdown
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Applies any pending embedded migrations over a blocking connection.
async fn run_pending_migrations(database: &DatabaseConfig) -> anyhow::Result<()> {
    let database_url = database.url.clone();
    let applied: Vec<String> = tokio::task::spawn_blocking(move || {
        use diesel::Connection;
        use diesel::pg::PgConnection;
        use diesel_migrations::MigrationHarness;

        let mut conn = PgConnection::establish(&database_url)
            .map_err(|e| anyhow::anyhow!("Connection error: {}", e))?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("Migration error: {}", e))?;

        Ok::<_, anyhow::Error>(applied.iter().map(|m| m.to_string()).collect())
    })
    .await??;

    if applied.is_empty() {
        tracing::info!("No pending migrations");
    } else {
        tracing::info!(count = applied.len(), migrations = ?applied, "Applied migrations");
    }

    Ok(())
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
///
/// This function returns when either signal is received, allowing
/// the server to perform graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
