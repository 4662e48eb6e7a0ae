//! Async database connection pool implementation.
//!
//! Uses bb8 connection pool manager with diesel_async for PostgreSQL connections.

use std::time::Duration;

use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;

use crate::config::settings::DatabaseConfig;
use crate::error::AppError;

/// Async connection pool type alias.
///
/// bb8::Pool internally uses Arc, so Clone is cheap (just reference count
/// increment). Structures holding AsyncDbPool can derive Clone without
/// additional Arc wrapping.
pub type AsyncDbPool = Pool<AsyncPgConnection>;

/// Creates an async database connection pool from the database settings.
///
/// # Errors
///
/// Returns `AppError::ConnectionPool` when the pool cannot be built, for
/// example when the database is unreachable within the connection timeout.
pub async fn establish_async_connection_pool(
    config: &DatabaseConfig,
) -> Result<AsyncDbPool, AppError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.url.clone());
    let pool = Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(Duration::from_secs(config.connection_timeout))
        .build(manager)
        .await
        .map_err(|e| AppError::ConnectionPool {
            source: anyhow::Error::from(e),
        })?;
    Ok(pool)
}
