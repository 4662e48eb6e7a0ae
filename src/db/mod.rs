//! Database connection pool module.
//!
//! Provides async PostgreSQL connection pooling using diesel_async with bb8,
//! plus the embedded migrations the migrate command applies.

mod pool;

use diesel_migrations::{embed_migrations, EmbeddedMigrations};

pub use pool::{establish_async_connection_pool, AsyncDbPool};

/// All SQL migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");
