//! Source catalog repository for async database operations.
//!
//! Reads the EPG source and playlist account tables that drive schedule
//! reconciliation. The rows are owned by the host engine; this service
//! only ever reads them.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{EpgSource, PlaylistAccount};

/// Source repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap
/// (just reference count increment). No need for `Arc<SourceRepository>`.
#[derive(Clone)]
pub struct SourceRepository {
    pool: AsyncDbPool,
}

impl SourceRepository {
    /// Creates a new SourceRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Lists all active EPG sources, ordered by id.
    ///
    /// Inactive sources are excluded; a deactivated source keeps its row
    /// but drops out of reconciliation until it is reactivated.
    pub async fn active_epg_sources(&self) -> Result<Vec<EpgSource>, AppError> {
        use crate::schema::epg_sources::dsl::*;
        let mut conn = self.pool.get().await?;

        epg_sources
            .filter(is_active.eq(true))
            .order(id.asc())
            .select(EpgSource::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Lists all active playlist accounts, ordered by id.
    pub async fn active_playlist_accounts(&self) -> Result<Vec<PlaylistAccount>, AppError> {
        use crate::schema::playlist_accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        playlist_accounts
            .filter(is_active.eq(true))
            .order(id.asc())
            .select(PlaylistAccount::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
