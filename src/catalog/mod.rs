//! Read-only access to the schedulable source catalog.
//!
//! The catalog lists the refreshable sources (EPG feeds and playlist
//! accounts) that schedules can be attached to. This service never writes
//! to it; reconciliation reads it fresh on every run so sources added or
//! retired since the last run are picked up without restarts.

use async_trait::async_trait;
use tracing::debug;

use crate::error::AppResult;
use crate::repositories::SourceRepository;
use crate::scheduling::SourceKind;

/// One schedulable source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub kind: SourceKind,
    pub id: i32,
    pub name: String,
    /// Feed or server URL, shown truncated in source listings.
    pub url: Option<String>,
}

impl Source {
    pub fn new(kind: SourceKind, id: i32, name: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            name: name.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Source listing seam.
#[async_trait]
pub trait SourceCatalog: Send + Sync {
    /// Active sources of one kind, in catalog order.
    async fn list(&self, kind: SourceKind) -> AppResult<Vec<Source>>;
}

/// Catalog backed by the source tables.
pub struct DbSourceCatalog {
    sources: SourceRepository,
}

impl DbSourceCatalog {
    pub fn new(sources: SourceRepository) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl SourceCatalog for DbSourceCatalog {
    async fn list(&self, kind: SourceKind) -> AppResult<Vec<Source>> {
        let sources = match kind {
            SourceKind::Epg => self
                .sources
                .active_epg_sources()
                .await?
                .into_iter()
                .map(|row| {
                    Source::new(SourceKind::Epg, row.id, row.name).with_url(row.url)
                })
                .collect::<Vec<_>>(),
            SourceKind::Playlist => self
                .sources
                .active_playlist_accounts()
                .await?
                .into_iter()
                .map(|row| {
                    Source::new(SourceKind::Playlist, row.id, row.name)
                        .with_url(row.server_url)
                })
                .collect::<Vec<_>>(),
        };
        debug!(kind = %kind, count = sources.len(), "listed active sources");
        Ok(sources)
    }
}

/// Fixed catalog for tests and offline tooling.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    sources: Vec<Source>,
}

impl StaticCatalog {
    pub fn new(sources: Vec<Source>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl SourceCatalog for StaticCatalog {
    async fn list(&self, kind: SourceKind) -> AppResult<Vec<Source>> {
        Ok(self
            .sources
            .iter()
            .filter(|s| s.kind == kind)
            .cloned()
            .collect())
    }
}
