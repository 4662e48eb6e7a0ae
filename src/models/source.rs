use diesel::prelude::*;
use jiff_diesel::DateTime;

/// EPG feed row. Catalog data owned by the host engine, read-only here.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::epg_sources)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EpgSource {
    pub id: i32,
    pub name: String,
    pub url: String,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Playlist provider account row, read-only here.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::playlist_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PlaylistAccount {
    pub id: i32,
    pub name: String,
    pub server_url: String,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}
