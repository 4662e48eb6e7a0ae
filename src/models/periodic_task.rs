use diesel::prelude::*;
use jiff_diesel::DateTime;
use serde_json::Value as JsonValue;

/// Row in the shared periodic task table.
///
/// The table is shared with the host engine; rows this service owns are
/// the ones named `recron_<kind>_<id>`. The unique index on `name` is what
/// the upsert path leans on.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::periodic_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PeriodicTask {
    pub id: i32,
    pub name: String,
    pub cron_expression: String,
    pub task: String,
    pub args: JsonValue,
    pub enabled: bool,
    pub description: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Insert shape for new task rows. Timestamps come from column defaults.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::periodic_tasks)]
pub struct NewPeriodicTask<'a> {
    pub name: &'a str,
    pub cron_expression: &'a str,
    pub task: &'a str,
    pub args: &'a JsonValue,
    pub enabled: bool,
    pub description: &'a str,
}

/// Changeset applied when refreshing an existing row in place.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::periodic_tasks)]
pub struct PeriodicTaskChanges<'a> {
    pub cron_expression: &'a str,
    pub task: &'a str,
    pub args: &'a JsonValue,
    pub enabled: bool,
    pub description: &'a str,
}
