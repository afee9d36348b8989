//! SQLite DDL for the chart state store.

use rusqlite::Connection;

/// Schema version written to `schema_meta` on a fresh database.
pub(crate) const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Uses `IF NOT EXISTS` throughout so `apply_schema` is idempotent.
pub(crate) const SCHEMA_SQL: &str = r#"
-- Schema version tracking.
CREATE TABLE IF NOT EXISTS schema_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- One row per (user, project): the whole task list as JSON.
CREATE TABLE IF NOT EXISTS gantt_states (
    user_id    TEXT NOT NULL,
    project_id TEXT NOT NULL,
    state_data TEXT NOT NULL,              -- JSON array of tasks
    created_at INTEGER NOT NULL DEFAULT 0, -- epoch millis
    updated_at INTEGER NOT NULL DEFAULT 0, -- epoch millis
    PRIMARY KEY (user_id, project_id)
);
"#;

/// Apply the full schema to an open connection.
///
/// Safe to call multiple times. Seeds the schema version on a fresh database.
pub(crate) fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        rusqlite::params![CURRENT_SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}

/// Read the schema version, if recorded.
pub(crate) fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<u32>> {
    use rusqlite::OptionalExtension;

    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM schema_meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value.and_then(|v| v.parse().ok()))
}
