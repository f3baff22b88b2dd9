//! v001 -- Initial schema creation.
//!
//! Creates the single `kv` table.  Each row is one named storage slot holding
//! a whole JSON document.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Key-value slots
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS kv (
    key        TEXT PRIMARY KEY NOT NULL,   -- slot name, e.g. 'club-collab-clubs'
    value      TEXT NOT NULL,               -- JSON document
    updated_at TEXT NOT NULL                -- ISO-8601 / RFC-3339
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
