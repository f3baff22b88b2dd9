//! Schema versioning through `PRAGMA user_version`.
//!
//! Each step is applied only when the recorded version is below it, so
//! opening an up-to-date file is a no-op.

pub mod v001_initial;

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Version written after the last migration step.
pub const CURRENT_VERSION: u32 = 1;

/// Bring `conn` up to [`CURRENT_VERSION`].
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    tracing::info!(
        current_version = current,
        target_version = CURRENT_VERSION,
        "checking kv schema"
    );

    if current < 1 {
        tracing::info!("applying migration v001_initial");
        v001_initial::up(conn).map_err(|e| StoreError::Migration(e.to_string()))?;
        conn.pragma_update(None, "user_version", 1)?;
    }

    Ok(())
}

/// Recorded `user_version`.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
