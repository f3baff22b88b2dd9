//! SQLite backend for the key-value slots.
//!
//! Every constructor brings the schema up to date, so a [`Database`] handed
//! out is always ready for [`crate::KvStore`] calls.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::migrations;

/// A single SQLite connection with the `kv` schema applied.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open `clubcollab.db` in the per-user data directory, creating it
    /// on first run:
    /// - Linux:   `~/.local/share/clubcollab/clubcollab.db`
    /// - macOS:   `~/Library/Application Support/com.clubcollab.clubcollab/clubcollab.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\clubcollab\clubcollab\data\clubcollab.db`
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "clubcollab", "clubcollab").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("clubcollab.db");

        tracing::info!(path = %db_path.display(), "opening database");

        Self::open_at(&db_path)
    }

    /// Open `path`, creating the file and any missing parent directories.
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run_migrations(&conn)?;

        Ok(Self { conn })
    }

    /// Open a throwaway database that lives only as long as this handle.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Raw connection, for migrations and the `KvStore` impl.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// File backing this handle.  `None` for in-memory databases.
    pub fn path(&self) -> Option<PathBuf> {
        self.conn
            .path()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}
