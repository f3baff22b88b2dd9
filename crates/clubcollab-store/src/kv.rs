//! Named storage slots.
//!
//! A slot holds one whole document under a string key; writing a slot always
//! replaces its previous content.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::{Result, StoreError};

/// Key-value slot storage.
pub trait KvStore {
    /// Read a slot.  A missing slot is `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or overwrite a slot.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot.  Removing a missing slot is a no-op.
    fn remove(&self, key: &str) -> Result<()>;
}

impl KvStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn()
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// In-process slot storage, the equivalent of a browser's local storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.lock().map_err(|_| StoreError::LockPoisoned)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut slots = self.slots.lock().map_err(|_| StoreError::LockPoisoned)?;
        slots.remove(key);
        Ok(())
    }
}
