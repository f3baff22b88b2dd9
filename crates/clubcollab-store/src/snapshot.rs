//! Whole-snapshot codec for the three storage slots.
//!
//! Each slot is one JSON document that is always read and written in full.
//! `encode`/`decode` are the pure halves; the `load_*`/`save_*` helpers bind
//! them to a [`KvStore`] and a slot key.

use clubcollab_shared::constants::{CLUBS_STORAGE_KEY, CURRENT_USER_KEY, USERS_STORAGE_KEY};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::kv::KvStore;
use crate::models::{Club, User, UserRecord};

/// Serialize a snapshot destined for `key`.
pub fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })
}

/// Parse a snapshot read from `key`.
pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })
}

fn read_slot<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => {
            tracing::debug!(key, bytes = raw.len(), "loaded snapshot");
            decode(key, &raw).map(Some)
        }
        None => Ok(None),
    }
}

fn write_slot<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> Result<()> {
    let raw = encode(key, value)?;
    tracing::debug!(key, bytes = raw.len(), "writing snapshot");
    store.set(key, &raw)
}

// ---------------------------------------------------------------------------
// Registration table
// ---------------------------------------------------------------------------

/// Missing slot reads as an empty table.
pub fn load_users(store: &dyn KvStore) -> Result<Vec<UserRecord>> {
    Ok(read_slot(store, USERS_STORAGE_KEY)?.unwrap_or_default())
}

pub fn save_users(store: &dyn KvStore, users: &[UserRecord]) -> Result<()> {
    write_slot(store, USERS_STORAGE_KEY, users)
}

// ---------------------------------------------------------------------------
// Session pointer
// ---------------------------------------------------------------------------

pub fn load_session(store: &dyn KvStore) -> Result<Option<User>> {
    read_slot(store, CURRENT_USER_KEY)
}

pub fn save_session(store: &dyn KvStore, user: &User) -> Result<()> {
    write_slot(store, CURRENT_USER_KEY, user)
}

pub fn clear_session(store: &dyn KvStore) -> Result<()> {
    store.remove(CURRENT_USER_KEY)
}

// ---------------------------------------------------------------------------
// Clubs
// ---------------------------------------------------------------------------

/// Missing slot reads as an empty club list.
pub fn load_clubs(store: &dyn KvStore) -> Result<Vec<Club>> {
    Ok(read_slot(store, CLUBS_STORAGE_KEY)?.unwrap_or_default())
}

pub fn save_clubs(store: &dyn KvStore, clubs: &[Club]) -> Result<()> {
    write_slot(store, CLUBS_STORAGE_KEY, clubs)
}
