//! # clubcollab-store
//!
//! Local key-value persistence for Club Collab.
//!
//! Every piece of application state lives in one of three keyed JSON blobs
//! (registration table, session user, club list). The [`KvStore`] trait is the
//! slot abstraction; [`Database`] backs it with SQLite and [`MemoryStore`]
//! keeps everything in process. The [`snapshot`] module is the typed codec
//! that reads and writes each blob as a whole.

pub mod database;
pub mod kv;
pub mod migrations;
pub mod models;
pub mod snapshot;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use kv::{KvStore, MemoryStore};
pub use models::*;
