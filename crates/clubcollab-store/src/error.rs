use thiserror::Error;

/// Failures of a storage backend or of the snapshot codec.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Creating the database directory failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    /// A stored blob could not be decoded, or a snapshot could not be encoded.
    #[error("Corrupt data under key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory backend's lock was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;
