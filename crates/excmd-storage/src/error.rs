//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Corrupt key in store: {0}")]
    CorruptKey(#[from] serde_json::Error),

    #[error("Config key cannot be empty")]
    EmptyKey,
}
