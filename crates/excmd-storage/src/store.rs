//! Compound-key configuration store

use crate::error::StorageError;
use crate::Result;

/// A stored value together with its full compound key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: Vec<String>,
    pub value: String,
}

/// Synchronous get/set/unset keyed by compound keys.
///
/// The interpreter only ever touches configuration through this trait, so
/// the alias table, key binds and search keywords work the same against the
/// SQLite store and the in-memory one.
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &[&str]) -> Result<Option<String>>;

    fn set(&self, key: &[&str], value: &str) -> Result<()>;

    /// Remove a value. Removing an absent key is not an error.
    fn unset(&self, key: &[&str]) -> Result<()>;

    /// All entries whose key starts with `prefix`, ordered by key.
    fn entries(&self, prefix: &[&str]) -> Result<Vec<Entry>>;
}

pub(crate) fn encode_key(key: &[&str]) -> Result<String> {
    if key.is_empty() || key.iter().any(|part| part.is_empty()) {
        return Err(StorageError::EmptyKey);
    }
    Ok(serde_json::to_string(key)?)
}

pub(crate) fn decode_key(raw: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(raw)?)
}

pub(crate) fn has_prefix(key: &[String], prefix: &[&str]) -> bool {
    key.len() >= prefix.len() && key.iter().zip(prefix).all(|(a, b)| a == b)
}
