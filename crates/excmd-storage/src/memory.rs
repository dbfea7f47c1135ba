//! In-memory configuration store

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::store::{encode_key, has_prefix, ConfigStore, Entry};
use crate::Result;

/// Volatile store with the same semantics as [`crate::Database`].
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<BTreeMap<Vec<String>, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn owned_key(key: &[&str]) -> Result<Vec<String>> {
        encode_key(key)?;
        Ok(key.iter().map(|s| s.to_string()).collect())
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &[&str]) -> Result<Option<String>> {
        let key = Self::owned_key(key)?;
        Ok(self.values.read().get(&key).cloned())
    }

    fn set(&self, key: &[&str], value: &str) -> Result<()> {
        let key = Self::owned_key(key)?;
        self.values.write().insert(key, value.to_string());
        Ok(())
    }

    fn unset(&self, key: &[&str]) -> Result<()> {
        let key = Self::owned_key(key)?;
        self.values.write().remove(&key);
        Ok(())
    }

    fn entries(&self, prefix: &[&str]) -> Result<Vec<Entry>> {
        Ok(self
            .values
            .read()
            .iter()
            .filter(|(key, _)| has_prefix(key, prefix))
            .map(|(key, value)| Entry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }
}
