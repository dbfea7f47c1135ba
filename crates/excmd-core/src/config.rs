//! Interpreter configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use excmd_navigation::SearchRegistry;
use excmd_storage::ConfigStore;

use crate::Result;

/// Store namespace for keywords added with `searchsetkeyword`.
pub const SEARCH_URL_NAMESPACE: &str = "searchurls";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Keyword of the default search engine
    pub search_engine: String,
    /// Extra or overridden search keywords
    pub search_urls: BTreeMap<String, String>,
    /// Page opened by `tabopen` without arguments; `None` means a blank tab
    pub newtab: Option<String>,
    /// Page opened by `home`
    pub homepage: String,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("excmd.db"),
            search_engine: "duckduckgo".to_string(),
            search_urls: BTreeMap::new(),
            newtab: None,
            homepage: "about:blank".to_string(),
            log_level: "info".to_string(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("excmd"))
            .unwrap_or_else(|| PathBuf::from(".excmd"))
    }

    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Built-in providers, then `search_urls`, then keywords saved in `store`.
    pub fn search_registry(&self, store: &dyn ConfigStore) -> Result<SearchRegistry> {
        let mut registry = SearchRegistry::new();
        registry.set_default_engine(self.search_engine.clone());

        for (keyword, template) in &self.search_urls {
            registry.insert(keyword.clone(), template.clone());
        }
        for entry in store.entries(&[SEARCH_URL_NAMESPACE])? {
            if let [_, keyword] = entry.key.as_slice() {
                registry.insert(keyword.clone(), entry.value);
            }
        }

        Ok(registry)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
