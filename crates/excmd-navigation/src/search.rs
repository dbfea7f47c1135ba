//! Search providers
//!
//! A provider is a keyword plus a URL template. `%s` in the template marks
//! where the query goes; without it the query is appended. The query is
//! percent-encoded when it lands in the query string and inserted verbatim
//! when it lands in the path.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

use crate::error::NavigationError;
use crate::Result;

/// Keyword that always means "the configured default engine".
pub const DEFAULT_ENGINE_ALIAS: &str = "search";

const PLACEHOLDER: &str = "%s";

const BUILTIN_PROVIDERS: &[(&str, &str)] = &[
    ("google", "https://www.google.com/search?q="),
    ("bing", "https://www.bing.com/search?q="),
    ("duckduckgo", "https://duckduckgo.com/?q=%s"),
    ("wikipedia", "https://en.wikipedia.org/wiki/Special:Search/"),
    ("github", "https://github.com/search?q=%s"),
    ("mdn", "https://developer.mozilla.org/en-US/search?q="),
    ("osm", "https://www.openstreetmap.org/search?query="),
    ("twitter", "https://twitter.com/search?q="),
    ("youtube", "https://www.youtube.com/results?search_query="),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchProvider {
    pub keyword: String,
    pub template: String,
}

impl SearchProvider {
    pub fn new(keyword: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            template: template.into(),
        }
    }

    /// Build the search URL for `query`
    pub fn interpolate(&self, query: &str) -> Result<Url> {
        interpolate_search_item(&self.template, query).map_err(|e| match e {
            NavigationError::InvalidUrl(reason) => NavigationError::MalformedTemplate {
                keyword: self.keyword.clone(),
                reason,
            },
            other => other,
        })
    }
}

/// Insert `query` into a provider template.
pub fn interpolate_search_item(template: &str, query: &str) -> Result<Url> {
    let pattern = Url::parse(template)
        .map_err(|e| NavigationError::InvalidUrl(format!("{template}: {e}")))?;
    let href = pattern.as_str();

    let has_placeholder = href.contains(PLACEHOLDER);
    // An appended query lands in the query string only if the template has one
    let in_query_string = match pattern.query() {
        Some(query) => !has_placeholder || query.contains(PLACEHOLDER),
        None => false,
    };

    let query = if in_query_string {
        urlencoding::encode(query).into_owned()
    } else {
        query.to_string()
    };

    let interpolated = if has_placeholder {
        href.replacen(PLACEHOLDER, &query, 1)
    } else {
        format!("{href}{query}")
    };

    Url::parse(&interpolated).map_err(|e| NavigationError::InvalidUrl(format!("{interpolated}: {e}")))
}

/// Keyword → template mapping consulted by the input resolver.
#[derive(Debug, Clone)]
pub struct SearchRegistry {
    providers: BTreeMap<String, String>,
    default_engine: String,
}

impl SearchRegistry {
    /// Registry seeded with the built-in providers, defaulting to DuckDuckGo.
    pub fn new() -> Self {
        Self {
            providers: BUILTIN_PROVIDERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            default_engine: "duckduckgo".to_string(),
        }
    }

    /// Registry with no providers at all.
    pub fn empty(default_engine: impl Into<String>) -> Self {
        Self {
            providers: BTreeMap::new(),
            default_engine: default_engine.into(),
        }
    }

    pub fn default_engine(&self) -> &str {
        &self.default_engine
    }

    pub fn set_default_engine(&mut self, keyword: impl Into<String>) {
        self.default_engine = keyword.into();
    }

    /// Add or replace a provider
    pub fn insert(&mut self, keyword: impl Into<String>, template: impl Into<String>) {
        self.providers.insert(keyword.into(), template.into());
    }

    pub fn remove(&mut self, keyword: &str) -> Option<String> {
        self.providers.remove(keyword)
    }

    fn canonical<'a>(&'a self, keyword: &'a str) -> &'a str {
        if keyword == DEFAULT_ENGINE_ALIAS {
            self.default_engine.as_str()
        } else {
            keyword
        }
    }

    /// Look up a provider. `search` resolves to the default engine.
    pub fn get(&self, keyword: &str) -> Option<SearchProvider> {
        let keyword = self.canonical(keyword);
        self.providers
            .get(keyword)
            .map(|template| SearchProvider::new(keyword, template.clone()))
    }

    pub fn providers(&self) -> impl Iterator<Item = SearchProvider> + '_ {
        self.providers
            .iter()
            .map(|(k, v)| SearchProvider::new(k.clone(), v.clone()))
    }

    /// Explicit keyword search; an unknown keyword is an error.
    pub fn search_url(&self, keyword: &str, query: &str) -> Result<Url> {
        let provider = self
            .get(keyword)
            .ok_or_else(|| NavigationError::UnknownProvider(self.canonical(keyword).to_string()))?;
        provider.interpolate(query)
    }
}

impl Default for SearchRegistry {
    fn default() -> Self {
        Self::new()
    }
}
