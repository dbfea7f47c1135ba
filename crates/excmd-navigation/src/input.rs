//! Input classification for `open`, `tabopen` and friends
//!
//! Tiers, first match wins:
//! 1. Empty → no destination (caller picks e.g. the newtab page)
//! 2. Looks like `scheme:rest` and parses → that URI
//! 3. `<keyword> <query>` with a known keyword → provider search
//! 4. `http://` + text parses with a dotted host, a port or a password → domain
//! 5. Default engine search with the whole text

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::search::{SearchRegistry, DEFAULT_ENGINE_ALIAS};
use crate::Result;

/// A scheme followed by a character that is neither whitespace nor a colon.
/// Keeps "error: can't reticulate spline" and "std::map" out of tier 2.
static SCHEME_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9+.-]+:[^\s:]").expect("static pattern"));

/// Outcome of classifying user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResolution {
    /// Nothing was typed
    NoDestination,
    /// Text was already an absolute URI
    Uri(Url),
    /// First word was a provider keyword
    KeywordSearch { keyword: String, url: Url },
    /// Text looked like a bare domain
    Domain(Url),
    /// Fallback search with the default engine
    DefaultSearch(Url),
}

impl InputResolution {
    pub fn url(&self) -> Option<&Url> {
        match self {
            InputResolution::NoDestination => None,
            InputResolution::Uri(url)
            | InputResolution::KeywordSearch { url, .. }
            | InputResolution::Domain(url)
            | InputResolution::DefaultSearch(url) => Some(url),
        }
    }

    pub fn into_url(self) -> Option<Url> {
        match self {
            InputResolution::NoDestination => None,
            InputResolution::Uri(url)
            | InputResolution::KeywordSearch { url, .. }
            | InputResolution::Domain(url)
            | InputResolution::DefaultSearch(url) => Some(url),
        }
    }
}

pub struct InputResolver {
    search: SearchRegistry,
}

impl InputResolver {
    pub fn new() -> Self {
        Self {
            search: SearchRegistry::new(),
        }
    }

    pub fn with_search(search: SearchRegistry) -> Self {
        Self { search }
    }

    pub fn search(&self) -> &SearchRegistry {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchRegistry {
        &mut self.search
    }

    /// Classify input and return only the destination
    pub fn classify(&self, input: &str) -> Result<Option<Url>> {
        Ok(self.resolve(input)?.into_url())
    }

    /// Classify input, keeping track of which tier matched.
    ///
    /// Only a missing or broken default engine is an error; an unknown
    /// keyword in tier 3 just moves on to the next tier.
    pub fn resolve(&self, input: &str) -> Result<InputResolution> {
        let input = input.trim();

        if input.is_empty() {
            return Ok(InputResolution::NoDestination);
        }

        if let Some(url) = self.try_absolute(input) {
            return Ok(InputResolution::Uri(url));
        }

        if let Some(resolution) = self.try_keyword_search(input) {
            return Ok(resolution);
        }

        if let Some(url) = self.try_domain(input) {
            return Ok(InputResolution::Domain(url));
        }

        tracing::debug!(input = %input, "Falling back to default search engine");
        let url = self.search.search_url(DEFAULT_ENGINE_ALIAS, input)?;
        Ok(InputResolution::DefaultSearch(url))
    }

    fn try_absolute(&self, input: &str) -> Option<Url> {
        if !SCHEME_LIKE.is_match(input) {
            return None;
        }
        Url::parse(input).ok()
    }

    fn try_keyword_search(&self, input: &str) -> Option<InputResolution> {
        let (keyword, query) = input.split_once(' ').unwrap_or((input, ""));
        let provider = self.search.get(keyword)?;

        match provider.interpolate(query) {
            Ok(url) => Some(InputResolution::KeywordSearch {
                keyword: provider.keyword,
                url,
            }),
            Err(e) => {
                tracing::debug!(keyword = %keyword, error = %e, "Skipping broken search provider");
                None
            }
        }
    }

    fn try_domain(&self, input: &str) -> Option<Url> {
        let url = Url::parse(&format!("http://{input}")).ok()?;

        let dotted_host = url.host_str().is_some_and(|host| host.contains('.'));
        let has_password = url.password().is_some_and(|p| !p.is_empty());

        if dotted_host || url.port().is_some() || has_password {
            Some(url)
        } else {
            None
        }
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}
