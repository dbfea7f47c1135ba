//! Navigation commands

use excmd_core::navigation::{increment, parent, rewrite, root};
use excmd_core::{CoreError, Result, TabError, UrlModifyMode};
use url::Url;

use crate::state::AppState;

/// Turn typed text into a URL. `about:` and `file:` pages pass through as
/// typed; `None` means there was nothing to go to.
pub fn resolve_target(state: &AppState, text: &str) -> Result<Option<String>> {
    let text = text.trim();
    if text.starts_with("about:") || text.starts_with("file:") {
        return Ok(Some(text.to_string()));
    }

    let resolution = state.with_workspace(|workspace| Ok(workspace.resolver.resolve(text)?))?;
    tracing::debug!(input = %text, resolution = ?resolution, "Resolved input");
    Ok(resolution.into_url().map(String::from))
}

fn navigate(state: &AppState, url: String) -> Result<()> {
    tracing::info!(url = %url, "Navigating");
    state.with_workspace_mut(|workspace| Ok(workspace.tabs_mut().navigate_active(url)?))
}

fn current(state: &AppState) -> Result<Url> {
    let text = state.with_workspace(|workspace| workspace.current_url())?;
    Url::parse(&text).map_err(|e| CoreError::Tab(TabError::InvalidUrl(format!("{text}: {e}"))))
}

pub fn open(state: &AppState, target: &str) -> Result<Option<String>> {
    match resolve_target(state, target)? {
        Some(url) => navigate(state, url).map(|()| None),
        None => Err(CoreError::Arity {
            command: "open".to_string(),
            expected: "a destination",
        }),
    }
}

pub fn home(state: &AppState) -> Result<Option<String>> {
    navigate(state, state.config().homepage.clone())?;
    Ok(None)
}

/// `search <keyword> <query>` through one provider, ignoring the classifier.
pub fn search(state: &AppState, keyword: &str, query: &str) -> Result<Option<String>> {
    let url = state.with_workspace(|workspace| {
        Ok(workspace.resolver.search().search_url(keyword, query)?)
    })?;
    navigate(state, url.into())?;
    Ok(None)
}

pub fn urlmodify(state: &AppState, mode: &UrlModifyMode) -> Result<Option<String>> {
    let url = current(state)?;
    match rewrite(&url, mode)? {
        Some(rewritten) => {
            navigate(state, rewritten.into())?;
            Ok(None)
        }
        None => Ok(Some(format!("urlmodify {}: URL unchanged", mode.flag()))),
    }
}

pub fn urlincrement(state: &AppState, count: i64) -> Result<Option<String>> {
    let url = current(state)?;
    match increment(&url, count) {
        Some(next) => navigate(state, next.into()).map(|()| None),
        None => Ok(Some("No number to increment in this URL".to_string())),
    }
}

pub fn urlroot(state: &AppState) -> Result<Option<String>> {
    let url = current(state)?;
    match root(&url) {
        Some(rooted) => navigate(state, rooted.into()).map(|()| None),
        None => Ok(Some("Already at the root".to_string())),
    }
}

pub fn urlparent(state: &AppState, levels: usize) -> Result<Option<String>> {
    let url = current(state)?;
    match parent(&url, levels) {
        Some(up) => navigate(state, up.into()).map(|()| None),
        None => Ok(Some("No parent to go to".to_string())),
    }
}

pub fn current_url(state: &AppState, prefix: &str) -> Result<Option<String>> {
    let url = state.with_workspace(|workspace| workspace.current_url())?;
    Ok(Some(if prefix.is_empty() {
        url
    } else {
        format!("{prefix} {url}")
    }))
}
