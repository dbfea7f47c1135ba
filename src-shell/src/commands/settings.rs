//! Settings commands

use excmd_core::{
    AliasTable, BookmarkToggle, CoreError, KeyBinds, Result, SEARCH_URL_NAMESPACE,
};

use super::navigation::resolve_target;
use crate::state::AppState;

/// Save a search keyword and make it usable right away.
pub fn searchsetkeyword(state: &AppState, keyword: &str, url: &str) -> Result<Option<String>> {
    let template = resolve_target(state, url)?.ok_or_else(|| CoreError::Arity {
        command: "searchsetkeyword".to_string(),
        expected: "a keyword and a URL",
    })?;

    state.store().set(&[SEARCH_URL_NAMESPACE, keyword], &template)?;
    state.with_workspace_mut(|workspace| {
        workspace.resolver.search_mut().insert(keyword, template.clone());
        Ok(())
    })?;

    tracing::info!(keyword = %keyword, template = %template, "Set search keyword");
    Ok(None)
}

/// Toggle a bookmark for `url` (default: the current page).
pub fn bmark(state: &AppState, url: Option<&str>, title: &str) -> Result<Option<String>> {
    let (url, default_title) = match url {
        Some(target) => {
            let url = resolve_target(state, target)?.ok_or_else(|| CoreError::Arity {
                command: "bmark".to_string(),
                expected: "a URL",
            })?;
            (url, String::new())
        }
        None => state.with_workspace(|workspace| {
            let tab = workspace
                .tabs()
                .active()
                .ok_or(excmd_core::TabError::EmptyCollection)?;
            Ok((tab.url.clone(), tab.title.clone()))
        })?,
    };
    let title = if title.is_empty() { default_title } else { title.to_string() };

    let outcome =
        state.with_workspace_mut(|workspace| workspace.bookmarks.toggle(&url, &title))?;
    state.save_bookmarks()?;

    Ok(Some(match outcome {
        BookmarkToggle::Added { folder, .. } => format!("Bookmarked {url} in {folder}"),
        BookmarkToggle::Removed(count) => format!("Removed {count} bookmark(s) for {url}"),
    }))
}

pub fn comlist(state: &AppState) -> Result<Option<String>> {
    let aliases = AliasTable::new(state.store()).list()?;
    Ok(Some(
        aliases
            .iter()
            .map(|(name, expansion)| format!("command {name} {expansion}"))
            .collect::<Vec<_>>()
            .join("\n"),
    ))
}

pub fn bindlist(state: &AppState) -> Result<Option<String>> {
    let binds = KeyBinds::new(state.store()).list()?;
    Ok(Some(
        binds
            .iter()
            .map(|(keys, exstr)| format!("bind {keys} {exstr}"))
            .collect::<Vec<_>>()
            .join("\n"),
    ))
}
