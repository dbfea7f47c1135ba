//! Tab management commands
use excmd_core::{OrdinalReference, Result, TabList};

use super::navigation::resolve_target;
use crate::state::AppState;

/// `tabopen` with no target uses `newtab`, then a blank page.
pub fn tabopen(state: &AppState, target: &str, background: bool) -> Result<Option<String>> {
    let url = match resolve_target(state, target)? {
        Some(url) => url,
        None => state
            .config()
            .newtab
            .clone()
            .unwrap_or_else(|| "about:blank".to_string()),
    };

    state.with_workspace_mut(|workspace| {
        workspace.tabs_mut().open_after_active(url, !background)?;
        Ok(None)
    })
}

pub fn winopen(state: &AppState, target: &str) -> Result<Option<String>> {
    let url = resolve_target(state, target)?.unwrap_or_else(|| "about:blank".to_string());

    state.with_workspace_mut(|workspace| {
        let mut tabs = TabList::new();
        tabs.open(url, 0, true)?;
        workspace.windows.push(tabs);
        workspace.current_window = workspace.windows.len() - 1;

        tracing::info!(window = workspace.current_window, "Opened window");
        Ok(None)
    })
}

pub fn buffer(state: &AppState, reference: OrdinalReference) -> Result<Option<String>> {
    state.with_workspace_mut(|workspace| {
        let tabs = workspace.tabs_mut();
        let position = tabs.resolve(reference)?;
        tabs.activate(position)?;
        Ok(None)
    })
}

pub fn tabclose(state: &AppState, references: &[OrdinalReference]) -> Result<Option<String>> {
    state.with_workspace_mut(|workspace| {
        let tabs = workspace.tabs_mut();
        let references = if references.is_empty() {
            &[OrdinalReference::Current][..]
        } else {
            references
        };

        // Resolve everything first so earlier closes don't shift later ordinals
        let mut positions = references
            .iter()
            .map(|reference| tabs.resolve(*reference))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        positions.sort_unstable();
        positions.dedup();

        for position in positions.into_iter().rev() {
            tabs.close(position)?;
        }
        Ok(None)
    })
}

pub fn tabonly(state: &AppState) -> Result<Option<String>> {
    state.with_workspace_mut(|workspace| {
        let closed = workspace.tabs_mut().close_others();
        Ok((!closed.is_empty()).then(|| format!("Closed {} tab(s)", closed.len())))
    })
}

pub fn pin(state: &AppState) -> Result<Option<String>> {
    state.with_workspace_mut(|workspace| {
        let tabs = workspace.tabs_mut();
        let position = tabs.resolve(OrdinalReference::Current)?;
        let pinned = tabs.toggle_pin(position)?;
        let message = if pinned { "Pinned" } else { "Unpinned" };
        Ok(Some(message.to_string()))
    })
}

pub fn tabnext(state: &AppState, increment: i64) -> Result<Option<String>> {
    state.with_workspace_mut(|workspace| {
        workspace.tabs_mut().next(increment)?;
        Ok(None)
    })
}

pub fn tabprev(state: &AppState, increment: i64) -> Result<Option<String>> {
    state.with_workspace_mut(|workspace| {
        workspace.tabs_mut().prev(increment)?;
        Ok(None)
    })
}

pub fn tabmove(state: &AppState, spec: &str) -> Result<Option<String>> {
    state.with_workspace_mut(|workspace| {
        workspace.tabs_mut().move_active(spec)?;
        Ok(None)
    })
}

/// One line per tab: `%` marks the active tab, `#` the previous one.
pub fn list(state: &AppState) -> Result<Option<String>> {
    state.with_workspace(|workspace| {
        let tabs = workspace.tabs();
        let active = tabs.active_position();
        let previous = tabs.resolve(OrdinalReference::Previous).ok();

        let lines: Vec<String> = tabs
            .tabs()
            .iter()
            .enumerate()
            .map(|(position, tab)| {
                let marker = if Some(position) == active {
                    '%'
                } else if Some(position) == previous {
                    '#'
                } else {
                    ' '
                };
                let pin = if tab.pinned { "[pinned] " } else { "" };
                format!("{marker}{:>3}: {pin}{}", position + 1, tab.display_title())
            })
            .collect();

        Ok(Some(lines.join("\n")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_state;

    fn urls(state: &AppState) -> Vec<String> {
        state
            .with_workspace(|ws| Ok(ws.tabs().tabs().iter().map(|t| t.url.clone()).collect()))
            .unwrap()
    }

    fn active(state: &AppState) -> String {
        state.with_workspace(|ws| ws.current_url()).unwrap()
    }

    #[test]
    fn test_tabopen_foreground_and_background() {
        let state = test_state();
        tabopen(&state, "a.example.com", true).unwrap();
        tabopen(&state, "b.example.com", false).unwrap();

        assert_eq!(
            urls(&state),
            vec!["https://start.example.org/", "http://b.example.com/", "http://a.example.com/"]
        );
        assert_eq!(active(&state), "http://b.example.com/");
    }

    #[test]
    fn test_tabopen_without_target_uses_newtab() {
        let state = test_state();
        tabopen(&state, "", false).unwrap();
        assert_eq!(active(&state), "about:blank");
    }

    #[test]
    fn test_tabclose_several() {
        let state = test_state();
        for host in ["a", "b", "c"] {
            tabopen(&state, &format!("{host}.example.com"), true).unwrap();
        }
        buffer(&state, OrdinalReference::Index(1)).unwrap();

        // background tabs open right after the active one
        assert_eq!(
            urls(&state),
            vec![
                "https://start.example.org/",
                "http://c.example.com/",
                "http://b.example.com/",
                "http://a.example.com/"
            ]
        );

        tabclose(&state, &[OrdinalReference::Index(2), OrdinalReference::Index(-1)]).unwrap();
        assert_eq!(
            urls(&state),
            vec!["https://start.example.org/", "http://a.example.com/"]
        );
    }

    #[test]
    fn test_buffer_wraps() {
        let state = test_state();
        tabopen(&state, "a.example.com", false).unwrap();

        buffer(&state, OrdinalReference::Index(3)).unwrap();
        assert_eq!(active(&state), "https://start.example.org/");
        buffer(&state, OrdinalReference::Index(0)).unwrap();
        assert_eq!(active(&state), "http://a.example.com/");
    }

    #[test]
    fn test_tabnext_and_tabprev_at_integer_limits() {
        let state = test_state();
        tabopen(&state, "a.example.com", false).unwrap();
        tabopen(&state, "b.example.com", false).unwrap();
        // start, a, b with b active

        tabnext(&state, i64::MAX).unwrap();
        assert_eq!(active(&state), "https://start.example.org/");
        tabprev(&state, i64::MIN).unwrap();
        assert_eq!(active(&state), "http://b.example.com/");
        tabprev(&state, i64::MAX).unwrap();
        assert_eq!(active(&state), "http://a.example.com/");
    }

    #[test]
    fn test_winopen_switches_window() {
        let state = test_state();
        winopen(&state, "lwn.net").unwrap();

        assert_eq!(urls(&state), vec!["http://lwn.net/"]);
        let windows = state.with_workspace(|ws| Ok(ws.windows.len())).unwrap();
        assert_eq!(windows, 2);
    }

    #[test]
    fn test_list_marks_active_and_previous() {
        let state = test_state();
        tabopen(&state, "a.example.com", false).unwrap();
        pin(&state).unwrap();

        let listing = list(&state).unwrap().unwrap();
        assert_eq!(
            listing,
            "%  1: [pinned] https://start.example.org/\n#  2: http://a.example.com/"
        );
    }
}
