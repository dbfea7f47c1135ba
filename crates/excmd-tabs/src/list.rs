//! Ordered tab list
//!
//! Keeps tabs in display order plus an activation history so that `#`
//! (previous tab) can be resolved without timestamps.

use crate::error::TabError;
use crate::ordinal::{self, wrap_index, OrdinalReference};
use crate::tab::Tab;
use crate::Result;

#[derive(Debug, Default)]
pub struct TabList {
    tabs: Vec<Tab>,
    /// Tab ids, most recently activated first
    recency: Vec<String>,
}

impl TabList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn get(&self, position: usize) -> Result<&Tab> {
        self.tabs
            .get(position)
            .ok_or_else(|| TabError::NotFound(format!("position {position}")))
    }

    pub fn active_position(&self) -> Option<usize> {
        let id = self.recency.first()?;
        self.tabs.iter().position(|tab| &tab.id == id)
    }

    pub fn active(&self) -> Option<&Tab> {
        self.active_position().map(|pos| &self.tabs[pos])
    }

    /// Insert a tab at `position` (clamped to the end).
    pub fn open(&mut self, url: String, position: usize, activate: bool) -> Result<usize> {
        let tab = Tab::new(url)?;
        let position = position.min(self.tabs.len());

        tracing::info!(tab_id = %tab.id, url = %tab.url, position, "Opened tab");

        let id = tab.id.clone();
        self.tabs.insert(position, tab);

        if activate || self.recency.is_empty() {
            self.activate(position)?;
        } else {
            // Background tabs go to the back of the history
            self.recency.push(id);
        }

        Ok(position)
    }

    /// Insert a tab right after the active one.
    pub fn open_after_active(&mut self, url: String, activate: bool) -> Result<usize> {
        let position = self
            .active_position()
            .map_or(self.tabs.len(), |pos| pos + 1);
        self.open(url, position, activate)
    }

    pub fn activate(&mut self, position: usize) -> Result<&Tab> {
        let tab = self
            .tabs
            .get_mut(position)
            .ok_or_else(|| TabError::NotFound(format!("position {position}")))?;
        tab.touch();

        let id = tab.id.clone();
        self.recency.retain(|other| other != &id);
        self.recency.insert(0, id);

        tracing::debug!(position, "Activated tab");
        Ok(&self.tabs[position])
    }

    /// Close the tab at `position`. If it was active, its neighbour takes over.
    pub fn close(&mut self, position: usize) -> Result<Tab> {
        if position >= self.tabs.len() {
            return Err(TabError::NotFound(format!("position {position}")));
        }

        let was_active = self.active_position() == Some(position);
        let tab = self.tabs.remove(position);
        self.recency.retain(|id| id != &tab.id);

        if was_active && !self.tabs.is_empty() {
            self.activate(position.min(self.tabs.len() - 1))?;
        }

        tracing::info!(tab_id = %tab.id, "Closed tab");
        Ok(tab)
    }

    /// Close every unpinned tab except the active one.
    pub fn close_others(&mut self) -> Vec<Tab> {
        let active = self.active().map(|tab| tab.id.clone());
        let (kept, closed): (Vec<Tab>, Vec<Tab>) = std::mem::take(&mut self.tabs)
            .into_iter()
            .partition(|tab| tab.pinned || Some(&tab.id) == active.as_ref());

        self.tabs = kept;
        self.recency
            .retain(|id| closed.iter().all(|tab| &tab.id != id));
        closed
    }

    /// Resolve an ordinal against this list.
    pub fn resolve(&self, reference: OrdinalReference) -> Result<usize> {
        let ids: Vec<&str> = self.tabs.iter().map(|tab| tab.id.as_str()).collect();
        let recency: Vec<&str> = self.recency.iter().map(String::as_str).collect();
        let current = recency.first().copied().unwrap_or_default();

        ordinal::resolve(reference, &ids, &current, &recency)
    }

    /// Activate the tab `increment` places to the right, wrapping.
    pub fn next(&mut self, increment: i64) -> Result<usize> {
        self.step(i128::from(increment))
    }

    /// Activate the tab `increment` places to the left, wrapping.
    pub fn prev(&mut self, increment: i64) -> Result<usize> {
        self.step(-i128::from(increment))
    }

    fn step(&mut self, offset: i128) -> Result<usize> {
        let active = self.active_position().ok_or(TabError::EmptyCollection)?;
        let position = wrap_index(active as i128 + offset + 1, self.tabs.len())?;
        self.activate(position)?;
        Ok(position)
    }

    /// Move the active tab.
    ///
    /// `+n`/`-n` move relative to the current position and stop at the
    /// ends; anything else is an absolute 1-based ordinal (`0` = last).
    pub fn move_active(&mut self, spec: &str) -> Result<usize> {
        let from = self.active_position().ok_or(TabError::EmptyCollection)?;
        let last = self.tabs.len() as i64 - 1;

        let invalid = || TabError::InvalidOrdinal(spec.to_string());
        let to = if spec.starts_with('+') || spec.starts_with('-') {
            let delta: i64 = spec.parse().map_err(|_| invalid())?;
            (from as i64).saturating_add(delta).clamp(0, last) as usize
        } else {
            let index: i64 = spec.parse().map_err(|_| invalid())?;
            wrap_index(index, self.tabs.len())?
        };

        let tab = self.tabs.remove(from);
        self.tabs.insert(to, tab);
        Ok(to)
    }

    pub fn navigate_active(&mut self, url: String) -> Result<()> {
        let position = self.active_position().ok_or(TabError::EmptyCollection)?;
        self.tabs[position].navigate(url)
    }

    pub fn toggle_pin(&mut self, position: usize) -> Result<bool> {
        let tab = self
            .tabs
            .get_mut(position)
            .ok_or_else(|| TabError::NotFound(format!("position {position}")))?;
        tab.pinned = !tab.pinned;
        Ok(tab.pinned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(urls: &[&str]) -> TabList {
        let mut list = TabList::new();
        for url in urls {
            list.open(url.to_string(), list.len(), true).unwrap();
        }
        list
    }

    fn urls(list: &TabList) -> Vec<&str> {
        list.tabs().iter().map(|t| t.url.as_str()).collect()
    }

    #[test]
    fn test_open_and_activate() {
        let list = list_of(&["a", "b", "c"]);
        assert_eq!(urls(&list), vec!["a", "b", "c"]);
        assert_eq!(list.active().unwrap().url, "c");
    }

    #[test]
    fn test_open_after_active_in_background() {
        let mut list = list_of(&["a", "b", "c"]);
        list.activate(0).unwrap();
        list.open_after_active("x".to_string(), false).unwrap();

        assert_eq!(urls(&list), vec!["a", "x", "b", "c"]);
        assert_eq!(list.active().unwrap().url, "a");
    }

    #[test]
    fn test_resolve_ordinals() {
        let mut list = list_of(&["a", "b", "c", "d"]);
        list.activate(1).unwrap();

        assert_eq!(list.resolve(OrdinalReference::Index(1)).unwrap(), 0);
        assert_eq!(list.resolve(OrdinalReference::Index(0)).unwrap(), 3);
        assert_eq!(list.resolve(OrdinalReference::Index(-1)).unwrap(), 2);
        assert_eq!(list.resolve(OrdinalReference::Current).unwrap(), 1);
        // "d" was active before "b"
        assert_eq!(list.resolve(OrdinalReference::Previous).unwrap(), 3);
    }

    #[test]
    fn test_resolve_on_empty_list() {
        let list = TabList::new();
        assert_eq!(
            list.resolve(OrdinalReference::Index(1)),
            Err(TabError::EmptyCollection)
        );
    }

    #[test]
    fn test_next_and_prev_wrap() {
        let mut list = list_of(&["a", "b", "c"]);
        assert_eq!(list.next(1).unwrap(), 0);
        assert_eq!(list.prev(1).unwrap(), 2);
        assert_eq!(list.next(5).unwrap(), 1);
    }

    #[test]
    fn test_next_and_prev_at_integer_limits() {
        let mut list = list_of(&["a", "b", "c"]);
        // i64::MAX is 1 mod 3, so 2 + MAX + 1 lands on the first tab
        assert_eq!(list.next(i64::MAX).unwrap(), 0);
        // -i64::MIN is 2^63, which is 2 mod 3
        assert_eq!(list.prev(i64::MIN).unwrap(), 2);
        assert_eq!(list.next(i64::MIN).unwrap(), 0);
    }

    #[test]
    fn test_close_active_activates_neighbour() {
        let mut list = list_of(&["a", "b", "c"]);
        list.activate(1).unwrap();
        list.close(1).unwrap();

        assert_eq!(urls(&list), vec!["a", "c"]);
        assert_eq!(list.active().unwrap().url, "c");

        list.close(1).unwrap();
        assert_eq!(list.active().unwrap().url, "a");
    }

    #[test]
    fn test_move_active() {
        let mut list = list_of(&["a", "b", "c", "d"]);
        list.activate(0).unwrap();

        assert_eq!(list.move_active("+2").unwrap(), 2);
        assert_eq!(urls(&list), vec!["b", "c", "a", "d"]);

        assert_eq!(list.move_active("-9").unwrap(), 0);
        assert_eq!(urls(&list), vec!["a", "b", "c", "d"]);

        assert_eq!(list.move_active("0").unwrap(), 3);
        assert_eq!(urls(&list), vec!["b", "c", "d", "a"]);

        assert!(list.move_active("left").is_err());
    }

    #[test]
    fn test_close_others_keeps_pinned() {
        let mut list = list_of(&["a", "b", "c"]);
        list.toggle_pin(0).unwrap();
        let closed = list.close_others();

        assert_eq!(closed.len(), 1);
        assert_eq!(urls(&list), vec!["a", "c"]);
        assert_eq!(list.active().unwrap().url, "c");
    }
}
