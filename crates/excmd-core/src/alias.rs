//! Command aliases
//!
//! Only the first token of a command string is an alias candidate. An
//! expansion may itself start with an alias, so expansion repeats until the
//! head is no longer an alias, a name comes round a second time, or
//! [`MAX_ALIAS_DEPTH`] expansions have happened.

use std::sync::Arc;

use excmd_storage::ConfigStore;

use crate::error::CoreError;
use crate::Result;

/// Store namespace holding alias definitions.
pub const ALIAS_NAMESPACE: &str = "exaliases";

/// Maximum number of expansions applied to one command string.
pub const MAX_ALIAS_DEPTH: usize = 10;

#[derive(Clone)]
pub struct AliasTable {
    store: Arc<dyn ConfigStore>,
}

impl AliasTable {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    pub fn get(&self, name: &str) -> Result<Option<String>> {
        if name.is_empty() {
            return Ok(None);
        }
        Ok(self.store.get(&[ALIAS_NAMESPACE, name])?)
    }

    /// Define (or redefine) `name`.
    ///
    /// The new definition is checked by expanding it; if that fails the
    /// table is put back the way it was and the error is returned.
    pub fn define(&self, name: &str, expansion: &str) -> Result<()> {
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(CoreError::InvalidAliasName(name.to_string()));
        }

        let previous = self.get(name)?;
        self.store.set(&[ALIAS_NAMESPACE, name], expansion.trim())?;

        if let Err(e) = self.expand(name) {
            match previous {
                Some(value) => self.store.set(&[ALIAS_NAMESPACE, name], &value)?,
                None => self.store.unset(&[ALIAS_NAMESPACE, name])?,
            }
            tracing::warn!(alias = %name, error = %e, "Rejected alias definition");
            return Err(e);
        }

        tracing::info!(alias = %name, expansion = %expansion.trim(), "Defined alias");
        Ok(())
    }

    /// Remove `name`. Clearing an unknown alias is a no-op.
    pub fn clear(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Ok(());
        }
        self.store.unset(&[ALIAS_NAMESPACE, name])?;
        tracing::info!(alias = %name, "Cleared alias");
        Ok(())
    }

    /// All aliases ordered by name.
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .store
            .entries(&[ALIAS_NAMESPACE])?
            .into_iter()
            .filter_map(|entry| match entry.key.as_slice() {
                [_, name] => Some((name.clone(), entry.value)),
                _ => None,
            })
            .collect())
    }

    /// Expand the head of `text` until it is no longer an alias.
    ///
    /// Everything after the head is carried over verbatim.
    pub fn expand(&self, text: &str) -> Result<String> {
        let mut expanded = text.trim_start().to_string();
        let mut chain: Vec<String> = Vec::new();

        loop {
            let (head, rest) = split_head(&expanded);
            let Some(definition) = self.get(head)? else {
                return Ok(expanded);
            };

            if chain.iter().any(|seen| seen == head) || chain.len() >= MAX_ALIAS_DEPTH {
                let name = head.to_string();
                chain.push(name.clone());
                return Err(CoreError::AliasCycle {
                    name,
                    chain: chain.join(" -> "),
                });
            }

            chain.push(head.to_string());
            expanded = format!("{definition}{rest}");
        }
    }
}

/// Split off the first whitespace-delimited token. The remainder keeps its
/// leading whitespace.
fn split_head(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], &text[i..]),
        None => (text, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use excmd_storage::MemoryStore;

    fn table() -> AliasTable {
        AliasTable::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_expand_keeps_arguments() {
        let aliases = table();
        aliases.define("o", "open").unwrap();

        assert_eq!(aliases.expand("o example.com").unwrap(), "open example.com");
        assert_eq!(aliases.expand("open o").unwrap(), "open o");
        assert_eq!(aliases.expand("").unwrap(), "");
    }

    #[test]
    fn test_chained_expansion() {
        let aliases = table();
        aliases.define("t", "tabopen").unwrap();
        aliases.define("news", "t -b https://lwn.net").unwrap();

        assert_eq!(
            aliases.expand("news").unwrap(),
            "tabopen -b https://lwn.net"
        );
    }

    #[test]
    fn test_cycle_is_rejected_and_rolled_back() {
        let aliases = table();
        aliases.define("a", "b").unwrap();

        let err = aliases.define("b", "a").unwrap_err();
        assert!(matches!(err, CoreError::AliasCycle { ref name, .. } if name == "b"));
        assert_eq!(aliases.get("b").unwrap(), None);
        assert_eq!(aliases.expand("a").unwrap(), "b");
    }

    #[test]
    fn test_failed_redefinition_restores_previous_value() {
        let aliases = table();
        aliases.define("x", "open").unwrap();
        aliases.define("y", "x").unwrap();

        assert!(aliases.define("x", "y").is_err());
        assert_eq!(aliases.get("x").unwrap().as_deref(), Some("open"));
    }

    #[test]
    fn test_self_reference() {
        let aliases = table();
        let err = aliases.define("loop", "loop again").unwrap_err();
        assert!(matches!(err, CoreError::AliasCycle { ref name, .. } if name == "loop"));
    }

    #[test]
    fn test_depth_limit() {
        let aliases = table();
        // a1 -> a2 -> ... -> a10 -> open
        aliases.define("a10", "open").unwrap();
        for i in (1..10).rev() {
            aliases.define(&format!("a{i}"), &format!("a{}", i + 1)).unwrap();
        }
        assert!(aliases.define("a0", "a1").is_err());
    }

    #[test]
    fn test_clear_and_list() {
        let aliases = table();
        aliases.define("q", "tabclose").unwrap();
        aliases.define("o", "open").unwrap();

        assert_eq!(
            aliases.list().unwrap(),
            vec![
                ("o".to_string(), "open".to_string()),
                ("q".to_string(), "tabclose".to_string())
            ]
        );

        aliases.clear("q").unwrap();
        aliases.clear("never-defined").unwrap();
        assert_eq!(aliases.get("q").unwrap(), None);
    }

    #[test]
    fn test_invalid_names() {
        let aliases = table();
        assert!(matches!(aliases.define("", "open"), Err(CoreError::InvalidAliasName(_))));
        assert!(matches!(aliases.define("a b", "open"), Err(CoreError::InvalidAliasName(_))));
    }
}
