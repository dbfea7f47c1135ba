//! Key bindings and quickmarks
//!
//! A key sequence is written as plain characters and bracketed keys:
//! `gg`, `<C-f>`, `<A-S-ArrowDown>`, `<Space>`. Modifiers are single letters
//! (`C`trl, `A`lt, `M`eta, `S`hift) and are normalized to that order, so
//! `<S-C-x>` and `<C-S-x>` name the same binding.

use std::fmt;
use std::sync::Arc;

use excmd_storage::ConfigStore;

use crate::error::CoreError;
use crate::Result;

/// Store namespace for normal-mode bindings.
pub const BIND_NAMESPACE: &str = "nmaps";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    fn any(&self) -> bool {
        self.ctrl || self.alt || self.meta || self.shift
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub modifiers: Modifiers,
    pub key: String,
}

impl KeyPress {
    /// Parse a whole key sequence.
    pub fn parse_sequence(text: &str) -> Result<Vec<KeyPress>> {
        let mut keys = Vec::new();
        let mut rest = text;

        while let Some(c) = rest.chars().next() {
            if c == '<' {
                if let Some(end) = rest[1..].find('>').map(|i| i + 1) {
                    // "<>" is two literal keys
                    if end > 1 {
                        let inner = &rest[1..end];
                        keys.push(Self::parse_bracketed(inner).ok_or_else(|| {
                            CoreError::InvalidKeySequence(text.to_string())
                        })?);
                        rest = &rest[end + 1..];
                        continue;
                    }
                }
            }

            keys.push(KeyPress {
                modifiers: Modifiers::default(),
                key: c.to_string(),
            });
            rest = &rest[c.len_utf8()..];
        }

        if keys.is_empty() {
            return Err(CoreError::InvalidKeySequence(text.to_string()));
        }
        Ok(keys)
    }

    fn parse_bracketed(inner: &str) -> Option<KeyPress> {
        let mut modifiers = Modifiers::default();
        let mut rest = inner;

        while rest.len() > 2 && rest.as_bytes()[1] == b'-' {
            match rest.as_bytes()[0] {
                b'C' => modifiers.ctrl = true,
                b'A' => modifiers.alt = true,
                b'M' => modifiers.meta = true,
                b'S' => modifiers.shift = true,
                _ => break,
            }
            rest = &rest[2..];
        }

        if rest.is_empty() || rest.contains(char::is_whitespace) {
            return None;
        }
        Some(KeyPress {
            modifiers,
            key: rest.to_string(),
        })
    }

    /// Canonical text form of a sequence.
    pub fn format_sequence(keys: &[KeyPress]) -> String {
        keys.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bracketed = self.modifiers.any() || self.key.chars().count() > 1 || self.key == "<";
        if !bracketed {
            return write!(f, "{}", self.key);
        }

        write!(f, "<")?;
        for (on, letter) in [
            (self.modifiers.ctrl, "C"),
            (self.modifiers.alt, "A"),
            (self.modifiers.meta, "M"),
            (self.modifiers.shift, "S"),
        ] {
            if on {
                write!(f, "{letter}-")?;
            }
        }
        write!(f, "{}>", self.key)
    }
}

/// Key sequence → command string, persisted in the config store.
#[derive(Clone)]
pub struct KeyBinds {
    store: Arc<dyn ConfigStore>,
}

impl KeyBinds {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    fn canonical(keys: &str) -> Result<String> {
        Ok(KeyPress::format_sequence(&KeyPress::parse_sequence(keys)?))
    }

    pub fn bind(&self, keys: &str, exstr: &str) -> Result<()> {
        let keys = Self::canonical(keys)?;
        self.store.set(&[BIND_NAMESPACE, &keys], exstr.trim())?;
        tracing::info!(keys = %keys, command = %exstr.trim(), "Bound keys");
        Ok(())
    }

    pub fn unbind(&self, keys: &str) -> Result<()> {
        let keys = Self::canonical(keys)?;
        self.store.unset(&[BIND_NAMESPACE, &keys])?;
        tracing::info!(keys = %keys, "Unbound keys");
        Ok(())
    }

    pub fn get(&self, keys: &str) -> Result<Option<String>> {
        let keys = Self::canonical(keys)?;
        Ok(self.store.get(&[BIND_NAMESPACE, &keys])?)
    }

    pub fn list(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .store
            .entries(&[BIND_NAMESPACE])?
            .into_iter()
            .filter_map(|entry| match entry.key.as_slice() {
                [_, keys] => Some((keys.clone(), entry.value)),
                _ => None,
            })
            .collect())
    }
}

/// Bindings created by `quickmark <key> <urls...>`.
///
/// `gn<key>` opens in new tabs, `go<key>` in the current tab and `gw<key>`
/// in a new window. Several URLs always open as tabs.
pub fn quickmark_binds(key: &str, urls: &[String]) -> Vec<(String, String)> {
    match urls {
        [] => Vec::new(),
        [url] => vec![
            (format!("gn{key}"), format!("tabopen {url}")),
            (format!("go{key}"), format!("open {url}")),
            (format!("gw{key}"), format!("winopen {url}")),
        ],
        many => {
            let all = format!("composite tabopen {}", many.join(" | tabopen "));
            ["gn", "go", "gw"]
                .iter()
                .map(|prefix| (format!("{prefix}{key}"), all.clone()))
                .collect()
        }
    }
}
