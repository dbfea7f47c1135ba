//! Ordinal references
//!
//! User-facing positions are 1-based and modular: they never fail for a
//! well-formed integer, they wrap.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TabError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrdinalReference {
    /// 1-based, wrapping index
    Index(i64),
    /// The caller's reference item (`%`)
    Current,
    /// Most recently used item other than the current one (`#`)
    Previous,
}

impl fmt::Display for OrdinalReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrdinalReference::Index(i) => write!(f, "{i}"),
            OrdinalReference::Current => write!(f, "%"),
            OrdinalReference::Previous => write!(f, "#"),
        }
    }
}

impl FromStr for OrdinalReference {
    type Err = TabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "%" | "current" => Ok(OrdinalReference::Current),
            "#" | "previous" => Ok(OrdinalReference::Previous),
            other => other
                .parse::<i64>()
                .map(OrdinalReference::Index)
                .map_err(|_| TabError::InvalidOrdinal(s.to_string())),
        }
    }
}

/// Map a 1-based, wrapping index onto `0..size`.
///
/// Takes anything that widens to `i128` so callers can offset an `i64`
/// without overflowing.
pub fn wrap_index(index: impl Into<i128>, size: usize) -> Result<usize> {
    if size == 0 {
        return Err(TabError::EmptyCollection);
    }

    let position = (index.into() - 1).rem_euclid(size as i128);
    Ok(position as usize)
}

/// Resolve `reference` against `items`.
///
/// `current` anchors [`OrdinalReference::Current`]; `recency` is ordered
/// most recent first and its second entry is the previous item.
pub fn resolve<T: PartialEq>(
    reference: OrdinalReference,
    items: &[T],
    current: &T,
    recency: &[T],
) -> Result<usize> {
    match reference {
        OrdinalReference::Index(index) => wrap_index(index, items.len()),
        OrdinalReference::Current => items
            .iter()
            .position(|item| item == current)
            .ok_or_else(|| TabError::NotFound(reference.to_string())),
        OrdinalReference::Previous => {
            let previous = recency.get(1).ok_or(TabError::NoPreviousItem)?;
            items
                .iter()
                .position(|item| item == previous)
                .ok_or(TabError::NoPreviousItem)
        }
    }
}
