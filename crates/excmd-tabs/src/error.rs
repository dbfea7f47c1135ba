//! Tab error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(String),

    #[error("Cannot resolve a position in an empty collection")]
    EmptyCollection,

    #[error("No previously active item")]
    NoPreviousItem,

    #[error("Invalid ordinal: {0}")]
    InvalidOrdinal(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
