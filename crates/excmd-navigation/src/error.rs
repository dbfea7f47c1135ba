//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unknown provider: '{0}'")]
    UnknownProvider(String),

    #[error("Malformed search template for '{keyword}': {reason}")]
    MalformedTemplate { keyword: String, reason: String },

    #[error("{mode} needs {expected}: {usage}")]
    Arity {
        mode: &'static str,
        expected: &'static str,
        usage: &'static str,
    },

    #[error("RegExp replacement flags can only include 'g', 'i', got '{0}'")]
    InvalidFlag(String),

    #[error("Malformed pattern: {0}")]
    MalformedPattern(String),

    #[error("Graft point {point} is outside a path of {segments} segments")]
    GraftOutOfRange { point: i64, segments: usize },

    #[error("Unknown urlmodify mode: {0}")]
    UnknownMode(String),
}
