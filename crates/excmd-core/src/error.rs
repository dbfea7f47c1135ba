//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] excmd_storage::StorageError),

    #[error("Tab error: {0}")]
    Tab(#[from] excmd_tabs::TabError),

    #[error("{0}")]
    Navigation(#[from] excmd_navigation::NavigationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Alias loop detected while expanding '{name}': {chain}")]
    AliasCycle { name: String, chain: String },

    #[error("Invalid alias name: '{0}'")]
    InvalidAliasName(String),

    #[error("{command} needs {expected}")]
    Arity {
        command: String,
        expected: &'static str,
    },

    #[error("{command}: {reason}")]
    InvalidArgument { command: String, reason: String },

    #[error("Not an editor command: {0}")]
    UnknownCommand(String),

    #[error("No command to repeat")]
    NothingToRepeat,

    #[error("Commands nested more than {0} levels deep")]
    NestingTooDeep(usize),

    #[error("Invalid key sequence: '{0}'")]
    InvalidKeySequence(String),

    #[error("No bookmark folder with id '{0}'")]
    UnknownFolder(String),
}
