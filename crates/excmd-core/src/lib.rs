//! EXCMD Core
//!
//! The interpreter turns typed text into dispatched commands:
//! raw text → alias expansion → builtin (`repeat`, `composite`, `command`,
//! `bind`, ...) or the host's [`Dispatcher`].
//!
//! The interpreter is driven through `&mut self`: one command is resolved at
//! a time, and `repeat`/`composite` await each dispatch before the next.

mod alias;
mod binds;
mod bookmarks;
mod builtin;
mod config;
mod error;
mod interpreter;
mod invocation;

pub use alias::{AliasTable, ALIAS_NAMESPACE, MAX_ALIAS_DEPTH};
pub use binds::{quickmark_binds, KeyBinds, KeyPress, Modifiers, BIND_NAMESPACE};
pub use bookmarks::{split_folder_path, BookmarkNode, BookmarkToggle, BookmarkTree, FolderPath, ROOT_ID};
pub use builtin::Builtin;
pub use config::{Config, SEARCH_URL_NAMESPACE};
pub use error::CoreError;
pub use interpreter::{Dispatcher, Interpreter};
pub use invocation::CommandInvocation;

// Re-export the pieces hosts need
pub use excmd_navigation as navigation;
pub use excmd_storage as storage;
pub use excmd_tabs as tabs;
pub use excmd_navigation::{
    InputResolution, InputResolver, NavigationError, SearchProvider, SearchRegistry, UrlModifyMode,
};
pub use excmd_storage::{ConfigStore, Database, MemoryStore, StorageError};
pub use excmd_tabs::{OrdinalReference, Tab, TabError, TabList};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
