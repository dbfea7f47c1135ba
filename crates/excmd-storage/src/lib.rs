//! EXCMD Storage Layer
//!
//! Configuration values addressed by compound keys such as
//! `["exaliases", "t"]` or `["searchurls", "github"]`.
//! SQLite backs the persistent store; `MemoryStore` serves tests and
//! throwaway sessions.

mod database;
mod error;
mod memory;
mod migrations;
mod store;

pub use database::Database;
pub use error::StorageError;
pub use memory::MemoryStore;
pub use store::{ConfigStore, Entry};

pub type Result<T> = std::result::Result<T, StorageError>;
