//! EXCMD Tabs
//!
//! Ordinals are 1-based and wrap: `1` is the first item, `0` the last,
//! `-1` the one before last. `%` names the current item and `#` the
//! previously active one.

mod error;
mod list;
mod ordinal;
mod tab;

pub use error::TabError;
pub use list::TabList;
pub use ordinal::{resolve, wrap_index, OrdinalReference};
pub use tab::Tab;

pub type Result<T> = std::result::Result<T, TabError>;
