//! EXCMD Navigation
//!
//! Turns free text into destinations and rewrites existing ones:
//! - Input classification, first match wins:
//!   1. Absolute URI → navigate
//!   2. `<keyword> <query>` → provider search
//!   3. Domain-looking text → `http://` + text
//!   4. Anything else → default engine search
//! - `urlmodify` modes: text, regex, query set/delete, path graft
//! - URL stepping: increment, root, parent

mod error;
mod input;
mod rewrite;
mod search;
mod stepping;

pub use error::NavigationError;
pub use input::{InputResolution, InputResolver};
pub use rewrite::{rewrite, RegexFlags, UrlModifyMode};
pub use search::{interpolate_search_item, SearchProvider, SearchRegistry, DEFAULT_ENGINE_ALIAS};
pub use stepping::{increment, parent, root};

pub type Result<T> = std::result::Result<T, NavigationError>;
