//! Application state management
use excmd_core::{
    BookmarkTree, Config, ConfigStore, CoreError, Database, InputResolver, MemoryStore, Result,
    TabList,
};
use parking_lot::RwLock;
use std::sync::Arc;

const BOOKMARKS_KEY: &[&str] = &["bookmarks", "tree"];

/// Everything the simulated browser owns.
pub struct Workspace {
    pub windows: Vec<TabList>,
    pub current_window: usize,
    pub resolver: InputResolver,
    pub bookmarks: BookmarkTree,
}

impl Workspace {
    pub fn tabs(&self) -> &TabList {
        &self.windows[self.current_window]
    }

    pub fn tabs_mut(&mut self) -> &mut TabList {
        &mut self.windows[self.current_window]
    }

    /// URL of the active tab in the current window.
    pub fn current_url(&self) -> Result<String> {
        let tab = self.tabs().active().ok_or(excmd_core::TabError::EmptyCollection)?;
        Ok(tab.url.clone())
    }
}

/// Thread-safe application state wrapper
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<dyn ConfigStore>,
    workspace: Arc<RwLock<Workspace>>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ConfigStore>) -> Result<Self> {
        let resolver = InputResolver::with_search(config.search_registry(store.as_ref())?);
        let bookmarks = match store.get(BOOKMARKS_KEY)? {
            Some(json) => serde_json::from_str(&json)?,
            None => BookmarkTree::new(),
        };

        Ok(Self {
            config: Arc::new(config),
            store,
            workspace: Arc::new(RwLock::new(Workspace {
                windows: vec![TabList::new()],
                current_window: 0,
                resolver,
                bookmarks,
            })),
        })
    }

    /// State backed by the SQLite file named in `config`, or by memory.
    pub fn open(config: Config, in_memory: bool) -> Result<Self> {
        if in_memory {
            return Self::in_memory(config);
        }

        if let Some(dir) = config.database_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let database = Database::open(&config.database_path)?;
        tracing::info!(path = %config.database_path.display(), "Opened config database");
        Self::new(config, Arc::new(database))
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    /// Open the homepage when the first window is empty.
    pub fn initialize(&self) -> Result<()> {
        let homepage = self.config.homepage.clone();
        self.with_workspace_mut(|workspace| {
            if workspace.tabs().is_empty() {
                workspace.tabs_mut().open(homepage, 0, true)?;
            }
            Ok(())
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn ConfigStore> {
        self.store.clone()
    }

    pub fn with_workspace<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Workspace) -> Result<T>,
    {
        f(&self.workspace.read())
    }

    pub fn with_workspace_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Workspace) -> Result<T>,
    {
        f(&mut self.workspace.write())
    }

    pub fn save_bookmarks(&self) -> Result<()> {
        let json = self.with_workspace(|workspace| {
            serde_json::to_string(&workspace.bookmarks).map_err(CoreError::from)
        })?;
        self.store.set(BOOKMARKS_KEY, &json)?;
        Ok(())
    }
}
