//! Bookmark tree
//!
//! Folders are addressed by slash-joined title paths starting at the root,
//! e.g. `/Toolbar/Rust/`. `bmark` titles may carry such a path; the folder
//! is matched exactly first and then by substring.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::Result;

pub const ROOT_ID: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkNode {
    pub id: String,
    pub title: String,
    /// `None` for folders
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub children: Vec<BookmarkNode>,
}

impl BookmarkNode {
    pub fn folder(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            url: None,
            children: Vec::new(),
        }
    }

    pub fn bookmark(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            url: Some(url.into()),
            children: Vec::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut BookmarkNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }
}

/// A folder together with its full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPath {
    pub path: String,
    pub id: String,
}

/// What `toggle` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkToggle {
    Added { id: String, folder: String },
    Removed(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkTree {
    root: BookmarkNode,
}

impl BookmarkTree {
    pub fn new() -> Self {
        Self {
            root: BookmarkNode {
                id: ROOT_ID.to_string(),
                title: String::new(),
                url: None,
                children: Vec::new(),
            },
        }
    }

    pub fn root(&self) -> &BookmarkNode {
        &self.root
    }

    fn insert(&mut self, parent_id: &str, node: BookmarkNode) -> Result<String> {
        let parent = self
            .root
            .find_mut(parent_id)
            .filter(|parent| parent.is_folder())
            .ok_or_else(|| CoreError::UnknownFolder(parent_id.to_string()))?;

        let id = node.id.clone();
        parent.children.push(node);
        Ok(id)
    }

    pub fn add_folder(&mut self, parent_id: &str, title: &str) -> Result<String> {
        self.insert(parent_id, BookmarkNode::folder(title))
    }

    pub fn add_bookmark(&mut self, parent_id: &str, title: &str, url: &str) -> Result<String> {
        self.insert(parent_id, BookmarkNode::bookmark(title, url))
    }

    /// Every bookmark pointing at `url`.
    pub fn find_by_url(&self, url: &str) -> Vec<&BookmarkNode> {
        let mut found = Vec::new();
        let mut pending = vec![&self.root];
        while let Some(node) = pending.pop() {
            if node.url.as_deref() == Some(url) {
                found.push(node);
            }
            pending.extend(node.children.iter());
        }
        found
    }

    /// Remove every bookmark pointing at `url`; returns how many went.
    pub fn remove_by_url(&mut self, url: &str) -> usize {
        fn prune(node: &mut BookmarkNode, url: &str) -> usize {
            let before = node.children.len();
            node.children
                .retain(|child| child.url.as_deref() != Some(url));
            let removed = before - node.children.len();
            removed + node.children.iter_mut().map(|c| prune(c, url)).sum::<usize>()
        }
        prune(&mut self.root, url)
    }

    /// Paths of all folders in depth-first order, root first.
    pub fn folder_paths(&self) -> Vec<FolderPath> {
        let mut paths = Vec::new();
        let mut pending: Vec<(&BookmarkNode, String)> = vec![(&self.root, String::new())];

        while let Some((node, prefix)) = pending.pop() {
            if !node.is_folder() {
                continue;
            }
            let path = format!("{prefix}{}/", node.title);
            // Reversed so children come out in order
            for child in node.children.iter().rev() {
                pending.push((child, path.clone()));
            }
            paths.push(FolderPath {
                path,
                id: node.id.clone(),
            });
        }

        paths
    }

    /// Exact path match first, then the first folder whose path contains `wanted`.
    pub fn find_folder(&self, wanted: &str) -> Option<FolderPath> {
        let paths = self.folder_paths();
        let exact = paths.iter().position(|folder| folder.path == wanted);
        let index = exact.or_else(|| paths.iter().position(|folder| folder.path.contains(wanted)))?;
        paths.into_iter().nth(index)
    }

    /// Bookmark `url`, or remove it if it is already bookmarked.
    ///
    /// `title` may start with a folder path. An unknown folder falls back to
    /// the root.
    pub fn toggle(&mut self, url: &str, title: &str) -> Result<BookmarkToggle> {
        let removed = self.remove_by_url(url);
        if removed > 0 {
            tracing::info!(url = %url, removed, "Removed bookmark");
            return Ok(BookmarkToggle::Removed(removed));
        }

        let (path, title) = split_folder_path(title);
        let folder = if path.is_empty() {
            None
        } else {
            let found = self.find_folder(path);
            if found.is_none() {
                tracing::warn!(path = %path, "Bookmark folder not found, using root");
            }
            found
        };
        let folder = folder.unwrap_or_else(|| FolderPath {
            path: "/".to_string(),
            id: ROOT_ID.to_string(),
        });

        let title = if title.is_empty() { url } else { title };
        let id = self.add_bookmark(&folder.id, title, url)?;
        tracing::info!(url = %url, folder = %folder.path, "Added bookmark");

        Ok(BookmarkToggle::Added {
            id,
            folder: folder.path,
        })
    }
}

impl Default for BookmarkTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `"/Toolbar/Rust/The Book"` into `("/Toolbar/Rust/", "The Book")`.
pub fn split_folder_path(title: &str) -> (&str, &str) {
    match title.rfind('/') {
        Some(i) => (&title[..=i], &title[i + 1..]),
        None => ("", title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BookmarkTree {
        let mut tree = BookmarkTree::new();
        let toolbar = tree.add_folder(ROOT_ID, "Toolbar").unwrap();
        let rust = tree.add_folder(&toolbar, "Rust").unwrap();
        tree.add_folder(ROOT_ID, "Other").unwrap();
        tree.add_bookmark(&rust, "Docs", "https://doc.rust-lang.org/").unwrap();
        tree
    }

    #[test]
    fn test_folder_paths() {
        let paths: Vec<String> = sample().folder_paths().into_iter().map(|f| f.path).collect();
        assert_eq!(paths, vec!["/", "/Toolbar/", "/Toolbar/Rust/", "/Other/"]);
    }

    #[test]
    fn test_find_folder_exact_then_substring() {
        let tree = sample();
        assert_eq!(tree.find_folder("/Toolbar/").unwrap().path, "/Toolbar/");
        assert_eq!(tree.find_folder("Rust/").unwrap().path, "/Toolbar/Rust/");
        assert!(tree.find_folder("Nowhere/").is_none());
    }

    #[test]
    fn test_split_folder_path() {
        assert_eq!(split_folder_path("/Toolbar/Book"), ("/Toolbar/", "Book"));
        assert_eq!(split_folder_path("Book"), ("", "Book"));
    }

    #[test]
    fn test_toggle_adds_into_folder() {
        let mut tree = sample();
        let result = tree.toggle("https://crates.io/", "Rust/Crates").unwrap();

        assert!(matches!(result, BookmarkToggle::Added { ref folder, .. } if folder == "/Toolbar/Rust/"));
        assert_eq!(tree.find_by_url("https://crates.io/")[0].title, "Crates");
    }

    #[test]
    fn test_toggle_removes_existing() {
        let mut tree = sample();
        let result = tree.toggle("https://doc.rust-lang.org/", "").unwrap();
        assert_eq!(result, BookmarkToggle::Removed(1));
        assert!(tree.find_by_url("https://doc.rust-lang.org/").is_empty());
    }

    #[test]
    fn test_unknown_folder_falls_back_to_root() {
        let mut tree = sample();
        let result = tree.toggle("https://lwn.net/", "Nowhere/LWN").unwrap();

        assert!(matches!(result, BookmarkToggle::Added { ref folder, .. } if folder == "/"));
        assert_eq!(tree.root().children.last().unwrap().title, "LWN");
    }

    #[test]
    fn test_bookmark_is_not_a_parent() {
        let mut tree = sample();
        let id = tree.add_bookmark(ROOT_ID, "x", "https://x.org/").unwrap();
        assert!(matches!(tree.add_folder(&id, "y"), Err(CoreError::UnknownFolder(_))));
    }

    #[test]
    fn test_serde_round_trip() {
        let tree = sample();
        let json = serde_json::to_string(&tree).unwrap();
        let back: BookmarkTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
