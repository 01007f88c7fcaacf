//! Directory-backed node store.
//!
//! Each stored node lives at `<root>/<type>/<name>.brf`, encoded at indent 0
//! with its whole subtree.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{BriefError, Result};
use crate::node::{Forest, NodeRef};
use crate::parser::{decode_file, DecodeOptions};

/// Extension of stored files.
pub const EXTENSION: &str = "brf";

#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
    options: DecodeOptions,
}

impl Store {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let root = dir.into();
        fs::create_dir_all(&root).map_err(|e| BriefError::Io {
            path: root.clone(),
            message: format!("Failed to create store: {}", e),
        })?;
        Ok(Self {
            root,
            options: DecodeOptions::default(),
        })
    }

    /// Options used when reading nodes back.
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, kind: &str, name: &str) -> Result<PathBuf> {
        check_component("type", kind)?;
        check_component("name", name)?;
        Ok(self.root.join(kind).join(format!("{name}.{EXTENSION}")))
    }

    /// Write `node` and its subtree, replacing any stored node of the same type and name.
    pub fn put(&self, node: NodeRef<'_>) -> Result<PathBuf> {
        if node.name().is_empty() {
            return Err(BriefError::Store {
                message: format!("cannot store unnamed {} element", node.kind()),
                help: Some("Give the element a name, e.g. page:home".to_string()),
            });
        }

        let path = self.path_for(node.kind(), node.name())?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| BriefError::Io {
                path: dir.to_path_buf(),
                message: format!("Failed to create directory: {}", e),
            })?;
        }
        fs::write(&path, node.encode_rebased()).map_err(|e| BriefError::Io {
            path: path.clone(),
            message: format!("Failed to write node: {}", e),
        })?;

        debug!(path = %path.display(), "stored node");
        Ok(path)
    }

    /// Read a stored node back. The node is the first root of the result.
    pub fn get(&self, kind: &str, name: &str) -> Result<Option<Forest>> {
        let path = self.path_for(kind, name)?;
        if !path.is_file() {
            return Ok(None);
        }
        decode_file(&path, &self.options).map(Some)
    }

    /// Names stored under `kind`, sorted.
    pub fn list(&self, kind: &str) -> Result<Vec<String>> {
        check_component("type", kind)?;
        let dir = self.root.join(kind);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == EXTENSION))
            .filter_map(|e| e.path().file_stem()?.to_str().map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }
}

fn check_component(what: &str, value: &str) -> Result<()> {
    if value.is_empty() || value == "." || value == ".." || value.contains(['/', '\\']) {
        return Err(BriefError::Store {
            message: format!("{what} {value:?} cannot be used as a file name"),
            help: None,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::parser::decode_str;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_put_and_get() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db")).unwrap();

        let forest = decode_str("site\n  page:home title:Home\n    section:intro `Welcome`\n").unwrap();
        let page = forest.root(0).unwrap().find("page").unwrap();

        let path = store.put(page).unwrap();
        assert_eq!(path, dir.path().join("db").join("page").join("home.brf"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "page:home title:Home\n  section:intro `Welcome`\n"
        );

        let stored = store.get("page", "home").unwrap().unwrap();
        let root = stored.root(0).unwrap();
        assert_eq!(root.get("title"), Some("Home"));
        assert_eq!(root.child(&["section:intro"]).unwrap().content(), "Welcome");
    }

    #[test]
    fn test_get_missing() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        assert!(store.get("page", "nope").unwrap().is_none());
    }

    #[test]
    fn test_put_rejects_unnamed() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let mut forest = Forest::new();
        let id = forest.add_root(Node::new("page"));

        assert!(matches!(store.put(forest.node(id)), Err(BriefError::Store { .. })));
    }

    #[test]
    fn test_put_rejects_path_names() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let mut forest = Forest::new();
        let id = forest.add_root(Node::new("page").named("../escape"));

        assert!(matches!(store.put(forest.node(id)), Err(BriefError::Store { .. })));
    }

    #[test]
    fn test_put_overwrites() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let mut forest = Forest::new();
        let first = forest.add_root(Node::new("page").named("home").with_key("v", "1"));
        let second = forest.add_root(Node::new("page").named("home").with_key("v", "2"));

        store.put(forest.node(first)).unwrap();
        store.put(forest.node(second)).unwrap();

        let stored = store.get("page", "home").unwrap().unwrap();
        assert_eq!(stored.root(0).unwrap().get("v"), Some("2"));
    }

    #[test]
    fn test_list() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let forest = decode_str("page:b\npage:a\npost:x\n").unwrap();
        for root in forest.roots() {
            store.put(root).unwrap();
        }
        fs::write(dir.path().join("page").join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list("page").unwrap(), vec!["a", "b"]);
        assert_eq!(store.list("post").unwrap(), vec!["x"]);
        assert!(store.list("none").unwrap().is_empty());
    }
}
