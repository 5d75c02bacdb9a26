//! In-memory storage
//!
//! Root map wrapped in a `parking_lot::RwLock`.

use parking_lot::RwLock;

use crate::document::{self, Document, KeyPath, Root};
use crate::error::Result;

use super::Storage;

/// Volatile store; starts empty and lives as long as the process
#[derive(Default)]
pub struct MemoryStorage {
    root: RwLock<Root>,
}

impl MemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `root`
    pub fn with_root(root: Root) -> Self {
        Self {
            root: RwLock::new(root),
        }
    }

    /// Number of root-level keys
    pub fn len(&self) -> usize {
        self.root.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.read().is_empty()
    }

    /// Copy of the whole root map
    pub fn snapshot(&self) -> Root {
        self.root.read().clone()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, path: &KeyPath) -> Result<Document> {
        let root = self.root.read();
        document::get_in(&root, path).cloned()
    }

    fn set(&self, path: &KeyPath, value: Document) -> Result<()> {
        let mut root = self.root.write();
        document::set_in(&mut root, path, value);
        Ok(())
    }

    fn delete(&self, path: &KeyPath) -> Result<()> {
        let mut root = self.root.write();
        document::delete_in(&mut root, path)?;
        Ok(())
    }
}
