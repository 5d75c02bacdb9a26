//! File-backed storage
//!
//! The whole store is one JSON object on disk:
//! ```text
//! { "<root key>": <document>, ... }
//! ```
//!
//! Every operation materializes the root map from the file. Mutations
//! rewrite the file in full before returning: the new content goes to a
//! sibling `*.tmp` file, is fsynced, then renamed over the original so a
//! crash mid-write never leaves a torn store behind.
//!
//! A write that would nest the file deeper than `serde_json` can read back
//! is refused, so the store never becomes unloadable.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde_json::Value;

use crate::document::{self, Document, KeyPath, Root};
use crate::error::{JsonDbError, Result};

use super::Storage;

/// Deepest container nesting `serde_json::from_str` accepts (the top-level
/// object counts as one level)
const MAX_NESTING: usize = 127;

/// Store persisted to a single JSON file
pub struct FileStorage {
    /// Location of the store file
    path: PathBuf,

    /// Guards the file: shared for reads, exclusive for read-modify-write
    lock: RwLock<()>,
}

impl FileStorage {
    /// Open the store at `path`
    ///
    /// Creates missing parent directories and initializes the file with `{}`
    /// when it does not exist or is blank. An existing file must hold a JSON
    /// object.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let storage = Self {
            path,
            lock: RwLock::new(()),
        };

        let needs_init = match fs::read_to_string(&storage.path) {
            Ok(content) => content.trim().is_empty(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        if needs_init {
            tracing::info!("Initializing empty store at {}", storage.path.display());
            storage.persist(&Root::new())?;
        } else {
            let root = storage.load()?;
            tracing::info!(
                "Loaded store from {} ({} root keys)",
                storage.path.display(),
                root.len()
            );
        }

        Ok(storage)
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current root map from disk
    ///
    /// Takes the shared side of the lock.
    pub fn snapshot(&self) -> Result<Root> {
        let _guard = self.lock.read();
        self.load()
    }

    /// Read and decode the store file (caller holds the lock)
    fn load(&self) -> Result<Root> {
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Root::new());
        }

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(root) => Ok(root),
            other => Err(JsonDbError::Storage(format!(
                "store file {} holds a {} instead of an object",
                self.path.display(),
                json_kind(&other)
            ))),
        }
    }

    /// Replace the store file with `root` (caller holds the write lock)
    fn persist(&self, root: &Root) -> Result<()> {
        let bytes = serde_json::to_vec(root)?;
        let tmp_path = self.tmp_path();

        let written = File::create(&tmp_path)
            .and_then(|mut file| {
                file.write_all(&bytes)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp_path, &self.path));

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                tracing::debug!("could not remove {}: {}", tmp_path.display(), cleanup);
            }
            return Err(e.into());
        }

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Storage for FileStorage {
    fn get(&self, path: &KeyPath) -> Result<Document> {
        let _guard = self.lock.read();
        let root = self.load()?;
        document::get_in(&root, path).cloned()
    }

    fn set(&self, path: &KeyPath, value: Document) -> Result<()> {
        let _guard = self.lock.write();
        let mut root = self.load()?;
        document::set_in(&mut root, path, value);

        if nesting_depth(&root) > MAX_NESTING {
            return Err(JsonDbError::Storage(format!(
                "set at {} would nest the store past {} levels",
                path, MAX_NESTING
            )));
        }

        self.persist(&root)?;
        tracing::trace!(%path, "store rewritten after set");
        Ok(())
    }

    fn delete(&self, path: &KeyPath) -> Result<()> {
        let _guard = self.lock.write();
        let mut root = self.load()?;
        document::delete_in(&mut root, path)?;
        self.persist(&root)?;
        tracing::trace!(%path, "store rewritten after delete");
        Ok(())
    }
}

/// Container nesting of the store, counting the root object as one level
///
/// Stops counting once past the limit. Paths can be far longer than the
/// limit, so this walks with an explicit stack.
fn nesting_depth(root: &Root) -> usize {
    let mut deepest = 1;
    let mut pending: Vec<(&Value, usize)> = root.values().map(|v| (v, 2)).collect();

    while let Some((value, depth)) = pending.pop() {
        match value {
            Value::Object(map) => pending.extend(map.values().map(|child| (child, depth + 1))),
            Value::Array(items) => pending.extend(items.iter().map(|child| (child, depth + 1))),
            _ => continue,
        }

        deepest = deepest.max(depth);
        if deepest > MAX_NESTING {
            break;
        }
    }

    deepest
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
