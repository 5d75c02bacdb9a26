//! Storage Module
//!
//! Path-addressed document storage behind one contract.
//!
//! ## Backends
//! - [`MemoryStorage`]: root map held in a `RwLock`, lost on exit
//! - [`FileStorage`]: root map persisted as a single JSON object file,
//!   re-read on every operation and rewritten in full on every mutation
//!
//! ## Concurrency
//! Each backend owns one reader/writer lock covering the whole store.
//! `get` runs under the shared side, `set`/`delete` under the exclusive
//! side until the mutation is visible (memory) or durable (file). There is
//! no per-key locking: any write serializes against every other operation.

mod file;
mod memory;

use std::sync::Arc;

use crate::config::StorageBackend;
use crate::document::{Document, KeyPath};
use crate::error::Result;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// The get/set/delete capability every backend provides
///
/// Lookup failures are reported as `KeyNotFound` (a segment is absent) or
/// `NotNavigable` (a segment had to be read out of a non-object value).
pub trait Storage: Send + Sync {
    /// Fetch a copy of the document at `path`
    fn get(&self, path: &KeyPath) -> Result<Document>;

    /// Store `value` at `path`, replacing non-object intermediates
    fn set(&self, path: &KeyPath, value: Document) -> Result<()>;

    /// Remove the document at `path`
    fn delete(&self, path: &KeyPath) -> Result<()>;
}

/// Construct the backend selected by configuration
pub fn open_storage(backend: &StorageBackend) -> Result<Arc<dyn Storage>> {
    match backend {
        StorageBackend::File { path } => {
            tracing::info!("Using file storage at {}", path.display());
            Ok(Arc::new(FileStorage::open(path)?))
        }
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
