//! Document Module
//!
//! The value model and path addressing shared by every storage backend.
//!
//! ## Model
//! - A document is any JSON value (`serde_json::Value`)
//! - The store root maps top-level keys to documents
//! - A [`KeyPath`] names a location: its first segment selects a root
//!   entry, the remaining segments descend through nested objects
//!
//! ```text
//! root ── "user" ── { "address": { "zip": "12345" } }
//!
//! ["user"]                    → whole document
//! ["user", "address", "zip"]  → "12345"
//! ```

mod path;
mod traverse;

pub use path::KeyPath;
pub use traverse::{delete_in, get_in, set_in};

/// A stored or transported JSON value
pub type Document = serde_json::Value;

/// The top-level mapping from root key to document
pub type Root = serde_json::Map<String, Document>;
