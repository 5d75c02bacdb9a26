//! # JsonDB
//!
//! A networked store of JSON documents addressed by key paths:
//! - Nested get/set/delete through paths like `["user", "address", "zip"]`
//! - In-memory or single-file persisted backends behind one trait
//! - Reader/writer locking over the whole store
//! - TCP server with a fixed worker pool and one request per connection
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                             │
//! │            (acceptor + bounded worker pool)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ length-prefixed JSON
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │              Command Parser → Engine                        │
//! │         (validate request, dispatch, build response)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Memory    │          │    File     │
//!   │  (RwLock)   │          │  (RwLock)   │
//!   └──────┬──────┘          └──────┬──────┘
//!          └────────────┬────────────┘
//!                       ▼
//!              ┌─────────────────┐
//!              │ Path traversal  │
//!              │   (document)    │
//!              └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod client;
pub mod document;
pub mod engine;
pub mod network;
pub mod protocol;
pub mod storage;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use client::Client;
pub use config::{Config, StorageBackend};
pub use document::{Document, KeyPath};
pub use engine::{Engine, Outcome};
pub use error::{JsonDbError, Result};
pub use storage::Storage;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of JsonDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
