//! Configuration for JsonDB
//!
//! Centralized configuration with sensible defaults.

use std::net::ToSocketAddrs;
use std::path::PathBuf;

use crate::error::{JsonDbError, Result};

/// Main configuration for a JsonDB server instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Where the store lives
    pub backend: StorageBackend,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Number of worker threads serving connections
    pub worker_threads: usize,

    /// Connection read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,
}

/// Storage backend selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// A single JSON object file, rewritten in full on every mutation
    File { path: PathBuf },

    /// Process-local map, lost on exit
    Memory,
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::File {
            path: PathBuf::from("./data/db.json"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            listen_addr: "127.0.0.1:23456".to_string(),
            worker_threads: 4,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the configuration can actually be served
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(JsonDbError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }

        self.listen_addr.to_socket_addrs().map_err(|e| {
            JsonDbError::Config(format!("invalid listen address {:?}: {}", self.listen_addr, e))
        })?;

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Persist the store to the given JSON file
    pub fn db_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.backend = StorageBackend::File { path: path.into() };
        self
    }

    /// Keep the store in memory only
    pub fn in_memory(mut self) -> Self {
        self.config.backend = StorageBackend::Memory;
        self
    }

    /// Set the storage backend
    pub fn backend(mut self, backend: StorageBackend) -> Self {
        self.config.backend = backend;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of connection worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
