//! Engine Module
//!
//! Command dispatch on top of the storage backend.
//!
//! ## Responsibilities
//! - Parse raw requests into commands
//! - Execute commands against the shared [`Storage`]
//! - Map storage outcomes onto client-visible responses
//! - Tell the caller whether the server should keep serving

use std::sync::Arc;

use crate::config::Config;
use crate::error::{JsonDbError, Result};
use crate::protocol::{parse_command, Command, Response};
use crate::storage::{open_storage, Storage};

/// Reason sent for a request that does not parse into a command
pub const REASON_INVALID_FORMAT: &str = "Invalid command format";

/// Reason sent when a get or delete path does not resolve
pub const REASON_NO_SUCH_KEY: &str = "No such key";

/// Reason sent when a set fails
pub const REASON_SET_FAILED: &str = "Error setting value";

/// Reason sent in place of a response that does not fit in one frame
pub const REASON_RESPONSE_TOO_LARGE: &str = "Response too large";

/// Result of handling one request
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// False only after an exit command
    pub keep_serving: bool,

    /// Response to send back to the client
    pub response: Response,
}

impl Outcome {
    fn serving(response: Response) -> Self {
        Self {
            keep_serving: true,
            response,
        }
    }
}

/// Dispatches commands to a storage backend
///
/// The engine holds no state of its own besides the backend handle, so it
/// is shared across worker threads behind an `Arc`. All synchronization
/// happens inside the backend.
pub struct Engine {
    storage: Arc<dyn Storage>,
}

impl Engine {
    /// Create an engine over an already constructed backend
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Open the backend selected by `config`
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self::new(open_storage(&config.backend)?))
    }

    /// Parse and execute a raw request
    ///
    /// Requests that fail to parse never reach the backend and never stop
    /// the server.
    pub fn process(&self, raw: &str) -> Outcome {
        match parse_command(raw) {
            Ok(command) => self.execute(command),
            Err(e) => {
                tracing::debug!("Rejected request: {}", e);
                Outcome::serving(Response::error(REASON_INVALID_FORMAT))
            }
        }
    }

    /// Execute a parsed command
    pub fn execute(&self, command: Command) -> Outcome {
        match command.path() {
            Some(path) => tracing::debug!("Executing {} {}", command.command_type(), path),
            None => tracing::debug!("Executing {}", command.command_type()),
        }

        match command {
            Command::Get { path } => match self.storage.get(&path) {
                Ok(value) => Outcome::serving(Response::ok_with(value)),
                Err(e) => {
                    log_failure("get", &e);
                    Outcome::serving(Response::error(REASON_NO_SUCH_KEY))
                }
            },
            Command::Set { path, value } => match self.storage.set(&path, value) {
                Ok(()) => Outcome::serving(Response::ok()),
                Err(e) => {
                    log_failure("set", &e);
                    Outcome::serving(Response::error(REASON_SET_FAILED))
                }
            },
            // NotFound and NotNavigable both surface as "No such key"
            Command::Delete { path } => match self.storage.delete(&path) {
                Ok(()) => Outcome::serving(Response::ok()),
                Err(e) => {
                    log_failure("delete", &e);
                    Outcome::serving(Response::error(REASON_NO_SUCH_KEY))
                }
            },
            Command::Exit => {
                tracing::info!("Exit command received");
                Outcome {
                    keep_serving: false,
                    response: Response::ok(),
                }
            }
        }
    }

    /// The backend this engine dispatches to
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}

fn log_failure(operation: &str, error: &JsonDbError) {
    if error.is_lookup_failure() {
        tracing::debug!("{} failed: {}", operation, error);
    } else {
        tracing::warn!("{} failed: {}", operation, error);
    }
}
