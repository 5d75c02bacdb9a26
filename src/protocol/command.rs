//! Command definitions
//!
//! Validated commands produced by the parser.

use std::fmt;
use std::str::FromStr;

use crate::document::{Document, KeyPath};
use crate::error::JsonDbError;

/// Command types, as spelled in the request's `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Get,
    Set,
    Delete,
    Exit,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Get => "get",
            CommandType::Set => "set",
            CommandType::Delete => "delete",
            CommandType::Exit => "exit",
        }
    }
}

impl FromStr for CommandType {
    type Err = JsonDbError;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(CommandType::Get),
            "set" => Ok(CommandType::Set),
            "delete" => Ok(CommandType::Delete),
            "exit" => Ok(CommandType::Exit),
            _ => Err(JsonDbError::InvalidRequest(format!("Unknown command: {}", s))),
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Read the document at a path
    Get { path: KeyPath },

    /// Store a document at a path
    Set { path: KeyPath, value: Document },

    /// Remove the document at a path
    Delete { path: KeyPath },

    /// Stop the server
    Exit,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Set { .. } => CommandType::Set,
            Command::Delete { .. } => CommandType::Delete,
            Command::Exit => CommandType::Exit,
        }
    }

    /// The key path this command addresses, if any
    pub fn path(&self) -> Option<&KeyPath> {
        match self {
            Command::Get { path } | Command::Set { path, .. } | Command::Delete { path } => {
                Some(path)
            }
            Command::Exit => None,
        }
    }
}
