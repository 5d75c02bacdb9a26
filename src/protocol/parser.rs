//! Command parser
//!
//! Turns a raw request document into a validated [`Command`]. Nothing that
//! fails here ever reaches the storage engine.

use crate::document::{Document, KeyPath};
use crate::error::{JsonDbError, Result};

use super::{Command, CommandType, Request};

/// Decode and validate a raw request
pub fn parse_command(raw: &str) -> Result<Command> {
    let request = Request::from_json(raw)
        .map_err(|_| JsonDbError::InvalidRequest("invalid format".to_string()))?;

    command_from_request(request)
}

/// Validate an already decoded request
///
/// `get`, `set` and `delete` need a key, `set` also needs a value, `exit`
/// takes neither (extra fields are ignored).
pub fn command_from_request(request: Request) -> Result<Command> {
    let command_type: CommandType = request.kind.parse()?;

    match command_type {
        CommandType::Get => Ok(Command::Get {
            path: required_path(request.key, command_type)?,
        }),
        CommandType::Set => {
            let path = required_path(request.key, command_type)?;
            let value = request.value.ok_or_else(|| {
                JsonDbError::InvalidRequest(format!(
                    "Value is required for {} command",
                    command_type
                ))
            })?;
            Ok(Command::Set { path, value })
        }
        CommandType::Delete => Ok(Command::Delete {
            path: required_path(request.key, command_type)?,
        }),
        CommandType::Exit => Ok(Command::Exit),
    }
}

fn required_path(key: Option<Document>, command_type: CommandType) -> Result<KeyPath> {
    let key = key.ok_or_else(|| {
        JsonDbError::InvalidRequest(format!("Key is required for {} command", command_type))
    })?;

    parse_key(key)
}

/// A key is either one string or an array of strings
pub fn parse_key(key: Document) -> Result<KeyPath> {
    let segments = match key {
        Document::String(segment) => vec![segment],
        Document::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Document::String(segment) => Ok(segment),
                _ => Err(malformed_key()),
            })
            .collect::<Result<Vec<_>>>()?,
        _ => return Err(malformed_key()),
    };

    KeyPath::new(segments).map_err(|_| {
        JsonDbError::InvalidRequest("key path must not be empty".to_string())
    })
}

fn malformed_key() -> JsonDbError {
    JsonDbError::InvalidRequest("key must be a string or an array of strings".to_string())
}
