//! Request definitions
//!
//! The raw request document as it travels over the wire.

use serde::{Deserialize, Deserializer, Serialize};

use crate::document::Document;
use crate::error::Result;

/// A request as sent by a client
///
/// Only structural decoding happens here; [`parse_command`] decides whether
/// the fields form a valid command.
///
/// [`parse_command`]: super::parse_command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Command name (`get`, `set`, `delete`, `exit`)
    #[serde(rename = "type")]
    pub kind: String,

    /// A single key or an array of path segments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Document>,

    /// Document to store; `null` is a value, a missing field is `None`
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Document>,
}

/// Maps any present field, `null` included, to `Some`
pub(super) fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Document>, D::Error>
where
    D: Deserializer<'de>,
{
    Document::deserialize(deserializer).map(Some)
}

impl Request {
    pub fn get(key: impl Into<Document>) -> Self {
        Self::new("get", Some(key.into()), None)
    }

    pub fn set(key: impl Into<Document>, value: impl Into<Document>) -> Self {
        Self::new("set", Some(key.into()), Some(value.into()))
    }

    pub fn delete(key: impl Into<Document>) -> Self {
        Self::new("delete", Some(key.into()), None)
    }

    pub fn exit() -> Self {
        Self::new("exit", None, None)
    }

    fn new(kind: &str, key: Option<Document>, value: Option<Document>) -> Self {
        Self {
            kind: kind.to_string(),
            key,
            value,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
