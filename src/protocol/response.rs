//! Response definitions
//!
//! Represents responses to clients.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::Result;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERROR")]
    Error,
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Status code
    #[serde(rename = "response")]
    pub status: Status,

    /// Payload of a successful get
    #[serde(
        default,
        deserialize_with = "super::request::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Document>,

    /// Failure description, present only on ERROR
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Response {
    /// Create an OK response without payload
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            value: None,
            reason: None,
        }
    }

    /// Create an OK response carrying a document
    pub fn ok_with(value: Document) -> Self {
        Self {
            status: Status::Ok,
            value: Some(value),
            reason: None,
        }
    }

    /// Create an ERROR response
    pub fn error(reason: &str) -> Self {
        Self {
            status: Status::Error,
            value: None,
            reason: Some(reason.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
