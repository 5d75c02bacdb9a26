//! Key paths
//!
//! Non-empty sequences of string segments.

use std::fmt;

use crate::error::{JsonDbError, Result};

/// An ordered, non-empty sequence of keys addressing a nested document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Build a path from explicit segments
    ///
    /// Fails with `EmptyKeyPath` when no segment is given.
    pub fn new(segments: Vec<String>) -> Result<Self> {
        if segments.is_empty() {
            return Err(JsonDbError::EmptyKeyPath);
        }
        Ok(Self { segments })
    }

    /// Build a path from anything yielding string-like segments
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(segments.into_iter().map(Into::into).collect())
    }

    /// A single-segment path addressing a root entry
    pub fn from_segment(segment: impl Into<String>) -> Self {
        Self {
            segments: vec![segment.into()],
        }
    }

    /// The root-level key
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// Segments below the root key (empty for a root path)
    pub fn rest(&self) -> &[String] {
        &self.segments[1..]
    }

    /// The last segment, the key removed or assigned by a mutation
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Every segment except the leaf
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path addresses a root entry directly
    pub fn is_root(&self) -> bool {
        self.segments.len() == 1
    }
}

impl TryFrom<Vec<String>> for KeyPath {
    type Error = JsonDbError;

    fn try_from(segments: Vec<String>) -> Result<Self> {
        Self::new(segments)
    }
}

impl From<&str> for KeyPath {
    fn from(segment: &str) -> Self {
        Self::from_segment(segment)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
