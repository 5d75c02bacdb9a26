//! Path traversal
//!
//! Get/set/delete of nested documents inside a [`Root`]. Both storage
//! backends run their operations through these functions, so the
//! navigation rules live in exactly one place:
//!
//! - `get_in` and `delete_in` require every intermediate value to be an
//!   object; descending through anything else is `NotNavigable`, a missing
//!   segment is `KeyNotFound`.
//! - `set_in` is permissive: a missing intermediate is created and an
//!   intermediate that is not an object is replaced by an empty object.
//!
//! A failed call leaves the root untouched. Navigation never mutates, and
//! the single mutation happens only once the whole path has resolved.

use serde_json::{Map, Value};

use crate::error::{JsonDbError, Result};

use super::{KeyPath, Root};

/// Resolve `path` against `root`
pub fn get_in<'a>(root: &'a Root, path: &KeyPath) -> Result<&'a Value> {
    let mut current = root.get(path.root()).ok_or(JsonDbError::KeyNotFound)?;

    for segment in path.rest() {
        current = match current {
            Value::Object(map) => map.get(segment).ok_or(JsonDbError::KeyNotFound)?,
            _ => return Err(JsonDbError::NotNavigable),
        };
    }

    Ok(current)
}

/// Store `value` at `path`, creating or replacing intermediate objects
///
/// A root path replaces the root entry wholesale whatever it held before.
pub fn set_in(root: &mut Root, path: &KeyPath, value: Value) {
    let mut current: &mut Root = root;
    for segment in path.parents() {
        current = descend_or_create(current, segment);
    }

    current.insert(path.leaf().to_string(), value);
}

/// Remove the value at `path` and return it
pub fn delete_in(root: &mut Root, path: &KeyPath) -> Result<Value> {
    let mut current: &mut Root = root;
    for segment in path.parents() {
        current = match current.get_mut(segment) {
            Some(Value::Object(map)) => map,
            Some(_) => return Err(JsonDbError::NotNavigable),
            None => return Err(JsonDbError::KeyNotFound),
        };
    }

    current.remove(path.leaf()).ok_or(JsonDbError::KeyNotFound)
}

/// Return the object stored under `segment`, installing a fresh one when
/// the slot is empty or holds a non-object
fn descend_or_create<'a>(map: &'a mut Root, segment: &str) -> &'a mut Root {
    let slot = map
        .entry(segment.to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    if !slot.is_object() {
        tracing::trace!(segment, "replacing non-object intermediate with empty object");
        *slot = Value::Object(Map::new());
    }

    match slot {
        Value::Object(inner) => inner,
        _ => unreachable!("slot was just made an object"),
    }
}
