//! Tests for key paths and traversal
//!
//! These tests verify:
//! - KeyPath construction and accessors
//! - get_in through nested objects
//! - set_in creating and replacing intermediates
//! - delete_in failure kinds and leaving the root untouched on failure

use jsondb::document::{delete_in, get_in, set_in, KeyPath, Root};
use jsondb::JsonDbError;
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn path(segments: &[&str]) -> KeyPath {
    KeyPath::from_segments(segments.iter().copied()).unwrap()
}

fn root_from(value: Value) -> Root {
    match value {
        Value::Object(map) => map,
        _ => panic!("test root must be an object"),
    }
}

// =============================================================================
// KeyPath Tests
// =============================================================================

#[test]
fn test_empty_path_rejected() {
    let result = KeyPath::new(vec![]);
    assert!(matches!(result, Err(JsonDbError::EmptyKeyPath)));
}

#[test]
fn test_path_accessors() {
    let p = path(&["user", "address", "zip"]);

    assert_eq!(p.root(), "user");
    assert_eq!(p.rest(), ["address".to_string(), "zip".to_string()]);
    assert_eq!(p.leaf(), "zip");
    assert_eq!(p.parents(), ["user".to_string(), "address".to_string()]);
    assert_eq!(p.segments(), ["user", "address", "zip"]);
    assert_eq!(p.len(), 3);
    assert!(!p.is_root());
    assert_eq!(p.to_string(), "user.address.zip");
}

#[test]
fn test_single_segment_path() {
    let p = KeyPath::from_segment("name");

    assert!(p.is_root());
    assert_eq!(p.root(), "name");
    assert_eq!(p.leaf(), "name");
    assert!(p.rest().is_empty());
    assert!(p.parents().is_empty());
    assert_eq!(KeyPath::from("name"), p);
}

// =============================================================================
// get_in Tests
// =============================================================================

#[test]
fn test_get_root_value() {
    let root = root_from(json!({"a": [1, 2, 3]}));

    assert_eq!(get_in(&root, &path(&["a"])).unwrap(), &json!([1, 2, 3]));
}

#[test]
fn test_get_nested_value() {
    let root = root_from(json!({"user": {"address": {"zip": "12345"}}}));

    assert_eq!(
        get_in(&root, &path(&["user", "address", "zip"])).unwrap(),
        &json!("12345")
    );
    assert_eq!(
        get_in(&root, &path(&["user", "address"])).unwrap(),
        &json!({"zip": "12345"})
    );
}

#[test]
fn test_get_missing_root() {
    let root = Root::new();

    let result = get_in(&root, &path(&["missing"]));
    assert!(matches!(result, Err(JsonDbError::KeyNotFound)));
}

#[test]
fn test_get_missing_nested_segment() {
    let root = root_from(json!({"a": {"b": 1}}));

    let result = get_in(&root, &path(&["a", "c"]));
    assert!(matches!(result, Err(JsonDbError::KeyNotFound)));
}

#[test]
fn test_get_through_non_object() {
    let root = root_from(json!({"a": {"b": "text"}, "list": [{"x": 1}]}));

    let result = get_in(&root, &path(&["a", "b", "c"]));
    assert!(matches!(result, Err(JsonDbError::NotNavigable)));

    // Arrays are not navigable either
    let result = get_in(&root, &path(&["list", "0"]));
    assert!(matches!(result, Err(JsonDbError::NotNavigable)));
}

#[test]
fn test_get_stored_null() {
    let root = root_from(json!({"a": {"b": null}}));

    assert_eq!(get_in(&root, &path(&["a", "b"])).unwrap(), &Value::Null);

    let result = get_in(&root, &path(&["a", "b", "c"]));
    assert!(matches!(result, Err(JsonDbError::NotNavigable)));
}

// =============================================================================
// set_in Tests
// =============================================================================

#[test]
fn test_set_root_replaces_wholesale() {
    let mut root = root_from(json!({"a": {"deep": {"tree": true}}}));

    set_in(&mut root, &path(&["a"]), json!(42));

    assert_eq!(Value::Object(root), json!({"a": 42}));
}

#[test]
fn test_set_creates_missing_intermediates() {
    let mut root = Root::new();

    set_in(&mut root, &path(&["a", "b", "c"]), json!("leaf"));

    assert_eq!(Value::Object(root), json!({"a": {"b": {"c": "leaf"}}}));
}

#[test]
fn test_set_preserves_siblings() {
    let mut root = root_from(json!({"a": {"keep": 1, "b": {"keep": 2}}, "other": true}));

    set_in(&mut root, &path(&["a", "b", "new"]), json!("x"));

    assert_eq!(
        Value::Object(root),
        json!({"a": {"keep": 1, "b": {"keep": 2, "new": "x"}}, "other": true})
    );
}

#[test]
fn test_set_replaces_non_object_intermediate() {
    let mut root = root_from(json!({"a": {"b": "scalar"}}));

    set_in(&mut root, &path(&["a", "b", "c"]), json!(1));

    assert_eq!(Value::Object(root), json!({"a": {"b": {"c": 1}}}));
}

#[test]
fn test_set_replaces_non_object_root() {
    let mut root = root_from(json!({"a": [1, 2, 3]}));

    set_in(&mut root, &path(&["a", "b"]), json!(null));

    assert_eq!(Value::Object(root), json!({"a": {"b": null}}));
}

#[test]
fn test_set_overwrites_leaf_of_any_type() {
    let mut root = root_from(json!({"a": {"b": {"nested": 1}}}));

    set_in(&mut root, &path(&["a", "b"]), json!("flat"));

    assert_eq!(Value::Object(root), json!({"a": {"b": "flat"}}));
}

// =============================================================================
// delete_in Tests
// =============================================================================

#[test]
fn test_delete_root_entry() {
    let mut root = root_from(json!({"a": 1, "b": 2}));

    let removed = delete_in(&mut root, &path(&["a"])).unwrap();

    assert_eq!(removed, json!(1));
    assert_eq!(Value::Object(root), json!({"b": 2}));
}

#[test]
fn test_delete_nested_leaf_keeps_empty_parent() {
    let mut root = root_from(json!({"a": {"b": "2"}}));

    delete_in(&mut root, &path(&["a", "b"])).unwrap();

    assert_eq!(Value::Object(root), json!({"a": {}}));
}

#[test]
fn test_delete_missing_root() {
    let mut root = Root::new();

    let result = delete_in(&mut root, &path(&["missing"]));
    assert!(matches!(result, Err(JsonDbError::KeyNotFound)));
}

#[test]
fn test_delete_missing_intermediate() {
    let mut root = root_from(json!({"a": {}}));

    let result = delete_in(&mut root, &path(&["a", "b", "c"]));
    assert!(matches!(result, Err(JsonDbError::KeyNotFound)));
}

#[test]
fn test_delete_missing_leaf() {
    let mut root = root_from(json!({"a": {"b": 1}}));

    let result = delete_in(&mut root, &path(&["a", "x"]));
    assert!(matches!(result, Err(JsonDbError::KeyNotFound)));
}

#[test]
fn test_delete_through_non_object() {
    let mut root = root_from(json!({"a": "scalar", "b": {"c": 5}}));

    let result = delete_in(&mut root, &path(&["a", "x"]));
    assert!(matches!(result, Err(JsonDbError::NotNavigable)));

    let result = delete_in(&mut root, &path(&["b", "c", "d"]));
    assert!(matches!(result, Err(JsonDbError::NotNavigable)));
}

#[test]
fn test_failed_delete_leaves_root_untouched() {
    let original = json!({"a": {"b": {"c": 1}}, "d": 4});
    let mut root = root_from(original.clone());

    assert!(delete_in(&mut root, &path(&["a", "b", "missing"])).is_err());
    assert!(delete_in(&mut root, &path(&["d", "x"])).is_err());

    assert_eq!(Value::Object(root), original);
}

// =============================================================================
// Round-trip Properties
// =============================================================================

#[test]
fn test_set_then_get_returns_value() {
    let cases = [
        (vec!["a"], json!("1")),
        (vec!["a", "b"], json!({"x": [1, 2]})),
        (vec!["x", "y", "z", "w"], json!(null)),
        (vec!["n"], json!(3.5)),
        (vec!["t", "f"], json!(false)),
    ];

    let mut root = Root::new();
    for (segments, value) in cases {
        let p = path(&segments);
        set_in(&mut root, &p, value.clone());
        assert_eq!(get_in(&root, &p).unwrap(), &value, "path {}", p);
    }
}

#[test]
fn test_delete_then_get_not_found() {
    let mut root = Root::new();
    let p = path(&["a", "b", "c"]);

    set_in(&mut root, &p, json!(1));
    delete_in(&mut root, &p).unwrap();

    assert!(matches!(get_in(&root, &p), Err(JsonDbError::KeyNotFound)));
    assert_eq!(get_in(&root, &path(&["a", "b"])).unwrap(), &json!({}));
}
