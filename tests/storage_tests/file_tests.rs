//! Tests for FileStorage
//!
//! These tests verify:
//! - Opening/initializing the store file
//! - Every mutation is rewritten to disk before returning
//! - Reopening sees previously persisted data
//! - Rejection of files that do not hold an object
//! - Refusal of writes nested too deep to read back
//! - Numbers surviving the rewrite cycle unchanged
//! - Concurrent writers do not lose updates

use std::fs;
use std::sync::Arc;
use std::thread;

use jsondb::config::StorageBackend;
use jsondb::document::KeyPath;
use jsondb::storage::{open_storage, FileStorage, Storage};
use jsondb::JsonDbError;
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn path(segments: &[&str]) -> KeyPath {
    KeyPath::from_segments(segments.iter().copied()).unwrap()
}

fn setup_temp_storage() -> (TempDir, FileStorage) {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileStorage::open(temp_dir.path().join("db.json")).unwrap();
    (temp_dir, storage)
}

fn deep_path(depth: usize) -> KeyPath {
    KeyPath::from_segments((0..depth).map(|i| format!("n{}", i))).unwrap()
}

fn file_contents(storage: &FileStorage) -> Value {
    let content = fs::read_to_string(storage.path()).unwrap();
    serde_json::from_str(&content).unwrap()
}

// =============================================================================
// Open/Create Tests
// =============================================================================

#[test]
fn test_open_creates_file_and_directories() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("dir").join("db.json");

    assert!(!db_path.exists());

    let storage = FileStorage::open(&db_path).unwrap();

    assert!(db_path.exists());
    assert_eq!(storage.path(), db_path);
    assert_eq!(fs::read_to_string(&db_path).unwrap(), "{}");
}

#[test]
fn test_open_blank_file_initializes_empty_object() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("db.json");
    fs::write(&db_path, "  \n").unwrap();

    let storage = FileStorage::open(&db_path).unwrap();

    assert_eq!(file_contents(&storage), json!({}));
}

#[test]
fn test_open_existing_store() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("db.json");
    fs::write(&db_path, r#"{"name":"Ann","info":{"age":30}}"#).unwrap();

    let storage = FileStorage::open(&db_path).unwrap();

    assert_eq!(storage.get(&path(&["name"])).unwrap(), json!("Ann"));
    assert_eq!(storage.get(&path(&["info", "age"])).unwrap(), json!(30));
}

#[test]
fn test_open_rejects_non_object_file() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("db.json");
    fs::write(&db_path, "[1, 2, 3]").unwrap();

    let result = FileStorage::open(&db_path);
    assert!(matches!(result, Err(JsonDbError::Storage(_))));
}

#[test]
fn test_open_rejects_corrupt_file() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("db.json");
    fs::write(&db_path, "{not json").unwrap();

    let result = FileStorage::open(&db_path);
    assert!(matches!(result, Err(JsonDbError::Serialization(_))));
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_set_is_written_through() {
    let (_temp, storage) = setup_temp_storage();

    storage.set(&path(&["a", "b"]), json!("2")).unwrap();

    assert_eq!(file_contents(&storage), json!({"a": {"b": "2"}}));
}

#[test]
fn test_delete_is_written_through() {
    let (_temp, storage) = setup_temp_storage();
    storage.set(&path(&["a", "b"]), json!("2")).unwrap();
    storage.set(&path(&["c"]), json!(3)).unwrap();

    storage.delete(&path(&["a", "b"])).unwrap();
    assert_eq!(file_contents(&storage), json!({"a": {}, "c": 3}));

    storage.delete(&path(&["c"])).unwrap();
    assert_eq!(file_contents(&storage), json!({"a": {}}));
}

#[test]
fn test_failed_delete_leaves_file_untouched() {
    let (_temp, storage) = setup_temp_storage();
    storage.set(&path(&["a"]), json!("scalar")).unwrap();

    assert!(matches!(
        storage.delete(&path(&["a", "b"])),
        Err(JsonDbError::NotNavigable)
    ));
    assert!(matches!(
        storage.delete(&path(&["missing"])),
        Err(JsonDbError::KeyNotFound)
    ));

    assert_eq!(file_contents(&storage), json!({"a": "scalar"}));
}

#[test]
fn test_reopen_sees_persisted_data() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("db.json");

    {
        let storage = FileStorage::open(&db_path).unwrap();
        storage
            .set(&path(&["person", "rocket", "launches"]), json!("88"))
            .unwrap();
        storage.set(&path(&["other"]), json!([1, 2])).unwrap();
        storage.delete(&path(&["other"])).unwrap();
    }

    let storage = FileStorage::open(&db_path).unwrap();

    assert_eq!(
        storage.get(&path(&["person"])).unwrap(),
        json!({"rocket": {"launches": "88"}})
    );
    assert!(matches!(
        storage.get(&path(&["other"])),
        Err(JsonDbError::KeyNotFound)
    ));
}

#[test]
fn test_external_edit_is_visible() {
    let (_temp, storage) = setup_temp_storage();

    // The file is re-read on every operation
    fs::write(storage.path(), r#"{"edited":true}"#).unwrap();

    assert_eq!(storage.get(&path(&["edited"])).unwrap(), json!(true));
}

#[test]
fn test_deep_path_within_limit_round_trips() {
    let (_temp, storage) = setup_temp_storage();
    let deep = deep_path(100);

    storage.set(&deep, json!("bottom")).unwrap();

    assert_eq!(storage.get(&deep).unwrap(), json!("bottom"));
    assert!(FileStorage::open(storage.path()).is_ok());
}

#[test]
fn test_write_too_deep_to_reload_is_refused() {
    let (_temp, storage) = setup_temp_storage();
    storage.set(&path(&["unrelated"]), json!(1)).unwrap();

    assert!(matches!(
        storage.set(&deep_path(200), json!("bottom")),
        Err(JsonDbError::Storage(_))
    ));

    // Shallow path, but the value brings the nesting over the limit
    let mut value = json!("bottom");
    for _ in 0..120 {
        value = json!({ "x": value });
    }
    assert!(matches!(
        storage.set(&deep_path(20), value),
        Err(JsonDbError::Storage(_))
    ));

    // The store is still readable and writable
    assert_eq!(file_contents(&storage), json!({"unrelated": 1}));
    assert_eq!(storage.get(&path(&["unrelated"])).unwrap(), json!(1));
    storage.set(&path(&["unrelated"]), json!(2)).unwrap();
    assert_eq!(storage.get(&path(&["unrelated"])).unwrap(), json!(2));
    assert!(FileStorage::open(storage.path()).is_ok());
}

#[test]
fn test_floats_survive_rewrites_unchanged() {
    let (_temp, storage) = setup_temp_storage();
    let values = [
        1.0715660391465825e-75,
        0.1 + 0.2,
        std::f64::consts::PI,
        -2.2250738585072014e-308,
        1.7976931348623157e308,
        123456.78901234567,
    ];

    for (i, v) in values.iter().enumerate() {
        storage.set(&path(&["floats", &i.to_string()]), json!(v)).unwrap();
    }

    // Each set above re-read and rewrote every earlier value
    for (i, v) in values.iter().enumerate() {
        let stored = storage.get(&path(&["floats", &i.to_string()])).unwrap();
        assert_eq!(stored.as_f64().unwrap().to_bits(), v.to_bits(), "value {}", v);
    }
}

#[test]
fn test_large_integers_survive_rewrites_unchanged() {
    let (_temp, storage) = setup_temp_storage();

    storage.set(&path(&["max"]), json!(u64::MAX)).unwrap();
    storage.set(&path(&["min"]), json!(i64::MIN)).unwrap();

    assert_eq!(storage.get(&path(&["max"])).unwrap().as_u64(), Some(u64::MAX));
    assert_eq!(storage.get(&path(&["min"])).unwrap().as_i64(), Some(i64::MIN));
}

#[test]
fn test_no_temp_file_left_behind() {
    let (temp, storage) = setup_temp_storage();

    storage.set(&path(&["a"]), json!(1)).unwrap();
    assert!(storage.set(&deep_path(200), json!(1)).is_err());

    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["db.json".to_string()]);
}

#[test]
fn test_snapshot() {
    let (_temp, storage) = setup_temp_storage();
    storage.set(&path(&["a"]), json!(1)).unwrap();

    let snapshot = storage.snapshot().unwrap();

    assert_eq!(Value::Object(snapshot), json!({"a": 1}));
}

#[test]
fn test_open_storage_selects_backend() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("db.json");

    let file_backed = open_storage(&StorageBackend::File {
        path: db_path.clone(),
    })
    .unwrap();
    file_backed.set(&path(&["k"]), json!("v")).unwrap();
    assert!(fs::read_to_string(&db_path).unwrap().contains("\"k\""));

    let memory = open_storage(&StorageBackend::Memory).unwrap();
    memory.set(&path(&["k"]), json!("v")).unwrap();
    assert_eq!(memory.get(&path(&["k"])).unwrap(), json!("v"));
}

// =============================================================================
// Concurrent Access Tests
// =============================================================================

#[test]
fn test_concurrent_writes_are_not_lost() {
    let (_temp, storage) = setup_temp_storage();
    let storage = Arc::new(storage);

    let mut handles = vec![];
    for t in 0..4 {
        let storage = Arc::clone(&storage);
        handles.push(thread::spawn(move || {
            for i in 0..10 {
                let key = format!("thread{}_key{}", t, i);
                storage.set(&path(&[key.as_str()]), json!(i)).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let contents = file_contents(&storage);
    for t in 0..4 {
        for i in 0..10 {
            let key = format!("thread{}_key{}", t, i);
            assert_eq!(contents[&key], json!(i));
            assert_eq!(storage.get(&path(&[key.as_str()])).unwrap(), json!(i));
        }
    }
}

#[test]
fn test_concurrent_reads_during_writes() {
    let (_temp, storage) = setup_temp_storage();
    let storage = Arc::new(storage);
    storage.set(&path(&["pair"]), json!({"x": 0, "y": 0})).unwrap();

    let writer = {
        let storage = Arc::clone(&storage);
        thread::spawn(move || {
            for i in 1..=20 {
                storage
                    .set(&path(&["pair"]), json!({"x": i, "y": i}))
                    .unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let storage = Arc::clone(&storage);
            thread::spawn(move || {
                for _ in 0..20 {
                    let pair = storage.get(&path(&["pair"])).unwrap();
                    assert_eq!(pair["x"], pair["y"]);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
