//! Store operations against the SQLite backend

use std::sync::Arc;

use localsync_core::sync::{Method, SyncOptions, PRIVATE_BROWSING_MESSAGE};
use localsync_core::{Backend, LocalSync, Model, Record, Store};
use localsync_sqlite::SqliteBackend;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

/// Helper to open a file-backed backend in a temp directory
fn file_backend(dir: &TempDir) -> Arc<SqliteBackend> {
    Arc::new(SqliteBackend::open(dir.path().join("localsync.db")).unwrap())
}

#[test]
fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();

    let id = {
        let mut store = Store::new("todos", file_backend(&dir)).unwrap();
        let mut todo = Model::new(json!({"title": "persist"}));
        store.create(&mut todo).unwrap();
        todo.id().unwrap()
    };

    let store = Store::new("todos", file_backend(&dir)).unwrap();
    assert_eq!(store.ids(), [id.as_str()]);
    assert_eq!(
        store.find_by_id(&id).unwrap(),
        Some(json!({"id": id.as_str(), "title": "persist"}))
    );
}

#[test]
fn test_open_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("db.sqlite");

    SqliteBackend::open(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_end_to_end_layout() {
    let backend = Arc::new(SqliteBackend::in_memory().unwrap());
    let mut store = Store::new("todos", backend.clone()).unwrap();

    let mut first = Model::new(json!({"title": "a"}));
    let mut second = Model::new(json!({"title": "b"}));
    store.create(&mut first).unwrap();
    store.create(&mut second).unwrap();
    let (g1, g2) = (first.id().unwrap(), second.id().unwrap());

    assert_eq!(
        backend.get("todos").unwrap(),
        Some(format!("{},{}", g1, g2))
    );

    store.destroy(&first).unwrap();
    assert_eq!(backend.get("todos").unwrap(), Some(g2.to_string()));
    assert_eq!(backend.get(&format!("todos-{}", g1)).unwrap(), None);
}

#[test]
fn test_clear_leaves_other_stores() {
    let backend = Arc::new(SqliteBackend::in_memory().unwrap());
    let mut todos = Store::new("todos", backend.clone()).unwrap();
    let mut notes = Store::new("notes", backend.clone()).unwrap();

    todos.create(&mut Model::new(json!({"id": "1"}))).unwrap();
    notes.create(&mut Model::new(json!({"id": "1"}))).unwrap();

    todos.clear().unwrap();

    assert!(todos.is_empty());
    assert_eq!(backend.keys().unwrap(), vec!["notes", "notes-1"]);
}

#[test]
fn test_private_browsing_message_on_zero_quota() {
    let backend = Arc::new(SqliteBackend::in_memory().unwrap().with_quota(0));
    let store = Store::new("todos", backend).unwrap().into_shared();
    let mut model = Model::new(json!({"title": "a"})).with_store(store);

    let mut message = None;
    LocalSync::default().sync(
        Method::Create,
        &mut model,
        SyncOptions::new().on_error(|inv| message = Some(inv.payload().to_string())),
    );

    assert_eq!(message.as_deref(), Some(PRIVATE_BROWSING_MESSAGE));
}
