//! Sync dispatch, delivery and routing

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use localsync_core::backend::{Backend, MemoryBackend};
use localsync_core::sync::{
    remote_fn, Deferred, Invocation, Method, Strategy, SyncError, SyncOptions, SyncOutcome,
    SyncRouter, PRIVATE_BROWSING_MESSAGE, RECORD_NOT_FOUND_MESSAGE,
};
use localsync_core::{
    CallbackStyle, Collection, LocalSync, Model, Record, SharedStore, Store, SyncConfig,
    SyncStrategy, Syncable,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// Everything the callbacks saw, in call order
#[derive(Debug, Default)]
struct Recorded {
    events: Vec<String>,
    success: Option<Value>,
    error: Option<String>,
    legacy_model: Option<Value>,
    complete: Option<Option<Value>>,
}

type Log = Rc<RefCell<Recorded>>;

fn recording_options<'a>(log: &Log) -> SyncOptions<'a> {
    let (on_success, on_error, on_complete) = (log.clone(), log.clone(), log.clone());
    SyncOptions::new()
        .on_success(move |inv| {
            let mut log = on_success.borrow_mut();
            log.events.push("success".to_string());
            log.success = Some(inv.payload().clone());
            log.legacy_model = inv.model().cloned();
        })
        .on_error(move |inv| {
            let mut log = on_error.borrow_mut();
            log.events.push("error".to_string());
            log.error = Some(inv.payload().to_string());
            log.legacy_model = inv.model().cloned();
        })
        .on_complete(move |response| {
            let mut log = on_complete.borrow_mut();
            log.events.push("complete".to_string());
            log.complete = Some(response.cloned());
        })
}

fn memory_store(name: &str) -> (Arc<MemoryBackend>, SharedStore) {
    let backend = Arc::new(MemoryBackend::new());
    let store = Store::new(name, backend.clone()).unwrap().into_shared();
    (backend, store)
}

#[test]
fn test_create_delivers_success_then_complete() {
    let (_, store) = memory_store("todos");
    let local = LocalSync::default();
    let log = Log::default();
    let mut model = Model::new(json!({"title": "a"})).with_store(store);

    let mut promise = local
        .sync(Method::Create, &mut model, recording_options(&log))
        .unwrap();

    let id = model.id().unwrap();
    let expected = json!({"id": id.as_str(), "title": "a"});
    let log = log.borrow();
    assert_eq!(log.events, vec!["success", "complete"]);
    assert_eq!(log.success, Some(expected.clone()));
    assert_eq!(log.complete, Some(Some(expected.clone())));
    assert_eq!(log.legacy_model, None);
    assert_eq!(promise.try_take(), Some(Ok(expected)));
}

#[test]
fn test_read_missing_record_not_found() {
    let (_, store) = memory_store("todos");
    let local = LocalSync::default();
    let log = Log::default();
    let mut model = Model::new(json!({"id": "missing"})).with_store(store);

    let mut promise = local
        .sync(Method::Read, &mut model, recording_options(&log))
        .unwrap();

    let log = log.borrow();
    assert_eq!(log.events, vec!["error", "complete"]);
    assert_eq!(log.error.as_deref(), Some(RECORD_NOT_FOUND_MESSAGE));
    assert_eq!(log.complete, Some(None));
    assert_eq!(
        promise.try_take(),
        Some(Err(SyncError::Failed("Record Not Found".to_string())))
    );
}

#[test]
fn test_falsy_record_reaches_complete() {
    let backend = Arc::new(MemoryBackend::with_entries([("todos", "z"), ("todos-z", "0")]));
    let store = Store::new("todos", backend).unwrap().into_shared();
    let local = LocalSync::default();
    let log = Log::default();
    let mut model = Model::new(json!({"id": "z"})).with_store(store);

    local.sync(Method::Read, &mut model, recording_options(&log));

    let log = log.borrow();
    assert_eq!(log.events, vec!["error", "complete"]);
    assert_eq!(log.error.as_deref(), Some(RECORD_NOT_FOUND_MESSAGE));
    assert_eq!(log.complete, Some(Some(json!(0))));
}

#[test]
fn test_quota_on_empty_backend_is_private_browsing() {
    let store = Store::new("todos", Arc::new(MemoryBackend::with_quota(0)))
        .unwrap()
        .into_shared();
    let local = LocalSync::default();
    let log = Log::default();
    let mut model = Model::new(json!({"title": "a"})).with_store(store);

    local.sync(Method::Create, &mut model, recording_options(&log));

    assert_eq!(log.borrow().error.as_deref(), Some(PRIVATE_BROWSING_MESSAGE));
}

#[test]
fn test_quota_on_full_backend_keeps_fault_message() {
    let backend = Arc::new(MemoryBackend::with_quota(64));
    backend.set("other", "occupied").unwrap();
    let store = Store::new("todos", backend).unwrap().into_shared();
    let local = LocalSync::default();
    let log = Log::default();
    let mut model = Model::new(json!({"title": "x".repeat(100)})).with_store(store);

    local.sync(Method::Create, &mut model, recording_options(&log));

    let log = log.borrow();
    let message = log.error.as_deref().unwrap();
    assert!(message.starts_with("quota exceeded"), "{}", message);
}

#[test]
fn test_update_and_delete() {
    let (backend, store) = memory_store("todos");
    let local = LocalSync::default();
    let mut model = Model::new(json!({"id": "t1", "title": "a"})).with_store(store);

    let mut promise = local
        .sync(Method::Update, &mut model, SyncOptions::new())
        .unwrap();
    assert_eq!(promise.try_take(), Some(Ok(json!({"id": "t1", "title": "a"}))));
    assert_eq!(backend.get("todos").unwrap().as_deref(), Some("t1"));

    let mut promise = local
        .sync(Method::Delete, &mut model, SyncOptions::new())
        .unwrap();
    assert_eq!(promise.try_take(), Some(Ok(json!({"id": "t1", "title": "a"}))));
    assert_eq!(backend.get("todos-t1").unwrap(), None);
    assert_eq!(backend.get("todos").unwrap().as_deref(), Some(""));
}

#[test]
fn test_store_fault_is_caught() {
    let (_, store) = memory_store("todos");
    let local = LocalSync::default();
    let log = Log::default();
    let mut model = Model::new(json!({"title": "no id"})).with_store(store);

    let mut promise = local
        .sync(Method::Delete, &mut model, recording_options(&log))
        .unwrap();

    let log = log.borrow();
    assert_eq!(log.events, vec!["error", "complete"]);
    assert_eq!(log.error.as_deref(), Some("record has no 'id'"));
    assert!(matches!(promise.try_take(), Some(Err(SyncError::Failed(_)))));
}

#[test]
fn test_collection_read_loads_all() {
    let (_, store) = memory_store("todos");
    let local = LocalSync::default();
    let mut collection = Collection::new(store.clone());

    for title in ["a", "b"] {
        let mut model = collection.model(json!({ "title": title }));
        local.sync(Method::Create, &mut model, SyncOptions::new());
    }

    let mut promise = local
        .sync(Method::Read, &mut collection, SyncOptions::new())
        .unwrap();
    let response = promise.try_take().unwrap().unwrap();
    collection.reset(&response);

    let titles: Vec<&Value> = collection.models().iter().map(|m| &m["title"]).collect();
    assert_eq!(titles, vec![&json!("a"), &json!("b")]);
}

#[test]
fn test_model_store_wins_over_collection_store() {
    let (_, own) = memory_store("own");
    let (_, shared) = memory_store("shared");
    let local = LocalSync::default();
    let mut model = Model::new(json!({"id": "m"}))
        .in_collection(shared.clone())
        .with_store(own.clone());

    local.sync(Method::Create, &mut model, SyncOptions::new());

    assert_eq!(own.lock().ids(), ["m"]);
    assert!(shared.lock().is_empty());
}

#[test]
fn test_legacy_callbacks_receive_model() {
    let (_, store) = memory_store("todos");
    let local = LocalSync::new(SyncConfig::legacy());
    let log = Log::default();
    let mut model = Model::new(json!({"id": "L", "title": "legacy"})).with_store(store);

    local.sync(Method::Create, &mut model, recording_options(&log));

    let log = log.borrow();
    assert_eq!(log.legacy_model, Some(json!({"id": "L", "title": "legacy"})));
    assert_eq!(log.success, Some(json!({"id": "L", "title": "legacy"})));
}

#[test]
fn test_legacy_error_receives_model_and_flags() {
    let (_, store) = memory_store("todos");
    let local = LocalSync::new(SyncConfig::legacy());
    let seen = Rc::new(RefCell::new(None));
    let sink = seen.clone();
    let mut model = Model::new(json!({"id": "nope"})).with_store(store);

    local.sync(
        Method::Read,
        &mut model,
        SyncOptions::new().on_error(move |inv| {
            if let Invocation::Legacy {
                model,
                payload,
                options,
            } = inv
            {
                *sink.borrow_mut() = Some((model.clone(), payload.to_string(), options.ajax_sync));
            }
        }),
    );

    assert_eq!(
        seen.borrow().clone(),
        Some((
            json!({"id": "nope"}),
            RECORD_NOT_FOUND_MESSAGE.to_string(),
            false
        ))
    );
}

#[test]
fn test_without_promises_returns_none() {
    let (_, store) = memory_store("todos");
    let local = LocalSync::new(SyncConfig::default().without_promises());
    let log = Log::default();
    let mut model = Model::new(json!({"title": "a"})).with_store(store);

    let promise = local.sync(Method::Create, &mut model, recording_options(&log));

    assert!(promise.is_none());
    assert_eq!(log.borrow().events, vec!["success", "complete"]);
}

#[tokio::test]
async fn test_promise_can_be_awaited() {
    let (_, store) = memory_store("todos");
    let local = LocalSync::default();
    let mut model = Model::new(json!({"id": 7, "n": 1})).with_store(store);

    let promise = local.sync(Method::Create, &mut model, SyncOptions::new()).unwrap();

    assert_eq!(promise.await, Ok(json!({"id": 7, "n": 1})));
}

/// Remote strategy stub that records the verbs it was asked to run
fn recording_remote(calls: Rc<RefCell<Vec<Method>>>) -> impl SyncStrategy {
    remote_fn(move |method, model, options| {
        calls.borrow_mut().push(method);
        let (deferred, promise) = Deferred::new();
        options.deliver(
            CallbackStyle::Current,
            &model.to_json(),
            &SyncOutcome::Success(json!({"remote": true})),
            Some(deferred),
        );
        Some(promise)
    })
}

#[test]
fn test_router_prefers_local_store() {
    let (_, store) = memory_store("todos");
    let calls = Rc::new(RefCell::new(Vec::new()));
    let router = SyncRouter::new(SyncConfig::default(), recording_remote(calls.clone()));
    let mut model = Model::new(json!({"title": "a"})).with_store(store.clone());

    assert_eq!(router.strategy_for(&model, &SyncOptions::new()), Strategy::Local);
    router.sync(Method::Create, &mut model, SyncOptions::new());

    assert!(calls.borrow().is_empty());
    assert_eq!(store.lock().len(), 1);
}

#[test]
fn test_router_falls_back_to_remote() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let router = SyncRouter::new(SyncConfig::default(), recording_remote(calls.clone()));
    let mut model = Model::new(json!({"title": "a"}));

    let mut promise = router
        .sync(Method::Create, &mut model, SyncOptions::new())
        .unwrap();

    assert_eq!(*calls.borrow(), vec![Method::Create]);
    assert_eq!(promise.try_take(), Some(Ok(json!({"remote": true}))));
}

#[test]
fn test_ajax_sync_forces_remote_even_with_store() {
    let (_, store) = memory_store("todos");
    let calls = Rc::new(RefCell::new(Vec::new()));
    let router = SyncRouter::new(SyncConfig::default(), recording_remote(calls.clone()));
    let mut model = Model::new(json!({"title": "a"})).with_store(store.clone());

    router.sync(Method::Update, &mut model, SyncOptions::new().ajax_sync(true));

    assert_eq!(*calls.borrow(), vec![Method::Update]);
    assert!(store.lock().is_empty());
}

#[test]
fn test_both_paths_stay_addressable() {
    let (_, store) = memory_store("todos");
    let calls = Rc::new(RefCell::new(Vec::new()));
    let router = SyncRouter::new(SyncConfig::default(), recording_remote(calls.clone()));
    let mut model = Model::new(json!({"id": "x"})).with_store(store.clone());

    router.remote_sync(Method::Read, &mut model, SyncOptions::new());
    router.local_sync(Method::Create, &mut model, SyncOptions::new());

    assert_eq!(*calls.borrow(), vec![Method::Read]);
    assert_eq!(store.lock().ids(), ["x"]);
}

#[test]
fn test_local_sync_without_store_fails_cleanly() {
    let router = SyncRouter::new(SyncConfig::default(), remote_fn(|_, _, _| None));
    let log = Log::default();
    let mut model = Model::new(json!({"id": "x"}));
    assert!(model.resolve_store().is_none());

    router.local_sync(Method::Read, &mut model, recording_options(&log));

    let log = log.borrow();
    assert_eq!(log.error.as_deref(), Some(RECORD_NOT_FOUND_MESSAGE));
    assert_eq!(log.events, vec!["error", "complete"]);
}
