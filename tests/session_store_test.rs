//! Integration tests for the persisted session store.
//!
//! A "restart" is modelled by opening a second store over the same storage
//! after flushing the first one.

mod common;

use common::{test_customer, test_restaurant};
use green_plate::adapters::{FileStorage, InMemoryStorage};
use green_plate::session::{SessionStore, STORAGE_KEY};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_set_user_survives_restart() {
    let storage = InMemoryStorage::new();

    let store = SessionStore::open(Arc::new(storage.clone())).await;
    store.set_loading(true);
    store.set_user(Some(test_customer()));
    store.flush().await;

    let restarted = SessionStore::open(Arc::new(storage.clone())).await;
    assert_eq!(restarted.user(), Some(test_customer()));
    // The loading flag is never persisted.
    assert!(!restarted.is_loading());
}

#[tokio::test]
async fn test_last_write_wins_across_restart() {
    let storage = InMemoryStorage::new();
    let store = SessionStore::open(Arc::new(storage.clone())).await;

    store.set_user(Some(test_customer()));
    store.set_user(Some(test_restaurant()));
    store.flush().await;

    let restarted = SessionStore::open(Arc::new(storage)).await;
    assert_eq!(restarted.user(), Some(test_restaurant()));
}

#[tokio::test]
async fn test_sign_out_is_idempotent_and_durable() {
    let storage = InMemoryStorage::new();
    let store = SessionStore::open(Arc::new(storage.clone())).await;
    store.set_user(Some(test_customer()));
    store.flush().await;
    assert!(storage.raw(STORAGE_KEY).is_some());

    store.sign_out();
    store.sign_out();
    store.flush().await;

    let session = store.snapshot();
    assert!(session.user.is_none());
    assert!(!session.is_loading);
    assert!(storage.raw(STORAGE_KEY).is_none());
    assert_eq!(store.persistence_failures(), 0);

    let restarted = SessionStore::open(Arc::new(storage)).await;
    assert!(!restarted.is_authenticated());
}

#[tokio::test]
async fn test_truncated_record_opens_signed_out() {
    let storage = InMemoryStorage::with_record(STORAGE_KEY, "{\"user\": {\"role\": \"customer\"}");
    let store = SessionStore::open(Arc::new(storage)).await;
    assert!(store.user().is_none());
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_partial_user_record_opens_signed_out() {
    let storage = InMemoryStorage::with_record(
        STORAGE_KEY,
        r#"{"user":{"role":"customer","id":"x"},"version":0}"#,
    );
    let store = SessionStore::open(Arc::new(storage)).await;
    assert!(store.user().is_none());
    assert!(!store.is_loading());
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_write_failures_do_not_reach_caller() {
    let storage = InMemoryStorage::new();
    storage.set_write_should_fail(true);
    let store = SessionStore::open(Arc::new(storage.clone())).await;

    store.set_user(Some(test_customer()));
    store.flush().await;

    // In memory the change is committed regardless.
    assert_eq!(store.user(), Some(test_customer()));
    assert_eq!(store.persistence_failures(), 1);
}

#[tokio::test]
async fn test_file_storage_round_trip() {
    let dir = TempDir::new().unwrap();

    let store = SessionStore::open(Arc::new(FileStorage::new(dir.path()))).await;
    store.set_user(Some(test_restaurant()));
    store.flush().await;
    drop(store);

    let restarted = SessionStore::open(Arc::new(FileStorage::new(dir.path()))).await;
    assert_eq!(restarted.user(), Some(test_restaurant()));

    restarted.sign_out();
    restarted.flush().await;
    let again = SessionStore::open(Arc::new(FileStorage::new(dir.path()))).await;
    assert!(again.user().is_none());
}
