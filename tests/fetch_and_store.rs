//! Fetch-and-store through the facade with a real remote and store.

mod common;

use std::collections::HashSet;

use futures_util::TryStreamExt;

use common::{start_mock_backend, start_programmable_backend, test_config, test_service};
use flux_sandbox::storage::{StoreError, MAX_CONTENT_CHARS};
use flux_sandbox::ServiceError;

#[tokio::test]
async fn test_fetched_body_is_stored() {
    let backend = start_mock_backend("hello").await;
    let service = test_service(&test_config(backend.addr)).await;

    let id = service.fetch_and_store("ok-op").await.unwrap();

    let records: Vec<_> = service.list_all().try_collect().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, Some(id));
    assert_eq!(records[0].some_text, "hello");
}

#[tokio::test]
async fn test_remote_not_found_stores_nothing() {
    let backend = start_programmable_backend(|path| async move {
        if path == "/missing" {
            (404, String::new())
        } else {
            (200, "present".to_string())
        }
    })
    .await;
    let service = test_service(&test_config(backend.addr)).await;

    service.fetch_and_store("present").await.unwrap();
    let err = service.fetch_and_store("missing").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(service.store().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_long_body_is_truncated() {
    let body: &'static str = Box::leak("é".repeat(250).into_boxed_str());
    let backend = start_mock_backend(body).await;
    let service = test_service(&test_config(backend.addr)).await;

    service.fetch_and_store("long").await.unwrap();

    let records: Vec<_> = service.list_all().try_collect().await.unwrap();
    assert_eq!(records[0].some_text.chars().count(), MAX_CONTENT_CHARS);
}

#[tokio::test]
async fn test_fetch_without_store_leaves_store_untouched() {
    let backend = start_mock_backend("{\"a\":1}").await;
    let service = test_service(&test_config(backend.addr)).await;

    assert_eq!(service.fetch("json").await.unwrap(), "{\"a\":1}");
    assert_eq!(service.store().count().await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_stores_get_distinct_ids() {
    let backend = start_mock_backend("same").await;
    let service = test_service(&test_config(backend.addr)).await;

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.fetch_and_store("op").await })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap().unwrap());
    }

    assert_eq!(ids.len(), 50);
    assert_eq!(service.store().count().await.unwrap(), 50);
}

#[tokio::test]
async fn test_closed_store_is_unavailable_not_missing() {
    let backend = start_mock_backend("hello").await;
    let service = test_service(&test_config(backend.addr)).await;
    service.store().close().await;

    let err = service.fetch_and_store("op").await.unwrap_err();
    assert!(matches!(err, ServiceError::Storage(StoreError::Unavailable(_))));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_clear_then_fill() {
    let backend = start_mock_backend("x").await;
    let service = test_service(&test_config(backend.addr)).await;

    service.fetch_and_store("op").await.unwrap();
    assert_eq!(service.clear().await.unwrap(), 1);

    service.fill_with_samples(3).await.unwrap();
    let records: Vec<_> = service.list_all().try_collect().await.unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.windows(2).all(|w| w[0].id < w[1].id));
}
