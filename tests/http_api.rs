//! End-to-end tests of the HTTP surface.

mod common;

use serde_json::Value;

use common::{
    http_client, start_mock_backend, start_programmable_backend, start_sandbox, test_config,
};
use flux_sandbox::http::{ExecutionStyle, X_REQUEST_ID};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_every_style_fetches_and_stores() {
    let backend = start_mock_backend("{\"value\":42}").await;
    let sandbox = start_sandbox(test_config(backend.addr)).await;
    let client = http_client();

    for style in ExecutionStyle::ALL {
        let res = client
            .get(sandbox.url(&format!("/{style}/value")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200, "fetch via {style}");
        assert_eq!(res.headers()["content-type"], "application/json");
        assert_eq!(res.text().await.unwrap(), "{\"value\":42}");

        let res = client
            .get(sandbox.url(&format!("/{style}/value/store")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200, "store via {style}");
        assert!(res.text().await.unwrap().starts_with("inserted id "));
    }

    let all: Vec<Value> = client
        .get(sandbox.url("/db/all"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), ExecutionStyle::ALL.len());
    assert_eq!(all[0]["someText"], "{\"value\":42}");
    assert!(all[0]["id"].is_i64());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_style_is_not_found() {
    let backend = start_mock_backend("ok").await;
    let sandbox = start_sandbox(test_config(backend.addr)).await;
    let client = http_client();

    let res = client.get(sandbox.url("/turbo/op")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let res = client.get(sandbox.url("/single/turbo")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(backend.hits(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_remote_not_found_maps_to_404() {
    let backend = start_programmable_backend(|_| async { (404, String::new()) }).await;
    let sandbox = start_sandbox(test_config(backend.addr)).await;
    let client = http_client();

    let res = client
        .get(sandbox.url("/blocking/missing/store"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(sandbox.service.store().count().await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_open_breaker_maps_to_500() {
    let backend = start_programmable_backend(|_| async { (500, String::new()) }).await;
    let sandbox = start_sandbox(test_config(backend.addr)).await;
    let client = http_client();

    for _ in 0..3 {
        let res = client.get(sandbox.url("/flux/op")).send().await.unwrap();
        assert_eq!(res.status(), 500);
    }
    assert_eq!(backend.hits(), 2);

    let breaker: Value = client
        .get(sandbox.url("/actuator/circuitbreaker"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(breaker["name"], "upstream");
    assert_eq!(breaker["state"], "OPEN");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fill_and_clear() {
    let backend = start_mock_backend("ok").await;
    let sandbox = start_sandbox(test_config(backend.addr)).await;
    let client = http_client();

    let res = client.get(sandbox.url("/fill-with-test/3")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(sandbox.service.store().count().await.unwrap(), 3);

    let res = client.get(sandbox.url("/fill-with-test/0")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(sandbox.service.store().count().await.unwrap(), 4);

    let res = client.get(sandbox.url("/db/clear")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let all: Vec<Value> = client
        .get(sandbox.url("/db/all"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ping_endpoints() {
    let backend = start_mock_backend("ok").await;
    let sandbox = start_sandbox(test_config(backend.addr)).await;
    let client = http_client();

    let single: Value = client
        .get(sandbox.url("/single/coroutine"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(single["name"], "First");
    assert!(single["id"].is_i64());

    let list: Vec<Value> = client
        .get(sandbox.url("/list/mixed"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<_> = list.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["First", "Second", "Third"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_health_and_request_id() {
    let backend = start_mock_backend("ok").await;
    let sandbox = start_sandbox(test_config(backend.addr)).await;
    let client = http_client();

    let res = client.get(sandbox.url("/actuator/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let generated = res.headers().get(X_REQUEST_ID).cloned();
    assert!(generated.is_some());
    let health: Value = res.json().await.unwrap();
    assert_eq!(health["status"], "UP");

    let res = client
        .get(sandbox.url("/actuator/health"))
        .header(X_REQUEST_ID, "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()[X_REQUEST_ID], "abc-123");
}
