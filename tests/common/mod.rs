//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use flux_sandbox::config::SandboxConfig;
use flux_sandbox::lifecycle::{build_service_with_store, Shutdown};
use flux_sandbox::storage::TextStore;
use flux_sandbox::{FetchService, HttpServer};

/// A running mock backend.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start a mock backend that always answers 200 with `response`.
pub async fn start_mock_backend(response: &'static str) -> MockBackend {
    start_programmable_backend(move |_path| async move { (200, response.to_string()) }).await
}

/// Start a backend whose answer is computed per request from the path.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockBackend
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let f = Arc::new(f);

    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        let (read_half, mut write_half) = socket.into_split();
                        let mut reader = BufReader::new(read_half);

                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.is_err() {
                            return;
                        }
                        // Drain headers up to the blank line.
                        loop {
                            let mut line = String::new();
                            match reader.read_line(&mut line).await {
                                Ok(0) => break,
                                Ok(_) if line == "\r\n" || line == "\n" => break,
                                Ok(_) => continue,
                                Err(_) => return,
                            }
                        }
                        counter.fetch_add(1, Ordering::SeqCst);

                        let path = request_line
                            .split_whitespace()
                            .nth(1)
                            .unwrap_or("/")
                            .to_string();
                        let (status, body) = f(path).await;

                        let response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\n\
                             Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason(status),
                            body.len(),
                            body
                        );
                        let _ = write_half.write_all(response.as_bytes()).await;
                        let _ = write_half.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockBackend { addr, hits }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// A port nothing listens on.
pub async fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Config pointing at `backend`, tuned for tests.
pub fn test_config(backend: SocketAddr) -> SandboxConfig {
    let mut config = SandboxConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.host = backend.ip().to_string();
    config.upstream.port = backend.port();
    config.upstream.timeout_ms = 2_000;
    config.circuit_breaker.slow_call_duration_threshold_ms = 5_000;
    config.database.url = "sqlite::memory:".into();
    config.observability.metrics_enabled = false;
    config
}

/// Facade over an in-memory store.
pub async fn test_service(config: &SandboxConfig) -> FetchService {
    let store = TextStore::in_memory().await.unwrap();
    build_service_with_store(config, store).unwrap()
}

/// A sandbox server listening on an ephemeral port.
pub struct RunningSandbox {
    pub addr: SocketAddr,
    pub service: FetchService,
    pub shutdown: Shutdown,
}

impl RunningSandbox {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningSandbox {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_sandbox(config: SandboxConfig) -> RunningSandbox {
    let service = test_service(&config).await;
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, service.clone());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningSandbox {
        addr,
        service,
        shutdown,
    }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
