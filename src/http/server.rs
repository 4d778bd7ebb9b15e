//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Serve on a bound listener until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::SandboxConfig;
use crate::http::{actuator, handlers, ping, request};
use crate::http::ping::IdGenerator;
use crate::observability::metrics;
use crate::service::FetchService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: FetchService,
    pub ids: Arc<IdGenerator>,
}

/// HTTP server for the sandbox.
pub struct HttpServer {
    router: Router,
    config: SandboxConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: SandboxConfig, service: FetchService) -> Self {
        let state = AppState {
            service,
            ids: Arc::new(IdGenerator::default()),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &SandboxConfig, state: AppState) -> Router {
        Router::new()
            .route("/db/all", get(handlers::list_all))
            .route("/db/clear", get(handlers::clear))
            .route("/fill-with-test/{how_many}", get(handlers::fill_with_test))
            .route("/single/{style}", get(ping::single))
            .route("/list/{style}", get(ping::list))
            .route("/actuator/health", get(actuator::health))
            .route("/actuator/circuitbreaker", get(actuator::circuit_breaker))
            .route("/{style}/{operation}", get(handlers::fetch))
            .route("/{style}/{operation}/store", get(handlers::fetch_and_store))
            .with_state(state)
            .layer(middleware::from_fn(track_metrics))
            .layer(
                ServiceBuilder::new()
                    .layer(request::set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(request::make_request_span))
                    .layer(request::propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The router, for driving the server in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(route, response.status().as_u16(), start);
    response
}
