//! Stand-in remote dependency for local experiments.
//!
//! - `/slow-json`: a short JSON array dribbled out over about two seconds
//! - `/long-json`: a larger JSON document after a short pause
//! - anything else: 404

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use clap::Parser;
use futures_util::StreamExt;
use serde_json::json;
use uuid::Uuid;

const THROTTLE_PERIODS: usize = 20;
const THROTTLE_PERIOD: Duration = Duration::from_millis(100);
const LONG_JSON_DELAY: Duration = Duration::from_millis(69);

#[derive(Parser)]
#[command(name = "sample-server")]
#[command(about = "Slow and large JSON responses for exercising the sandbox")]
struct Args {
    #[arg(short, long, default_value_t = 9090)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sample_server=info".into()),
        )
        .init();

    let args = Args::parse();
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Sample server started");

    axum::serve(listener, app()).await?;
    Ok(())
}

fn app() -> Router {
    Router::new()
        .route("/slow-json", get(slow_json))
        .route("/long-json", get(long_json))
        .fallback(not_found)
}

async fn slow_json() -> Response {
    let body = short_json();
    let chunk_len = (body.len() / THROTTLE_PERIODS).max(1);
    let chunks: Vec<String> = body
        .as_bytes()
        .chunks(chunk_len)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect();

    let stream = futures_util::stream::iter(chunks).then(|chunk| async move {
        tokio::time::sleep(THROTTLE_PERIOD).await;
        Ok::<_, Infallible>(chunk)
    });

    json_response(Body::from_stream(stream))
}

async fn long_json() -> Response {
    tokio::time::sleep(LONG_JSON_DELAY).await;
    json_response(Body::from(long_json_body()))
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "use /slow-json or /long-json for more fun",
    )
        .into_response()
}

fn json_response(body: Body) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

fn short_json() -> String {
    let items: Vec<_> = (4..=8)
        .map(|id| json!({ "id": id, "someText": Uuid::new_v4().to_string() }))
        .collect();
    serde_json::Value::Array(items).to_string()
}

fn long_json_body() -> String {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();

    let people: Vec<_> = (0..6)
        .map(|index| {
            json!({
                "_id": format!("{now_ms}-{index}"),
                "index": index,
                "guid": Uuid::new_v4().to_string(),
                "isActive": index % 2 == 0,
                "balance": format!("${},{:03}.{:02}", 1 + index, 627 + index, 63),
                "age": 20 + index * 3,
                "eyeColor": if index % 3 == 0 { "brown" } else { "blue" },
                "about": "Laborum id qui eiusmod consequat amet magna voluptate veniam id. \
                          Elit proident laboris consectetur amet. Non do mollit in cillum \
                          excepteur nostrud in.",
                "tags": ["in", "occaecat", "est", "minim", "dolore", "magna"],
                "friends": (0..3)
                    .map(|id| json!({ "id": id, "name": format!("Friend {index}-{id}") }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();

    serde_json::to_string_pretty(&people).unwrap_or_default()
}
