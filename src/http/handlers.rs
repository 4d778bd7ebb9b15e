//! Fetch and storage endpoints.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use futures_util::TryStreamExt;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::http::style::ExecutionStyle;
use crate::storage::TextRecord;

/// `GET /{style}/{operation}`: remote body passed through as JSON.
pub async fn fetch(
    State(state): State<AppState>,
    Path((style, operation)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let style: ExecutionStyle = style.parse()?;
    let service = state.service.clone();

    tracing::debug!(style = %style, operation = %operation, "Fetching");
    let body = style
        .run(async move { service.fetch(&operation).await })
        .await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// `GET /{style}/{operation}/store`: fetch, persist, report the id.
pub async fn fetch_and_store(
    State(state): State<AppState>,
    Path((style, operation)): Path<(String, String)>,
) -> Result<String, ApiError> {
    let style: ExecutionStyle = style.parse()?;
    let service = state.service.clone();

    tracing::debug!(style = %style, operation = %operation, "Fetching and storing");
    let id = style
        .run(async move { service.fetch_and_store(&operation).await })
        .await?;

    Ok(format!("inserted id {id}"))
}

/// `GET /db/all`
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<TextRecord>>, ApiError> {
    let records: Vec<TextRecord> = state.service.list_all().try_collect().await?;
    Ok(Json(records))
}

/// `GET /db/clear`
pub async fn clear(State(state): State<AppState>) -> Result<(), ApiError> {
    state.service.clear().await?;
    Ok(())
}

/// `GET /fill-with-test/{how_many}`; non-positive counts insert one record.
pub async fn fill_with_test(
    State(state): State<AppState>,
    Path(how_many): Path<i64>,
) -> Result<(), ApiError> {
    let count = usize::try_from(how_many.max(1)).unwrap_or(1);
    state.service.fill_with_samples(count).await?;
    Ok(())
}
