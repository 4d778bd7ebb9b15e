//! Error-to-status mapping.
//!
//! - not found (remote 4xx, unknown style) → 404
//! - anything unavailable (breaker, timeout, remote 5xx, storage) → 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::http::style::UnknownStyle;
use crate::service::ServiceError;

/// Failure of an HTTP handler.
#[derive(Debug)]
pub enum ApiError {
    UnknownStyle(UnknownStyle),
    Service(ServiceError),
}

impl From<UnknownStyle> for ApiError {
    fn from(err: UnknownStyle) -> Self {
        ApiError::UnknownStyle(err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::UnknownStyle(e) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
            ApiError::Service(e) if e.is_not_found() => {
                tracing::debug!(error = %e, "Remote resource not found");
                (StatusCode::NOT_FOUND, e.to_string()).into_response()
            }
            ApiError::Service(e) => {
                tracing::error!(error = %e, kind = e.kind(), "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        }
    }
}
