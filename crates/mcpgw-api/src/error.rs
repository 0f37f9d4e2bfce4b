//! API error types and conversions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mcpgw_core::{Failure, Origin};
use serde::Serialize;

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 404 for paths that exist only for other verbs or names
    NotFound(String),
    /// A per-request failure, status taken from its kind
    Failure(Failure),
}

/// Error body, shaped like a serialized [`Failure`]
#[derive(Serialize)]
struct ErrorResponse<'a> {
    kind: &'a str,
    message: &'a str,
    origin: Origin,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message, origin) = match &self {
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                "not_found",
                message.as_str(),
                Origin::Gateway,
            ),
            ApiError::Failure(failure) => (
                status_of(failure),
                failure.kind.as_str(),
                failure.message.as_str(),
                failure.origin,
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = kind, %message, "API error");
        } else if status.is_client_error() {
            tracing::debug!(error = kind, %message, "API client error");
        }

        let body = Json(ErrorResponse {
            kind,
            message,
            origin,
        });

        (status, body).into_response()
    }
}

impl From<Failure> for ApiError {
    fn from(failure: Failure) -> Self {
        ApiError::Failure(failure)
    }
}

/// HTTP status for a failure
pub fn status_of(failure: &Failure) -> StatusCode {
    StatusCode::from_u16(failure.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
