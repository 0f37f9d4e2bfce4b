//! Direct invocation handler

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use mcpgw_core::{Failure, InvocationRequest, InvocationResult, Params};
use serde::Serialize;
use serde_json::Value;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A JSON body answered with the status its invocation result maps to
pub struct Outcome<T> {
    pub status: u16,
    pub body: T,
    pub request_id: Uuid,
}

impl<T: Serialize> IntoResponse for Outcome<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.body)).into_response();
        if let Ok(value) = HeaderValue::from_str(&self.request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
}

/// Parse an invocation body. Empty means no params; anything else must be
/// a JSON object.
pub fn parse_params(body: &[u8]) -> Result<Params, Failure> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Params::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(params)) => Ok(params),
        Ok(_) => Err(Failure::invalid_params("params must be a JSON object")),
        Err(_) => Err(Failure::invalid_params("request body is not valid JSON")),
    }
}

/// POST /proxy/{server}/mcp/{method}
pub async fn invoke_method(
    State(state): State<AppState>,
    Path((server, method)): Path<(String, String)>,
    body: Bytes,
) -> Outcome<InvocationResult> {
    let request_id = Uuid::new_v4();
    let span = info_span!("invoke", %request_id, server = %server, method = %method);

    let result = async {
        match parse_params(&body) {
            Ok(params) => {
                state
                    .gateway()
                    .route(InvocationRequest::new(server, method, params))
                    .await
            }
            Err(failure) => {
                tracing::debug!(message = %failure.message, "Rejected invocation body");
                InvocationResult::failure(failure)
            }
        }
    }
    .instrument(span)
    .await;

    Outcome {
        status: result.status_code(),
        body: result,
        request_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpgw_core::ErrorKind;

    #[test]
    fn empty_body_is_empty_params() {
        assert!(parse_params(b"").unwrap().is_empty());
        assert!(parse_params(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn object_body_is_params() {
        let params = parse_params(br#"{"path": "/projects"}"#).unwrap();
        assert_eq!(params["path"], "/projects");
    }

    #[test]
    fn malformed_body_is_invalid_params() {
        for body in [&b"{not json"[..], b"[1, 2]", b"\"text\"", b"null"] {
            let failure = parse_params(body).unwrap_err();
            assert_eq!(failure.kind, ErrorKind::InvalidParams);
            assert_eq!(failure.status_code(), 400);
        }
    }
}
