//! Policy-routed tool calls

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use mcpgw_core::{Failure, InvocationResult};
use mcpgw_gateway::{RoutePreview, ToolCall, ToolCallOutcome};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::handlers::invoke::Outcome;
use crate::state::AppState;

/// POST /proxy/tools/call
pub async fn call_tool(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Outcome<ToolCallOutcome> {
    let request_id = Uuid::new_v4();

    let outcome = match serde_json::from_slice::<ToolCall>(&body) {
        Ok(call) => {
            let span = info_span!("tool_call", %request_id, tool = %call.tool_name);
            state
                .gateway()
                .call_tool(call, state.target_header(&headers))
                .instrument(span)
                .await
        }
        Err(_) => ToolCallOutcome {
            server: None,
            method: None,
            result: InvocationResult::failure(Failure::invalid_params(
                "body must be {\"tool_name\": string, \"arguments\"?: object}",
            )),
        },
    };

    Outcome {
        status: outcome.result.status_code(),
        body: outcome,
        request_id,
    }
}

/// GET /proxy/route/{tool_name}
pub async fn preview_route(
    State(state): State<AppState>,
    Path(tool_name): Path<String>,
    headers: HeaderMap,
) -> Json<RoutePreview> {
    Json(
        state
            .gateway()
            .preview(&tool_name, state.target_header(&headers)),
    )
}
