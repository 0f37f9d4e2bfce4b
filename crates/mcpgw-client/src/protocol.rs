//! Downstream wire protocol
//!
//! Discovery answers `{"result": {"methods": [...]}}`, invocation answers
//! `{"result": <any>, "error": null}` or `{"result": null, "error": {...}}`.
//! Every body a downstream server sends passes through this module exactly
//! once before it reaches the rest of the gateway.

use mcpgw_core::{DownstreamResult, Failure, InvocationResult, MethodDescriptor, Params};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Longest downstream error message forwarded to clients
const MAX_MESSAGE_LEN: usize = 256;

/// Body of an invocation call
#[derive(Debug, Serialize)]
pub struct InvokeBody<'a> {
    pub method: &'a str,
    pub params: &'a Params,
}

#[derive(Debug, Deserialize)]
struct DiscoveryEnvelope {
    result: DiscoveryResult,
}

#[derive(Debug, Deserialize)]
struct DiscoveryResult {
    methods: Vec<MethodEntry>,
}

/// Servers list methods either by bare name or as objects
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MethodEntry {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl MethodEntry {
    fn into_descriptor(self, server: &str) -> MethodDescriptor {
        match self {
            MethodEntry::Name(name) => MethodDescriptor::new(name, server),
            MethodEntry::Detailed { name, description } => MethodDescriptor {
                name,
                owning_server: server.to_string(),
                description,
            },
        }
    }
}

/// Parse a 2xx discovery body
pub fn parse_methods(server: &str, body: &[u8]) -> DownstreamResult<Vec<MethodDescriptor>> {
    if let Some(message) = envelope_error(server, body) {
        return Err(Failure::downstream(message));
    }

    let envelope: DiscoveryEnvelope = serde_json::from_slice(body).map_err(|e| {
        debug!(server = %server, error = %e, "Malformed discovery body");
        Failure::protocol_violation(server, "expected {\"result\": {\"methods\": [...]}}")
    })?;

    let methods: Vec<MethodDescriptor> = envelope
        .result
        .methods
        .into_iter()
        .map(|entry| entry.into_descriptor(server))
        .collect();

    if methods.iter().any(|m| m.name.is_empty()) {
        return Err(Failure::protocol_violation(server, "empty method name"));
    }

    Ok(methods)
}

/// Parse a 2xx invocation body
pub fn parse_invocation(server: &str, body: &[u8]) -> InvocationResult {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            debug!(server = %server, error = %e, "Invocation body is not JSON");
            return InvocationResult::failure(Failure::protocol_violation(
                server,
                "response body is not JSON",
            ));
        }
    };

    let Value::Object(mut envelope) = value else {
        return InvocationResult::failure(Failure::protocol_violation(
            server,
            "response body is not an object",
        ));
    };

    match envelope.remove("error") {
        Some(Value::Null) | None => {}
        Some(error) => {
            return InvocationResult::failure(Failure::downstream(error_message(server, &error)));
        }
    }

    match envelope.remove("result") {
        Some(result) => InvocationResult::success(result),
        None => InvocationResult::failure(Failure::protocol_violation(
            server,
            "missing \"result\" field",
        )),
    }
}

/// Failure for a non-2xx downstream response
pub fn http_failure(status: u16, body: &[u8]) -> Failure {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| message_from_body(&value))
        .and_then(|message| sanitize(&message))
        .unwrap_or_else(|| format!("downstream server returned HTTP {}", status));
    Failure::downstream(message)
}

/// Message of a non-null `error` field in a 2xx envelope
fn envelope_error(server: &str, body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let error = value.get("error").filter(|e| !e.is_null())?;
    Some(error_message(server, error))
}

/// Sanitized message of an `error` value, generic when the server gave none
fn error_message(server: &str, error: &Value) -> String {
    message_from_error(error)
        .and_then(|message| sanitize(&message))
        .unwrap_or_else(|| format!("MCP server '{}' reported an error", server))
}

fn message_from_error(error: &Value) -> Option<String> {
    let message = match error {
        Value::String(message) => Some(message.clone()),
        Value::Object(fields) => fields
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };
    message.filter(|message| !message.trim().is_empty())
}

fn message_from_body(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(message_from_error)
        .or_else(|| body.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| body.get("detail").and_then(Value::as_str).map(str::to_string))
        .filter(|message| !message.trim().is_empty())
}

/// First non-blank line only, bounded length
fn sanitize(message: &str) -> Option<String> {
    let line = message.lines().map(str::trim).find(|line| !line.is_empty())?;
    Some(match line.char_indices().nth(MAX_MESSAGE_LEN) {
        Some((end, _)) => format!("{}...", &line[..end]),
        None => line.to_string(),
    })
}
