//! Error taxonomy shared by every gateway layer
//!
//! Per-request failures are values ([`Failure`]) carried inside an
//! [`InvocationResult`](crate::InvocationResult) so they can cross the HTTP
//! boundary without losing their provenance. Startup problems are
//! [`ConfigError`]s and are fatal.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable classification of a per-request failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The requested server name is not registered
    UnknownServer,
    /// The downstream server did not answer in time or refused the connection
    Unreachable,
    /// The downstream answered with a body that does not match the protocol
    ProtocolViolation,
    /// The downstream explicitly reported an error
    DownstreamError,
    /// The inbound request body could not be used as invocation params
    InvalidParams,
}

impl ErrorKind {
    /// Wire tag for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnknownServer => "unknown_server",
            ErrorKind::Unreachable => "unreachable",
            ErrorKind::ProtocolViolation => "protocol_violation",
            ErrorKind::DownstreamError => "downstream_error",
            ErrorKind::InvalidParams => "invalid_params",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the gateway produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Detected by the gateway itself (routing, transport, parsing)
    Gateway,
    /// Reported by the downstream server
    Downstream,
}

/// A normalized per-request failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{kind}: {message}")]
pub struct Failure {
    /// Failure classification
    pub kind: ErrorKind,
    /// Human-readable message, safe to show to clients
    pub message: String,
    /// Side that produced the failure
    pub origin: Origin,
    /// Set when an `Unreachable` failure was caused by a timeout
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub timeout: bool,
}

impl Failure {
    fn new(kind: ErrorKind, origin: Origin, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            origin,
            timeout: false,
        }
    }

    /// The server name is not in the registry
    pub fn unknown_server(name: &str) -> Self {
        Self::new(
            ErrorKind::UnknownServer,
            Origin::Gateway,
            format!("Unknown MCP server: {}", name),
        )
    }

    /// No routing policy produced a registered server for a tool
    pub fn unroutable(tool_name: &str) -> Self {
        Self::new(
            ErrorKind::UnknownServer,
            Origin::Gateway,
            format!("No MCP server found for tool: {}", tool_name),
        )
    }

    /// The downstream refused the connection or could not be reached
    pub fn unreachable(server: &str) -> Self {
        Self::new(
            ErrorKind::Unreachable,
            Origin::Gateway,
            format!("MCP server '{}' is not reachable", server),
        )
    }

    /// The downstream did not answer within `timeout_ms`
    pub fn timed_out(server: &str, timeout_ms: u128) -> Self {
        Self {
            timeout: true,
            ..Self::new(
                ErrorKind::Unreachable,
                Origin::Gateway,
                format!(
                    "MCP server '{}' did not respond within {}ms",
                    server, timeout_ms
                ),
            )
        }
    }

    /// The downstream answered with an unexpected body shape
    pub fn protocol_violation(server: &str, detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::ProtocolViolation,
            Origin::Gateway,
            format!("MCP server '{}' sent an invalid response: {}", server, detail),
        )
    }

    /// The downstream reported an error of its own
    pub fn downstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DownstreamError, Origin::Downstream, message)
    }

    /// The inbound params were malformed
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParams, Origin::Gateway, message)
    }

    /// HTTP status the Gateway Front answers with for this failure
    pub fn status_code(&self) -> u16 {
        match self.kind {
            ErrorKind::UnknownServer => 404,
            ErrorKind::InvalidParams => 400,
            ErrorKind::Unreachable if self.timeout => 504,
            ErrorKind::Unreachable => 502,
            ErrorKind::ProtocolViolation => 500,
            ErrorKind::DownstreamError => 500,
        }
    }
}

/// Startup-time configuration errors. Fatal: the gateway never serves
/// traffic with an invalid registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two registry entries share a name
    #[error("Duplicate server name: {0}")]
    DuplicateServer(String),

    /// A registry entry is malformed
    #[error("Invalid server entry '{name}': {reason}")]
    InvalidServer { name: String, reason: String },

    /// The routing default names a server that is not registered
    #[error("Default server '{0}' is not registered")]
    UnknownDefaultServer(String),

    /// The config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config file could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(String),
}
