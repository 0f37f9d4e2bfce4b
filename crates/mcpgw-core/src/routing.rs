//! Routing policies for tool calls that do not name their server.
//!
//! A policy turns a bare tool name (plus request hints) into a
//! `(server, method)` pair before the request router sees it. The router
//! itself never consults a policy; it only resolves explicit server names.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::registry::Registry;

/// Which policy resolves tool calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingStrategy {
    /// `github_create_issue` routes to `github`
    #[default]
    Prefix,
    /// A request header names the server
    Header,
    /// Everything goes to the default server
    Default,
}

impl fmt::Display for RoutingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoutingStrategy::Prefix => "prefix",
            RoutingStrategy::Header => "header",
            RoutingStrategy::Default => "default",
        })
    }
}

/// Inputs a policy may use to pick a server
#[derive(Debug, Clone, Copy)]
pub struct RouteHints<'a> {
    /// Tool name as sent by the client
    pub tool_name: &'a str,
    /// Value of the target-server header, if present
    pub target_header: Option<&'a str>,
}

impl<'a> RouteHints<'a> {
    pub fn tool(tool_name: &'a str) -> Self {
        Self {
            tool_name,
            target_header: None,
        }
    }

    pub fn with_header(mut self, target: Option<&'a str>) -> Self {
        self.target_header = target;
        self
    }
}

/// A resolved routing target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub server: String,
    pub method: String,
}

/// Strategy consulted in front of the request router
pub trait RoutingPolicy: Send + Sync {
    fn strategy(&self) -> RoutingStrategy;

    /// Pick a target, or `None` when no registered server applies
    fn resolve(&self, hints: &RouteHints<'_>, registry: &Registry) -> Option<Resolution>;
}

/// Split `"server<delim>method"` at the first delimiter.
///
/// ```
/// # use mcpgw_core::routing::split_tool_prefix;
/// assert_eq!(split_tool_prefix("github_create_issue", "_"), Some(("github", "create_issue")));
/// assert_eq!(split_tool_prefix("ping", "_"), None);
/// ```
pub fn split_tool_prefix<'a>(tool_name: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    if delimiter.is_empty() {
        return None;
    }
    tool_name.split_once(delimiter)
}

/// Strip `"server<delim>"` from a tool name, or return it unchanged.
///
/// ```
/// # use mcpgw_core::routing::strip_server_prefix;
/// assert_eq!(strip_server_prefix("github_create_issue", "github", "_"), "create_issue");
/// assert_eq!(strip_server_prefix("create_issue", "github", "_"), "create_issue");
/// ```
pub fn strip_server_prefix<'a>(tool_name: &'a str, server: &str, delimiter: &str) -> &'a str {
    tool_name
        .strip_prefix(server)
        .and_then(|rest| rest.strip_prefix(delimiter))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(tool_name)
}

fn resolution(server: &str, tool_name: &str, delimiter: &str) -> Resolution {
    Resolution {
        server: server.to_string(),
        method: strip_server_prefix(tool_name, server, delimiter).to_string(),
    }
}

fn fallback(
    default_server: Option<&str>,
    hints: &RouteHints<'_>,
    registry: &Registry,
    delimiter: &str,
) -> Option<Resolution> {
    let server = default_server.filter(|name| registry.contains(name))?;
    debug!(tool = %hints.tool_name, server = %server, "Using default server");
    Some(resolution(server, hints.tool_name, delimiter))
}

/// Routes by the tool-name prefix before the delimiter
#[derive(Debug, Clone)]
pub struct PrefixPolicy {
    delimiter: String,
    default_server: Option<String>,
}

impl PrefixPolicy {
    pub fn new(delimiter: impl Into<String>, default_server: Option<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            default_server,
        }
    }
}

impl RoutingPolicy for PrefixPolicy {
    fn strategy(&self) -> RoutingStrategy {
        RoutingStrategy::Prefix
    }

    fn resolve(&self, hints: &RouteHints<'_>, registry: &Registry) -> Option<Resolution> {
        if let Some((prefix, method)) = split_tool_prefix(hints.tool_name, &self.delimiter) {
            if registry.contains(prefix) && !method.is_empty() {
                return Some(Resolution {
                    server: prefix.to_string(),
                    method: method.to_string(),
                });
            }
            debug!(tool = %hints.tool_name, prefix = %prefix, "Prefix does not name a registered server");
        }
        fallback(
            self.default_server.as_deref(),
            hints,
            registry,
            &self.delimiter,
        )
    }
}

/// Routes by the target-server header
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    delimiter: String,
    default_server: Option<String>,
}

impl HeaderPolicy {
    pub fn new(delimiter: impl Into<String>, default_server: Option<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            default_server,
        }
    }
}

impl RoutingPolicy for HeaderPolicy {
    fn strategy(&self) -> RoutingStrategy {
        RoutingStrategy::Header
    }

    fn resolve(&self, hints: &RouteHints<'_>, registry: &Registry) -> Option<Resolution> {
        match hints.target_header {
            Some(target) if registry.contains(target) => {
                Some(resolution(target, hints.tool_name, &self.delimiter))
            }
            _ => fallback(
                self.default_server.as_deref(),
                hints,
                registry,
                &self.delimiter,
            ),
        }
    }
}

/// Sends every tool call to the default server
#[derive(Debug, Clone)]
pub struct DefaultPolicy {
    delimiter: String,
    default_server: Option<String>,
}

impl DefaultPolicy {
    pub fn new(delimiter: impl Into<String>, default_server: Option<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            default_server,
        }
    }
}

impl RoutingPolicy for DefaultPolicy {
    fn strategy(&self) -> RoutingStrategy {
        RoutingStrategy::Default
    }

    fn resolve(&self, hints: &RouteHints<'_>, registry: &Registry) -> Option<Resolution> {
        fallback(
            self.default_server.as_deref(),
            hints,
            registry,
            &self.delimiter,
        )
    }
}

/// Build the policy for a strategy
pub fn policy_for(
    strategy: RoutingStrategy,
    delimiter: &str,
    default_server: Option<String>,
) -> Box<dyn RoutingPolicy> {
    match strategy {
        RoutingStrategy::Prefix => Box::new(PrefixPolicy::new(delimiter, default_server)),
        RoutingStrategy::Header => Box::new(HeaderPolicy::new(delimiter, default_server)),
        RoutingStrategy::Default => Box::new(DefaultPolicy::new(delimiter, default_server)),
    }
}
