//! Tool dispatch - a routing policy in front of the request router
//!
//! Clients that only know a flat tool name (`github_create_issue`) go
//! through here. The configured [`RoutingPolicy`] picks the server and
//! method, then the call is an ordinary [`InvocationRequest`].

use std::sync::Arc;

use mcpgw_core::{
    Failure, InvocationRequest, InvocationResult, Params, Registry, Resolution, RouteHints,
    RoutingPolicy, RoutingStrategy,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::router::RequestRouter;

/// A tool call as sent by an agent client
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    #[serde(default)]
    pub arguments: Params,
}

/// Result of a tool call, labelled with where it was routed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCallOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(flatten)]
    pub result: InvocationResult,
}

/// Where a tool name would be routed, without calling anything
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePreview {
    pub tool_name: String,
    pub routed_to: Option<String>,
    pub method: Option<String>,
    pub strategy: RoutingStrategy,
    pub is_valid_server: bool,
}

pub struct ToolDispatcher {
    registry: Arc<Registry>,
    policy: Box<dyn RoutingPolicy>,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<Registry>, policy: Box<dyn RoutingPolicy>) -> Self {
        Self { registry, policy }
    }

    pub fn strategy(&self) -> RoutingStrategy {
        self.policy.strategy()
    }

    pub fn resolve(&self, hints: &RouteHints<'_>) -> Option<Resolution> {
        self.policy.resolve(hints, &self.registry)
    }

    pub fn preview(&self, tool_name: &str, target_header: Option<&str>) -> RoutePreview {
        let hints = RouteHints::tool(tool_name).with_header(target_header);
        let resolution = self.resolve(&hints);

        RoutePreview {
            tool_name: tool_name.to_string(),
            is_valid_server: resolution.is_some(),
            routed_to: resolution.as_ref().map(|r| r.server.clone()),
            method: resolution.map(|r| r.method),
            strategy: self.strategy(),
        }
    }

    /// Resolve the tool and hand the call to the router
    pub async fn dispatch(
        &self,
        router: &RequestRouter,
        call: ToolCall,
        target_header: Option<&str>,
    ) -> ToolCallOutcome {
        let hints = RouteHints::tool(&call.tool_name).with_header(target_header);

        let Some(Resolution { server, method }) = self.resolve(&hints) else {
            debug!(tool = %call.tool_name, strategy = %self.strategy(), "Tool not routable");
            return ToolCallOutcome {
                server: None,
                method: None,
                result: InvocationResult::failure(Failure::unroutable(&call.tool_name)),
            };
        };

        debug!(tool = %call.tool_name, server = %server, method = %method, "Routing tool call");
        let result = router
            .route(InvocationRequest::new(
                server.clone(),
                method.clone(),
                call.arguments,
            ))
            .await;

        ToolCallOutcome {
            server: Some(server),
            method: Some(method),
            result,
        }
    }
}
