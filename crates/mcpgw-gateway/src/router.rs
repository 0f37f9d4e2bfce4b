//! Request Router - resolve a server name, then dispatch

use std::sync::Arc;
use std::time::Instant;

use mcpgw_core::{Downstream, Failure, InvocationRequest, InvocationResult, Registry};
use tracing::{debug, info, warn};

/// Pure dispatch step between the HTTP front and the downstream client
///
/// Resolution is the only thing the router adds. Method names are not
/// checked against a catalog; each server is authoritative over its own
/// methods.
pub struct RequestRouter {
    registry: Arc<Registry>,
    downstream: Arc<dyn Downstream>,
}

impl RequestRouter {
    pub fn new(registry: Arc<Registry>, downstream: Arc<dyn Downstream>) -> Self {
        Self {
            registry,
            downstream,
        }
    }

    /// Route one request. Unknown servers fail without a network call.
    pub async fn route(&self, request: InvocationRequest) -> InvocationResult {
        let InvocationRequest {
            server,
            method,
            params,
        } = request;

        let Some(descriptor) = self.registry.lookup(&server) else {
            debug!(server = %server, method = %method, "Unknown server");
            return InvocationResult::failure(Failure::unknown_server(&server));
        };

        let started = Instant::now();
        let result = self.downstream.invoke(descriptor, &method, params).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match result.error() {
            None => info!(server = %server, method = %method, latency_ms, "Invocation succeeded"),
            Some(error) => warn!(
                server = %server,
                method = %method,
                latency_ms,
                kind = %error.kind,
                "Invocation failed"
            ),
        }

        result
    }
}
