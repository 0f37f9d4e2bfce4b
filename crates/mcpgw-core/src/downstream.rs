//! Downstream trait - the seam between the gateway and its tool servers

use async_trait::async_trait;

use crate::error::Failure;
use crate::models::{InvocationResult, MethodDescriptor, Params, ServerDescriptor};

/// Result type for downstream calls
pub type DownstreamResult<T> = Result<T, Failure>;

/// Transport to a downstream tool server
///
/// The HTTP implementation lives in `mcpgw-client`; tests substitute
/// in-memory mocks. Every call is stateless and must complete (or fail)
/// within the implementation's own timeout.
#[async_trait]
pub trait Downstream: Send + Sync {
    /// Fetch the server's current method list
    async fn discover(&self, server: &ServerDescriptor) -> DownstreamResult<Vec<MethodDescriptor>>;

    /// Invoke one method with the given params
    async fn invoke(&self, server: &ServerDescriptor, method: &str, params: Params)
        -> InvocationResult;

    /// Liveness probe. Defaults to a discovery call whose payload is discarded.
    async fn probe(&self, server: &ServerDescriptor) -> DownstreamResult<()> {
        self.discover(server).await.map(|_| ())
    }
}
