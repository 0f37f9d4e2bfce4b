//! Gateway facade - wires registry, transport and components together

use std::sync::Arc;

use mcpgw_core::{
    Catalog, ConfigError, Downstream, DownstreamResult, GatewayConfig, GatewayInfo, HealthReport,
    InvocationRequest, InvocationResult, MethodDescriptor, Registry,
};
use tracing::info;

use crate::aggregator::MethodAggregator;
use crate::dispatch::{RoutePreview, ToolCall, ToolCallOutcome, ToolDispatcher};
use crate::health::HealthMonitor;
use crate::router::RequestRouter;

/// The assembled gateway
///
/// Built once at startup from a validated configuration and shared
/// read-only by every request handler.
pub struct Gateway {
    info: GatewayInfo,
    config: GatewayConfig,
    registry: Arc<Registry>,
    router: RequestRouter,
    aggregator: MethodAggregator,
    health: HealthMonitor,
    dispatcher: ToolDispatcher,
}

impl Gateway {
    /// Validate `config` and assemble the components around `downstream`
    pub fn new(config: GatewayConfig, downstream: Arc<dyn Downstream>) -> Result<Self, ConfigError> {
        let registry = Arc::new(config.registry()?);
        let info = GatewayInfo {
            name: config.server.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        };

        info!(
            servers = registry.len(),
            strategy = %config.routing.strategy,
            "Gateway assembled"
        );

        Ok(Self {
            router: RequestRouter::new(registry.clone(), downstream.clone()),
            aggregator: MethodAggregator::new(registry.clone(), downstream.clone()),
            health: HealthMonitor::new(
                registry.clone(),
                downstream,
                info.clone(),
                config.downstream.health_timeout(),
            ),
            dispatcher: ToolDispatcher::new(registry.clone(), config.routing.policy()),
            info,
            config,
            registry,
        })
    }

    pub fn info(&self) -> &GatewayInfo {
        &self.info
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// Header the `header` routing strategy reads
    pub fn target_header(&self) -> &str {
        &self.config.routing.header_name
    }

    pub async fn route(&self, request: InvocationRequest) -> InvocationResult {
        self.router.route(request).await
    }

    pub async fn aggregate(&self) -> Catalog {
        self.aggregator.aggregate().await
    }

    pub async fn discover(&self, server: &str) -> DownstreamResult<Vec<MethodDescriptor>> {
        self.aggregator.discover_one(server).await
    }

    pub async fn check_health(&self) -> HealthReport {
        self.health.check_health().await
    }

    pub async fn call_tool(&self, call: ToolCall, target_header: Option<&str>) -> ToolCallOutcome {
        self.dispatcher
            .dispatch(&self.router, call, target_header)
            .await
    }

    pub fn preview(&self, tool_name: &str, target_header: Option<&str>) -> RoutePreview {
        self.dispatcher.preview(tool_name, target_header)
    }
}
