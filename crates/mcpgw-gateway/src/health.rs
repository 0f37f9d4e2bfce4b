//! Health Monitor - on-demand concurrent reachability probes

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use mcpgw_core::{
    Downstream, Failure, GatewayInfo, HealthReport, Registry, ServerDescriptor, ServerHealth,
    ServerStatus,
};
use tracing::{debug, info};

/// Probes every registered server and composes a [`HealthReport`]
///
/// Each probe is bounded by `probe_timeout` regardless of how the
/// downstream transport is configured, so one hung server delays the
/// report by at most that bound.
pub struct HealthMonitor {
    registry: Arc<Registry>,
    downstream: Arc<dyn Downstream>,
    gateway: GatewayInfo,
    probe_timeout: Duration,
}

impl HealthMonitor {
    pub fn new(
        registry: Arc<Registry>,
        downstream: Arc<dyn Downstream>,
        gateway: GatewayInfo,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            downstream,
            gateway,
            probe_timeout,
        }
    }

    /// Probe all servers concurrently. Never cached.
    pub async fn check_health(&self) -> HealthReport {
        let probes = self
            .registry
            .list_all()
            .iter()
            .map(|server| self.probe(server));
        let per_server = join_all(probes).await;

        let report = HealthReport::compose(self.gateway.clone(), per_server);
        info!(
            overall = ?report.overall,
            servers = report.per_server.len(),
            "Health check complete"
        );
        report
    }

    async fn probe(&self, server: &ServerDescriptor) -> ServerHealth {
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.probe_timeout, self.downstream.probe(server))
            .await
            .unwrap_or_else(|_| {
                Err(Failure::timed_out(
                    &server.name,
                    self.probe_timeout.as_millis(),
                ))
            });
        let latency_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => ServerHealth {
                server: server.name.clone(),
                status: ServerStatus::Up,
                latency_ms,
                last_error: None,
            },
            Err(failure) => {
                debug!(server = %server.name, kind = %failure.kind, latency_ms, "Probe failed");
                ServerHealth {
                    server: server.name.clone(),
                    status: ServerStatus::Down,
                    latency_ms,
                    last_error: Some(failure.message),
                }
            }
        }
    }
}
