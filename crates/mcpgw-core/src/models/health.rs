//! Health report models

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

/// Aggregate health of the gateway's downstream set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Every server answered its probe
    Healthy,
    /// Some, but not all, servers answered
    Degraded,
    /// No server answered
    Unhealthy,
}

impl HealthStatus {
    /// Compose the aggregate from the number of healthy servers out of `total`
    ///
    /// An empty set is vacuously healthy.
    pub fn from_counts(healthy: usize, total: usize) -> Self {
        if healthy == total {
            HealthStatus::Healthy
        } else if healthy == 0 {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Degraded
        }
    }
}

/// Reachability of a single server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Up,
    Down,
}

/// Probe result for a single server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerHealth {
    /// Registered server name (rendered as the map key)
    #[serde(skip_serializing)]
    pub server: String,
    pub status: ServerStatus,
    /// Wall-clock time the probe took, including timeouts
    pub latency_ms: u64,
    /// Failure message of the probe, when down
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl ServerHealth {
    pub fn is_up(&self) -> bool {
        self.status == ServerStatus::Up
    }
}

/// Identity of the reporting gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayInfo {
    pub name: String,
    pub version: String,
}

/// A freshly computed health report. Never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub overall: HealthStatus,
    pub gateway: GatewayInfo,
    pub checked_at: DateTime<Utc>,
    /// Per-server results in registry order
    pub per_server: Vec<ServerHealth>,
}

impl HealthReport {
    /// Build a report, deriving `overall` from the per-server results
    pub fn compose(gateway: GatewayInfo, per_server: Vec<ServerHealth>) -> Self {
        let healthy = per_server.iter().filter(|s| s.is_up()).count();
        Self {
            overall: HealthStatus::from_counts(healthy, per_server.len()),
            gateway,
            checked_at: Utc::now(),
            per_server,
        }
    }

    /// Probe result for one server
    pub fn server(&self, name: &str) -> Option<&ServerHealth> {
        self.per_server.iter().find(|s| s.server == name)
    }
}

struct PerServer<'a>(&'a [ServerHealth]);

impl Serialize for PerServer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for health in self.0 {
            map.serialize_entry(&health.server, health)?;
        }
        map.end()
    }
}

impl Serialize for HealthReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HealthReport", 4)?;
        state.serialize_field("overall", &self.overall)?;
        state.serialize_field("gateway", &self.gateway)?;
        state.serialize_field("checked_at", &self.checked_at)?;
        state.serialize_field("per_server", &PerServer(&self.per_server))?;
        state.end()
    }
}
