//! Method Aggregator - concurrent discovery across every registered server

use std::sync::Arc;

use futures::future::join_all;
use mcpgw_core::{
    Catalog, Downstream, DownstreamResult, Failure, MethodDescriptor, Registry, ServerCatalog,
    ServerDescriptor,
};
use tracing::{debug, warn};

/// Fans `discover` out to every server and merges the answers
pub struct MethodAggregator {
    registry: Arc<Registry>,
    downstream: Arc<dyn Downstream>,
}

impl MethodAggregator {
    pub fn new(registry: Arc<Registry>, downstream: Arc<dyn Downstream>) -> Self {
        Self {
            registry,
            downstream,
        }
    }

    /// Discover every server concurrently
    ///
    /// The catalog has exactly one entry per registered server, in registry
    /// order. A failing server contributes its failure; it never removes or
    /// alters the other entries.
    pub async fn aggregate(&self) -> Catalog {
        let servers = self.registry.list_all();

        let outcomes = join_all(servers.iter().map(|server| self.discover_server(server))).await;

        let catalog = Catalog {
            servers: servers
                .iter()
                .zip(outcomes)
                .map(|(server, outcome)| ServerCatalog {
                    server: server.name.clone(),
                    outcome,
                })
                .collect(),
        };

        debug!(
            servers = catalog.len(),
            methods = catalog.total_methods(),
            "Aggregated method catalog"
        );
        catalog
    }

    /// Discover a single server by name
    pub async fn discover_one(&self, name: &str) -> DownstreamResult<Vec<MethodDescriptor>> {
        let server = self
            .registry
            .lookup(name)
            .ok_or_else(|| Failure::unknown_server(name))?;
        self.discover_server(server).await
    }

    async fn discover_server(
        &self,
        server: &ServerDescriptor,
    ) -> DownstreamResult<Vec<MethodDescriptor>> {
        match self.downstream.discover(server).await {
            Ok(methods) => Ok(methods
                .into_iter()
                .map(|method| MethodDescriptor {
                    owning_server: server.name.clone(),
                    ..method
                })
                .collect()),
            Err(failure) => {
                warn!(server = %server.name, kind = %failure.kind, "Discovery failed");
                Err(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDownstream, MockServer};
    use mcpgw_core::ErrorKind;
    use std::sync::atomic::Ordering;
    use std::time::{Duration, Instant};

    fn aggregator(mock: MockDownstream) -> (MethodAggregator, Arc<MockDownstream>) {
        let registry = Arc::new(mock.registry());
        let mock = Arc::new(mock);
        (
            MethodAggregator::new(registry, mock.clone() as Arc<dyn Downstream>),
            mock,
        )
    }

    #[tokio::test]
    async fn partial_failure_keeps_every_entry() {
        let (aggregator, mock) = aggregator(
            MockDownstream::default()
                .with("atlassian", MockServer::down("atlassian"))
                .with("filesystem", MockServer::up(&["read_file", "write_file"]))
                .with("github", MockServer::up(&["create_issue"])),
        );

        let catalog = aggregator.aggregate().await;

        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.get("atlassian").unwrap().as_ref().unwrap_err().kind,
            ErrorKind::Unreachable
        );
        assert_eq!(catalog.get("filesystem").unwrap().as_ref().unwrap().len(), 2);
        assert_eq!(catalog.get("github").unwrap().as_ref().unwrap().len(), 1);
        assert_eq!(catalog.total_methods(), 3);
        assert_eq!(mock.discover_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn methods_are_tagged_with_registered_owner() {
        let (aggregator, _) = aggregator(
            MockDownstream::default().with("github", MockServer::up(&["create_issue"])),
        );

        let catalog = aggregator.aggregate().await;
        assert!(catalog.methods().all(|m| m.owning_server == "github"));
    }

    #[tokio::test]
    async fn fan_out_is_concurrent() {
        let delay = Duration::from_millis(200);
        let (aggregator, _) = aggregator(
            MockDownstream::default()
                .with("a", MockServer::up(&["x"]).delayed(delay))
                .with("b", MockServer::up(&["y"]).delayed(delay))
                .with("c", MockServer::up(&["z"]).delayed(delay)),
        );

        let started = Instant::now();
        let catalog = aggregator.aggregate().await;
        assert_eq!(catalog.total_methods(), 3);
        assert!(started.elapsed() < delay * 2, "took {:?}", started.elapsed());
    }

    #[tokio::test]
    async fn discover_one_unknown_server_makes_no_call() {
        let (aggregator, mock) =
            aggregator(MockDownstream::default().with("github", MockServer::up(&["x"])));

        let failure = aggregator.discover_one("jira").await.unwrap_err();
        assert_eq!(failure.kind, ErrorKind::UnknownServer);
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test]
    async fn empty_registry_gives_empty_catalog() {
        let (aggregator, _) = aggregator(MockDownstream::default());
        let catalog = aggregator.aggregate().await;
        assert!(catalog.is_empty());
        assert_eq!(catalog.total_methods(), 0);
    }
}
