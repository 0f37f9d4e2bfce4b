//! In-memory downstream for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mcpgw_core::{
    Downstream, DownstreamResult, Failure, InvocationResult, MethodDescriptor, Params, Registry,
    ServerDescriptor,
};
use serde_json::json;

#[derive(Debug, Clone, Default)]
pub(crate) struct MockServer {
    methods: Vec<String>,
    failure: Option<Failure>,
    delay: Duration,
}

impl MockServer {
    pub(crate) fn up(methods: &[&str]) -> Self {
        Self {
            methods: methods.iter().map(|m| m.to_string()).collect(),
            ..Self::default()
        }
    }

    pub(crate) fn down(name: &str) -> Self {
        Self {
            failure: Some(Failure::unreachable(name)),
            ..Self::default()
        }
    }

    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Scripted downstream with per-operation call counters
#[derive(Debug, Default)]
pub(crate) struct MockDownstream {
    servers: HashMap<String, MockServer>,
    pub discover_calls: AtomicUsize,
    pub invoke_calls: AtomicUsize,
    pub probe_calls: AtomicUsize,
}

impl MockDownstream {
    pub(crate) fn with(mut self, name: &str, server: MockServer) -> Self {
        self.servers.insert(name.to_string(), server);
        self
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.discover_calls.load(Ordering::SeqCst)
            + self.invoke_calls.load(Ordering::SeqCst)
            + self.probe_calls.load(Ordering::SeqCst)
    }

    /// Registry holding every scripted server, in name order
    pub(crate) fn registry(&self) -> Registry {
        let mut names: Vec<&String> = self.servers.keys().collect();
        names.sort();
        Registry::new(
            names
                .into_iter()
                .enumerate()
                .map(|(i, name)| {
                    ServerDescriptor::new(name, format!("http://localhost:{}", 9000 + i), "")
                })
                .collect(),
        )
        .unwrap()
    }

    async fn script(&self, server: &ServerDescriptor) -> DownstreamResult<&MockServer> {
        let script = self
            .servers
            .get(&server.name)
            .ok_or_else(|| Failure::unreachable(&server.name))?;
        tokio::time::sleep(script.delay).await;
        match &script.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(script),
        }
    }
}

#[async_trait]
impl Downstream for MockDownstream {
    async fn discover(&self, server: &ServerDescriptor) -> DownstreamResult<Vec<MethodDescriptor>> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script(server).await?;
        Ok(script
            .methods
            .iter()
            .map(|m| MethodDescriptor::new(m, "someone-else"))
            .collect())
    }

    async fn invoke(
        &self,
        server: &ServerDescriptor,
        method: &str,
        params: Params,
    ) -> InvocationResult {
        self.invoke_calls.fetch_add(1, Ordering::SeqCst);
        match self.script(server).await {
            Ok(script) if script.methods.iter().any(|m| m == method) => {
                InvocationResult::success(json!({
                    "server": server.name,
                    "method": method,
                    "params": params,
                }))
            }
            Ok(_) => InvocationResult::failure(Failure::downstream(format!(
                "Unknown method: {}",
                method
            ))),
            Err(failure) => InvocationResult::failure(failure),
        }
    }

    async fn probe(&self, server: &ServerDescriptor) -> DownstreamResult<()> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.script(server).await.map(|_| ())
    }
}
