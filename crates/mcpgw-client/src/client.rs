//! reqwest-backed downstream transport

use std::time::{Duration, Instant};

use async_trait::async_trait;
use mcpgw_core::{
    Downstream, DownstreamConfig, DownstreamResult, Failure, InvocationResult, MethodDescriptor,
    Params, ServerDescriptor,
};
use reqwest::{Client, Response};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{ClientError, Result};
use crate::protocol::{self, InvokeBody};

/// HTTP transport to MCP downstream servers
///
/// One instance serves every registered server. The inner `reqwest::Client`
/// keeps a connection pool that is shared by all concurrent calls.
#[derive(Debug, Clone)]
pub struct HttpDownstream {
    client: Client,
    timeout: Duration,
    health_timeout: Duration,
    discovery_path: String,
    invoke_path: String,
}

impl HttpDownstream {
    /// Create a transport from the downstream settings
    pub fn new(config: &DownstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout(),
            health_timeout: config.health_timeout(),
            discovery_path: config.discovery_path.clone(),
            invoke_path: config.invoke_path.clone(),
        })
    }

    /// Create a transport with default paths and the given call timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let config = DownstreamConfig {
            timeout_ms: timeout.as_millis() as u64,
            health_timeout_ms: timeout.as_millis() as u64,
            ..DownstreamConfig::default()
        };
        Self::new(&config)
    }

    /// Per-call timeout for discovery and invocation
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve an endpoint path against a server's base URL
    ///
    /// The path is appended to whatever path the base URL already carries,
    /// so `http://host/api` + `/mcp/get_methods` gives
    /// `http://host/api/mcp/get_methods`.
    pub fn endpoint(base_url: &str, path: &str) -> Result<Url> {
        let mut url = Url::parse(base_url)?;
        url.path_segments_mut()
            .map_err(|_| ClientError::NotABase(base_url.to_string()))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    fn url_for(&self, server: &ServerDescriptor, path: &str) -> DownstreamResult<Url> {
        Self::endpoint(&server.base_url, path).map_err(|e| {
            warn!(server = %server.name, error = %e, "Cannot build downstream URL");
            Failure::unreachable(&server.name)
        })
    }

    async fn fetch_methods(
        &self,
        server: &ServerDescriptor,
        timeout: Duration,
    ) -> DownstreamResult<Vec<MethodDescriptor>> {
        let url = self.url_for(server, &self.discovery_path)?;
        debug!(server = %server.name, %url, "Discovering methods");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(&server.name, timeout, e))?;

        let (status, body) = read_body(&server.name, timeout, response).await?;
        if !status.is_success() {
            return Err(protocol::http_failure(status.as_u16(), &body));
        }

        protocol::parse_methods(&server.name, &body)
    }
}

#[async_trait]
impl Downstream for HttpDownstream {
    #[instrument(skip(self, server), fields(server = %server.name))]
    async fn discover(&self, server: &ServerDescriptor) -> DownstreamResult<Vec<MethodDescriptor>> {
        let methods = self.fetch_methods(server, self.timeout).await?;
        debug!(count = methods.len(), "Discovered methods");
        Ok(methods)
    }

    #[instrument(skip(self, server, params), fields(server = %server.name))]
    async fn invoke(
        &self,
        server: &ServerDescriptor,
        method: &str,
        params: Params,
    ) -> InvocationResult {
        let url = match self.url_for(server, &self.invoke_path) {
            Ok(url) => url,
            Err(failure) => return InvocationResult::failure(failure),
        };

        let started = Instant::now();
        let sent = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&InvokeBody {
                method,
                params: &params,
            })
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => return InvocationResult::failure(classify(&server.name, self.timeout, e)),
        };

        let result = match read_body(&server.name, self.timeout, response).await {
            Ok((status, body)) if status.is_success() => {
                protocol::parse_invocation(&server.name, &body)
            }
            Ok((status, body)) => {
                InvocationResult::failure(protocol::http_failure(status.as_u16(), &body))
            }
            Err(failure) => InvocationResult::failure(failure),
        };

        debug!(
            latency_ms = started.elapsed().as_millis() as u64,
            success = result.is_success(),
            "Invocation finished"
        );
        result
    }

    #[instrument(skip(self, server), fields(server = %server.name))]
    async fn probe(&self, server: &ServerDescriptor) -> DownstreamResult<()> {
        self.fetch_methods(server, self.health_timeout)
            .await
            .map(|_| ())
    }
}

async fn read_body(
    server: &str,
    timeout: Duration,
    response: Response,
) -> DownstreamResult<(reqwest::StatusCode, Vec<u8>)> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| classify(server, timeout, e))?;
    Ok((status, body.to_vec()))
}

/// Map a transport error onto the failure taxonomy
///
/// Every reqwest error here is network-level: connect, request and
/// mid-transfer body errors alike. Bodies are only judged once they arrived
/// complete, in [`protocol`]. Timeouts are checked first since reqwest may
/// flag a connect timeout as both.
fn classify(server: &str, timeout: Duration, error: reqwest::Error) -> Failure {
    if error.is_timeout() {
        debug!(server = %server, "Downstream call timed out");
        Failure::timed_out(server, timeout.as_millis())
    } else {
        debug!(server = %server, error = %error, "Downstream not reachable");
        Failure::unreachable(server)
    }
}
