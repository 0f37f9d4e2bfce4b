//! Test utilities for mcpgw-client
//!
//! [`TestServer`] runs any axum router on an ephemeral port;
//! [`StubServer`] builds a scriptable MCP downstream on top of it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use mcpgw_core::{Params, ServerDescriptor};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::Result;

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve a router on `127.0.0.1:0`
    ///
    /// # Example
    ///
    /// ```ignore
    /// use mcpgw_client::testing::TestServer;
    /// use mcpgw_api::{create_router, AppState};
    ///
    /// let server = TestServer::start(create_router(state)).await?;
    /// let health = reqwest::get(format!("{}/health", server.base_url())).await?;
    /// ```
    pub async fn start<S>(router: Router<S>) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        Router<S>: Into<Router>,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let router: Router = router.into();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// How a stub answers one invocation (or its discovery call)
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 `{"result": value, "error": null}`
    Result(Value),
    /// 200 `{"result": null, "error": {"message": message}}`
    Error(String),
    /// Given status with a JSON body
    Status(u16, Value),
    /// Given status with a raw text body
    Raw(u16, String),
    /// 200 with `{"result": {"method", "params"}}`
    Echo,
}

/// A call the stub received
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Discover,
    Invoke { method: String, params: Params },
}

/// Builder for a scriptable MCP downstream server
#[derive(Debug, Clone, Default)]
pub struct StubServer {
    methods: Vec<Value>,
    discovery: Option<Reply>,
    replies: HashMap<String, Reply>,
    delay: Duration,
}

impl StubServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advertise a method by name
    pub fn method(mut self, name: &str) -> Self {
        self.methods.push(Value::String(name.to_string()));
        self
    }

    /// Advertise a method as a `{name, description}` object
    pub fn method_with_description(mut self, name: &str, description: &str) -> Self {
        self.methods
            .push(json!({"name": name, "description": description}));
        self
    }

    /// Override the discovery answer
    pub fn discovery(mut self, reply: Reply) -> Self {
        self.discovery = Some(reply);
        self
    }

    /// Script the answer for one method
    pub fn reply(mut self, method: &str, reply: Reply) -> Self {
        self.replies.insert(method.to_string(), reply);
        self
    }

    /// Sleep before answering any request
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Start serving on an ephemeral port
    pub async fn start(self) -> Result<RunningStub> {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            stub: Arc::new(self),
            calls: Arc::clone(&calls),
        };

        let router = Router::new()
            .route("/mcp/get_methods", get(stub_discover))
            .route("/mcp/invoke_method", post(stub_invoke))
            .with_state(state);

        let server = TestServer::start(router).await?;
        Ok(RunningStub { server, calls })
    }
}

/// A started [`StubServer`]
pub struct RunningStub {
    server: TestServer,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RunningStub {
    pub fn base_url(&self) -> String {
        self.server.base_url()
    }

    /// Registry entry pointing at this stub
    pub fn descriptor(&self, name: &str) -> ServerDescriptor {
        ServerDescriptor::new(name, self.base_url(), format!("Stub {}", name))
    }

    /// Every call received so far, in arrival order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of invocation calls received
    pub fn invocations(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RecordedCall::Invoke { .. }))
            .count()
    }

    pub async fn shutdown(self) {
        self.server.shutdown().await;
    }
}

#[derive(Clone)]
struct StubState {
    stub: Arc<StubServer>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

#[derive(Deserialize)]
struct InvokeRequest {
    method: String,
    #[serde(default)]
    params: Params,
}

async fn stub_discover(State(state): State<StubState>) -> Response {
    state.calls.lock().push(RecordedCall::Discover);
    tokio::time::sleep(state.stub.delay).await;

    match &state.stub.discovery {
        Some(reply) => render(reply, None),
        None => Json(json!({"result": {"methods": state.stub.methods}})).into_response(),
    }
}

async fn stub_invoke(State(state): State<StubState>, Json(request): Json<InvokeRequest>) -> Response {
    state.calls.lock().push(RecordedCall::Invoke {
        method: request.method.clone(),
        params: request.params.clone(),
    });
    tokio::time::sleep(state.stub.delay).await;

    match state.stub.replies.get(&request.method) {
        Some(reply) => render(reply, Some(&request)),
        None => Json(json!({
            "result": null,
            "error": {"message": format!("Unknown method: {}", request.method)}
        }))
        .into_response(),
    }
}

fn render(reply: &Reply, request: Option<&InvokeRequest>) -> Response {
    match reply {
        Reply::Result(value) => Json(json!({"result": value, "error": null})).into_response(),
        Reply::Error(message) => {
            Json(json!({"result": null, "error": {"message": message}})).into_response()
        }
        Reply::Status(code, body) => (status(*code), Json(body.clone())).into_response(),
        Reply::Raw(code, body) => (status(*code), body.clone()).into_response(),
        Reply::Echo => {
            let echoed = request
                .map(|r| json!({"method": r.method, "params": r.params}))
                .unwrap_or(Value::Null);
            Json(json!({"result": echoed, "error": null})).into_response()
        }
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_methods_and_replies() {
        let stub = StubServer::new()
            .method("read_file")
            .method_with_description("write_file", "Write a file")
            .reply("read_file", Reply::Echo)
            .delay(Duration::from_millis(5));
        assert_eq!(stub.methods.len(), 2);
        assert_eq!(stub.methods[1]["description"], "Write a file");
        assert!(stub.replies.contains_key("read_file"));
        assert_eq!(stub.delay, Duration::from_millis(5));
    }

    #[tokio::test]
    async fn stub_records_calls() {
        let stub = StubServer::new().method("ping").start().await.unwrap();
        let client = reqwest::Client::new();

        let body: Value = client
            .get(format!("{}/mcp/get_methods", stub.base_url()))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, json!({"result": {"methods": ["ping"]}}));

        client
            .post(format!("{}/mcp/invoke_method", stub.base_url()))
            .json(&json!({"method": "ping", "params": {"n": 1}}))
            .send()
            .await
            .unwrap();

        let calls = stub.calls();
        assert_eq!(calls[0], RecordedCall::Discover);
        assert!(matches!(&calls[1], RecordedCall::Invoke { method, .. } if method == "ping"));
        assert_eq!(stub.invocations(), 1);
    }
}
