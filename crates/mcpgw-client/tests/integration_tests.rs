//! Integration tests for mcpgw-client
//!
//! These tests run real stub downstream servers and drive them through
//! `HttpDownstream`, so the client stays in sync with the wire protocol.

use std::time::{Duration, Instant};

use mcpgw_client::testing::{RecordedCall, Reply, StubServer};
use mcpgw_client::HttpDownstream;
use mcpgw_core::{Downstream, ErrorKind, MethodDescriptor, Origin, Params, ServerDescriptor};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// =============================================================================
// Test Helpers
// =============================================================================

fn client() -> HttpDownstream {
    HttpDownstream::with_timeout(Duration::from_secs(2)).expect("Failed to build client")
}

fn params(value: serde_json::Value) -> Params {
    value.as_object().cloned().unwrap_or_default()
}

/// A base URL nothing listens on
async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// A base URL whose server announces a 1000 byte body, sends a fragment
/// of it and hangs up
async fn truncating_server_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut socket).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\n\
                          content-type: application/json\r\n\
                          content-length: 1000\r\n\r\n\
                          {\"result\":",
                    )
                    .await;
            });
        }
    });

    format!("http://{}", addr)
}

/// Consume one request, headers and body
async fn read_request(socket: &mut TcpStream) {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&chunk[..n]),
        }

        let text = String::from_utf8_lossy(&request);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if request.len() >= end + 4 + length {
                return;
            }
        }
    }
}

// =============================================================================
// Discovery Tests
// =============================================================================

#[tokio::test]
async fn test_discover_tags_owning_server() {
    let stub = StubServer::new()
        .method("create_issue")
        .method_with_description("list_repos", "List repositories")
        .start()
        .await
        .unwrap();

    let methods = client().discover(&stub.descriptor("github")).await.unwrap();
    assert_eq!(
        methods,
        vec![
            MethodDescriptor::new("create_issue", "github"),
            MethodDescriptor::new("list_repos", "github").with_description("List repositories"),
        ]
    );
    assert_eq!(stub.calls(), vec![RecordedCall::Discover]);
}

#[tokio::test]
async fn test_discover_malformed_body() {
    let stub = StubServer::new()
        .discovery(Reply::Status(200, json!({"tools": ["a"]})))
        .start()
        .await
        .unwrap();

    let failure = client()
        .discover(&stub.descriptor("github"))
        .await
        .unwrap_err();
    assert_eq!(failure.kind, ErrorKind::ProtocolViolation);
    assert_eq!(failure.origin, Origin::Gateway);
}

#[tokio::test]
async fn test_discover_connection_refused() {
    let server = ServerDescriptor::new("atlassian", closed_port_url().await, "");

    let failure = client().discover(&server).await.unwrap_err();
    assert_eq!(failure.kind, ErrorKind::Unreachable);
    assert!(!failure.timeout);
    assert_eq!(failure.message, "MCP server 'atlassian' is not reachable");
}

#[tokio::test]
async fn test_discover_under_base_path() {
    let stub = StubServer::new().method("ping").start().await.unwrap();
    // Stub routes live at the root, so a prefixed base must miss them
    let server = ServerDescriptor::new("prefixed", format!("{}/api", stub.base_url()), "");

    let failure = client().discover(&server).await.unwrap_err();
    assert_eq!(failure.kind, ErrorKind::DownstreamError);
    assert_eq!(failure.message, "downstream server returned HTTP 404");
}

// =============================================================================
// Invocation Tests
// =============================================================================

#[tokio::test]
async fn test_invoke_round_trip() {
    let stub = StubServer::new()
        .method("list_files")
        .reply("list_files", Reply::Result(json!({"files": ["a", "b"]})))
        .start()
        .await
        .unwrap();

    let result = client()
        .invoke(
            &stub.descriptor("filesystem"),
            "list_files",
            params(json!({"path": "/projects"})),
        )
        .await;

    assert_eq!(result.into_result().unwrap(), json!({"files": ["a", "b"]}));
    assert_eq!(
        stub.calls(),
        vec![RecordedCall::Invoke {
            method: "list_files".to_string(),
            params: params(json!({"path": "/projects"})),
        }]
    );
}

#[tokio::test]
async fn test_invoke_forwards_params_verbatim() {
    let stub = StubServer::new()
        .reply("search", Reply::Echo)
        .start()
        .await
        .unwrap();
    let sent = params(json!({"query": "gateway", "limit": 5, "filters": {"open": true}}));

    let result = client()
        .invoke(&stub.descriptor("atlassian"), "search", sent.clone())
        .await;

    let echoed = result.into_result().unwrap();
    assert_eq!(echoed["method"], "search");
    assert_eq!(echoed["params"], serde_json::Value::Object(sent));
}

#[tokio::test]
async fn test_invoke_downstream_error_envelope() {
    let stub = StubServer::new().start().await.unwrap();

    let result = client()
        .invoke(&stub.descriptor("github"), "nope", Params::new())
        .await;

    let error = result.error().cloned().unwrap();
    assert_eq!(error.kind, ErrorKind::DownstreamError);
    assert_eq!(error.origin, Origin::Downstream);
    assert_eq!(error.message, "Unknown method: nope");
    assert_eq!(result.status_code(), 500);
}

#[tokio::test]
async fn test_invoke_http_4xx_with_message() {
    let stub = StubServer::new()
        .reply(
            "read_file",
            Reply::Status(400, json!({"detail": "path must be absolute"})),
        )
        .start()
        .await
        .unwrap();

    let error = client()
        .invoke(&stub.descriptor("filesystem"), "read_file", Params::new())
        .await
        .into_result()
        .unwrap_err();
    assert_eq!(error.kind, ErrorKind::DownstreamError);
    assert_eq!(error.origin, Origin::Downstream);
    assert_eq!(error.message, "path must be absolute");
}

#[tokio::test]
async fn test_invoke_http_5xx_generic_message() {
    let stub = StubServer::new()
        .reply("read_file", Reply::Raw(502, "<html>Bad Gateway</html>".to_string()))
        .start()
        .await
        .unwrap();

    let error = client()
        .invoke(&stub.descriptor("filesystem"), "read_file", Params::new())
        .await
        .into_result()
        .unwrap_err();
    assert_eq!(error.message, "downstream server returned HTTP 502");
}

#[tokio::test]
async fn test_invoke_timeout_is_bounded() {
    let stub = StubServer::new()
        .reply("slow", Reply::Result(json!("late")))
        .delay(Duration::from_secs(3))
        .start()
        .await
        .unwrap();
    let client = HttpDownstream::with_timeout(Duration::from_millis(200)).unwrap();

    let started = Instant::now();
    let result = client
        .invoke(&stub.descriptor("slow"), "slow", Params::new())
        .await;
    let elapsed = started.elapsed();

    let error = result.error().cloned().unwrap();
    assert_eq!(error.kind, ErrorKind::Unreachable);
    assert!(error.timeout);
    assert_eq!(result.status_code(), 504);
    assert!(elapsed < Duration::from_millis(1200), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_invoke_connection_refused() {
    let server = ServerDescriptor::new("github", closed_port_url().await, "");

    let result = client().invoke(&server, "list_repos", Params::new()).await;
    let error = result.error().cloned().unwrap();
    assert_eq!(error.kind, ErrorKind::Unreachable);
    assert_eq!(error.origin, Origin::Gateway);
    assert_eq!(result.status_code(), 502);
}

#[tokio::test]
async fn test_probe_uses_discovery() {
    let stub = StubServer::new().method("ping").start().await.unwrap();

    client().probe(&stub.descriptor("github")).await.unwrap();
    assert_eq!(stub.calls(), vec![RecordedCall::Discover]);
}

#[tokio::test]
async fn test_truncated_body_is_unreachable() {
    let server = ServerDescriptor::new("filesystem", truncating_server_url().await, "");

    let result = client()
        .invoke(&server, "read_file", params(json!({"path": "/etc/hosts"})))
        .await;
    let error = result.error().cloned().unwrap();
    assert_eq!(error.kind, ErrorKind::Unreachable);
    assert_eq!(error.origin, Origin::Gateway);
    assert!(!error.timeout);
    assert_eq!(result.status_code(), 502);

    let failure = client().discover(&server).await.unwrap_err();
    assert_eq!(failure.kind, ErrorKind::Unreachable);
    assert_eq!(failure.status_code(), 502);
}
