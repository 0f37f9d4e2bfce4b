//! mcpgwd - MCP Gateway Daemon
//!
//! One HTTP entry point in front of several MCP tool servers.
//!
//! Usage:
//!   mcpgwd [OPTIONS] [config.toml|config.yaml]
//!
//! If no config file is provided, a demo registry of three local servers
//! (github :8001, filesystem :8002, atlassian :8003) is used.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mcpgw_api::{create_router, AppState};
use mcpgw_client::HttpDownstream;
use mcpgw_core::GatewayConfig;
use mcpgw_gateway::Gateway;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "mcpgwd=info,mcpgw_api=info,mcpgw_gateway=info,mcpgw_client=info";

#[derive(Parser, Debug)]
#[command(name = "mcpgwd")]
#[command(author, version, about = "Unified MCP gateway daemon")]
struct Args {
    /// Gateway config file (TOML or YAML)
    #[arg(env = "MCPGW_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "MCPGW_HOST")]
    host: Option<String>,

    /// Override the listen port
    #[arg(short, long, env = "MCPGW_PORT")]
    port: Option<u16>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Args {
    /// Load the config file (or the demo registry) and apply CLI overrides
    fn resolve_config(&self) -> Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading config from: {}", path.display());
                GatewayConfig::load(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?
            }
            None => {
                tracing::info!("No config file provided, using demo registry");
                GatewayConfig::demo()
            }
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        Ok(config)
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_json);

    tracing::info!("Starting mcpgwd (MCP Gateway Daemon)");

    let config = args.resolve_config()?;
    for server in &config.servers {
        tracing::info!(server = %server.name, base_url = %server.base_url, "Downstream server");
    }

    let downstream =
        HttpDownstream::new(&config.downstream).context("Failed to build HTTP client")?;
    let host = config.server.host.clone();
    let port = config.server.port;

    let gateway = Gateway::new(config, Arc::new(downstream)).context("Invalid configuration")?;
    let app = create_router(AppState::new(gateway));

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    let addr = listener.local_addr()?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn cli_overrides_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[[servers]]\nname = \"github\"\nbase_url = \"http://localhost:8001\""
        )
        .unwrap();

        let args = Args::parse_from([
            "mcpgwd",
            file.path().to_str().unwrap(),
            "--host",
            "127.0.0.1",
            "--port",
            "9100",
        ]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.servers.len(), 1);
    }

    #[test]
    fn no_config_uses_demo_registry() {
        let args = Args::parse_from(["mcpgwd", "--log-json"]);
        assert!(args.log_json);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.servers.len(), 3);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn sample_config_loads_as_positional_argument() {
        let sample = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/gateway.toml");

        let args = Args::parse_from(["mcpgwd", sample]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.servers.len(), 3);
        assert_eq!(config.routing.default_server.as_deref(), Some("filesystem"));
        config.registry().unwrap();

        assert!(Args::try_parse_from(["mcpgwd", "--config", sample]).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Args::parse_from(["mcpgwd", "/nonexistent/gateway.toml"]);
        assert!(args.resolve_config().is_err());
    }
}
