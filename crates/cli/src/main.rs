mod cli;
mod health;
mod lifecycle;
mod logging;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use argonaut_api::{ArgoApi, ArgoClient};
use argonaut_mcp::{McpHttpServer, resolve_bind_address, serve_stdio};
use clap::Parser;
use tracing::{error, info, warn};

use crate::cli::{Args, Transport};
use crate::lifecycle::Lifecycle;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing(&args.log_level, args.log_format)?;

    let lifecycle = Lifecycle::new();
    let signals = lifecycle::spawn_signal_listener(lifecycle.clone())?;

    let health = match args.health_port {
        Some(port) => Some(health::start(SocketAddr::from(([0, 0, 0, 0], port)), lifecycle.clone()).await?),
        None => None,
    };

    let outcome = run(&args, &lifecycle).await;
    if let Err(error) = &outcome {
        error!(error = %format!("{error:#}"), "server failed");
        lifecycle.set_healthy(false);
    }

    lifecycle.request_shutdown("server stopped");
    if let Some(health) = health
        && let Err(error) = health.await
    {
        warn!(%error, "health server task failed");
    }
    signals.abort();
    outcome
}

async fn run(args: &Args, lifecycle: &Lifecycle) -> Result<()> {
    let config = args.client_config();
    info!(
        server = %config.base_url,
        namespace = %config.namespace,
        transport = ?args.transport,
        "starting argonaut"
    );

    let client = ArgoClient::new(config)?;
    client.initialize().await.context("connect to Argo Server")?;
    let client: Arc<dyn ArgoApi> = Arc::new(client);

    match args.transport {
        Transport::Stdio => {
            lifecycle.set_ready(true);
            serve_stdio(client, lifecycle.shutdown_token()).await
        }
        Transport::Http => {
            let address = resolve_bind_address(&args.bind)?;
            let running = McpHttpServer::new(address, client)
                .start(lifecycle.shutdown_token())
                .await?;
            info!(address = %running.bound_address(), "MCP endpoint available at /mcp");
            lifecycle.set_ready(true);
            running.wait().await
        }
    }
}
