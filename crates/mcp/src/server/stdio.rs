//! Stdio host for the MCP core.

use std::sync::Arc;

use anyhow::{Context, Result};
use argonaut_api::ArgoApi;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::server::core::ArgonautMcpCore;

/// Serve the tool protocol over stdin/stdout until the peer disconnects or
/// `shutdown` is cancelled.
pub async fn serve_stdio(client: Arc<dyn ArgoApi>, shutdown: CancellationToken) -> Result<()> {
    let running = ArgonautMcpCore::new(client)
        .serve(stdio())
        .await
        .context("start MCP stdio transport")?;
    info!("MCP server ready on stdio");

    let service_token = running.cancellation_token();
    let forward_shutdown = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown.cancelled().await;
            service_token.cancel();
        }
    });

    let quit_reason = running.waiting().await.context("MCP stdio service task failed")?;
    forward_shutdown.abort();
    info!(reason = ?quit_reason, "MCP stdio transport closed");
    Ok(())
}
