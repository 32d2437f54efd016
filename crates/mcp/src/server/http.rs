//! Streamable HTTP host for the MCP core.

use std::net::SocketAddr;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use argonaut_api::ArgoApi;
use axum::Router;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::server::core::ArgonautMcpCore;

/// Host configuration for an MCP HTTP server instance.
#[derive(Clone)]
pub struct McpHttpServer {
    bind_address: SocketAddr,
    client: Arc<dyn ArgoApi>,
}

impl McpHttpServer {
    /// Create a new MCP HTTP server bound to the provided address.
    pub fn new(bind_address: SocketAddr, client: Arc<dyn ArgoApi>) -> Self {
        Self { bind_address, client }
    }

    /// Start the server and return a handle for runtime inspection and shutdown.
    ///
    /// The server also stops when `shutdown` is cancelled.
    pub async fn start(self, shutdown: CancellationToken) -> Result<RunningMcpHttpServer> {
        let listener = tokio::net::TcpListener::bind(self.bind_address)
            .await
            .with_context(|| format!("bind MCP HTTP server to {}", self.bind_address))?;
        let bound_address = listener.local_addr()?;
        let cancellation_token = shutdown.child_token();
        let session_manager = Arc::new(LocalSessionManager::default());
        let client_counter = Arc::new(AtomicUsize::new(0));
        let monitor_handle = spawn_session_monitor(
            Arc::clone(&session_manager),
            Arc::clone(&client_counter),
            cancellation_token.child_token(),
        );

        let client = Arc::clone(&self.client);
        let service: StreamableHttpService<ArgonautMcpCore, LocalSessionManager> = StreamableHttpService::new(
            move || Ok(ArgonautMcpCore::new(Arc::clone(&client))),
            Arc::clone(&session_manager),
            StreamableHttpServerConfig {
                stateful_mode: true,
                sse_keep_alive: None,
                cancellation_token: cancellation_token.child_token(),
                ..Default::default()
            },
        );

        let router = Router::new().nest_service("/mcp", service);
        info!(address = %bound_address, "MCP HTTP server listening on /mcp");

        let server_handle = tokio::spawn({
            let shutdown = cancellation_token.child_token();
            async move {
                let _ = axum::serve(listener, router)
                    .with_graceful_shutdown(async move {
                        shutdown.cancelled().await;
                    })
                    .await;
            }
        });

        Ok(RunningMcpHttpServer {
            bind_address: bound_address,
            cancellation_token,
            server_handle,
            monitor_handle,
            client_counter,
        })
    }
}

/// Runtime handle for a running MCP HTTP server.
#[derive(Debug)]
pub struct RunningMcpHttpServer {
    bind_address: SocketAddr,
    cancellation_token: CancellationToken,
    server_handle: JoinHandle<()>,
    monitor_handle: JoinHandle<()>,
    client_counter: Arc<AtomicUsize>,
}

impl RunningMcpHttpServer {
    /// Return the bound socket address for the running server.
    pub fn bound_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Return the most recently observed session count.
    pub fn connected_clients(&self) -> usize {
        self.client_counter.load(Ordering::Relaxed)
    }

    /// Wait until the server stops on its own or through the shutdown token.
    pub async fn wait(self) -> Result<()> {
        self.cancellation_token.cancelled().await;
        self.stop().await
    }

    /// Stop the server and wait for background tasks to finish.
    pub async fn stop(self) -> Result<()> {
        self.cancellation_token.cancel();
        self.monitor_handle
            .await
            .map_err(|error| anyhow!("MCP HTTP monitor task failed: {error}"))?;
        self.server_handle
            .await
            .map_err(|error| anyhow!("MCP HTTP server task failed: {error}"))?;
        info!("MCP HTTP server stopped");
        Ok(())
    }
}

/// Parse the HTTP bind address.
///
/// Non-loopback addresses are allowed, with a warning, since the tools
/// carry the configured Argo credential.
pub fn resolve_bind_address(bind_address: &str) -> Result<SocketAddr> {
    let parsed: SocketAddr = bind_address
        .parse()
        .map_err(|error| anyhow!("invalid MCP HTTP bind address '{bind_address}': {error}"))?;
    if !parsed.ip().is_loopback() {
        warn!(address = %parsed, "MCP HTTP server is bound to a non-loopback address");
    }
    Ok(parsed)
}

fn spawn_session_monitor(
    session_manager: Arc<LocalSessionManager>,
    client_counter: Arc<AtomicUsize>,
    cancellation_token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(500));
        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => break,
                _ = ticker.tick() => {
                    let count = session_manager.sessions.read().await.len();
                    let previous = client_counter.swap(count, Ordering::Relaxed);
                    if previous != count {
                        debug!(sessions = count, "MCP HTTP session count changed");
                    }
                }
            }
        }
    })
}
