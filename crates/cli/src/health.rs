//! Liveness and readiness endpoints.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::lifecycle::Lifecycle;

pub fn router(lifecycle: Lifecycle) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/", get(root))
        .with_state(lifecycle)
}

/// Bind the health server and serve it until shutdown is requested.
pub async fn start(address: SocketAddr, lifecycle: Lifecycle) -> Result<JoinHandle<()>> {
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("bind health server to {address}"))?;
    Ok(serve(listener, lifecycle))
}

fn serve(listener: TcpListener, lifecycle: Lifecycle) -> JoinHandle<()> {
    if let Ok(address) = listener.local_addr() {
        info!(%address, "health server listening");
    }
    let shutdown = lifecycle.shutdown_token();
    tokio::spawn(async move {
        let served = axum::serve(listener, router(lifecycle))
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await;
        if let Err(error) = served {
            warn!(%error, "health server stopped with error");
        }
    })
}

async fn health(State(lifecycle): State<Lifecycle>) -> impl IntoResponse {
    debug!("health check");
    let (status, label) = if lifecycle.is_healthy() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };
    (status, Json(json!({ "status": label, "timestamp": now() })))
}

async fn ready(State(lifecycle): State<Lifecycle>) -> impl IntoResponse {
    debug!("readiness check");
    let (status, label) = if lifecycle.is_ready() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };
    (status, Json(json!({ "status": label, "timestamp": now() })))
}

async fn root(State(lifecycle): State<Lifecycle>) -> impl IntoResponse {
    Json(json!({
        "name": "argonaut",
        "version": env!("CARGO_PKG_VERSION"),
        "status": if lifecycle.is_healthy() { "healthy" } else { "unhealthy" },
        "ready": if lifecycle.is_ready() { "ready" } else { "not_ready" },
    }))
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
