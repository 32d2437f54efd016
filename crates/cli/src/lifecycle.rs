//! Process lifecycle flags shared by the transports and health endpoints.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Readiness, health, and shutdown state owned by `main`.
///
/// Starts healthy and not ready. Shutdown can be requested once; later
/// requests are ignored.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    inner: Arc<LifecycleState>,
}

#[derive(Debug)]
struct LifecycleState {
    ready: AtomicBool,
    healthy: AtomicBool,
    shutdown: CancellationToken,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(LifecycleState {
                ready: AtomicBool::new(false),
                healthy: AtomicBool::new(true),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::SeqCst)
    }

    pub fn set_ready(&self, ready: bool) {
        self.inner.ready.store(ready, Ordering::SeqCst);
    }

    pub fn is_healthy(&self) -> bool {
        self.inner.healthy.load(Ordering::SeqCst)
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.inner.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.inner.shutdown.clone()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Begin shutdown. Returns `false` when shutdown was already underway.
    pub fn request_shutdown(&self, reason: &str) -> bool {
        if self.is_shutting_down() {
            return false;
        }
        info!(reason, "shutting down");
        self.set_ready(false);
        self.inner.shutdown.cancel();
        true
    }
}

/// Translate SIGINT/SIGTERM into a shutdown request.
#[cfg(unix)]
pub fn spawn_signal_listener(lifecycle: Lifecycle) -> Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt()).context("install SIGINT handler")?;
    let mut terminate = signal(SignalKind::terminate()).context("install SIGTERM handler")?;

    Ok(tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                received = interrupt.recv() => received.map(|_| "SIGINT"),
                received = terminate.recv() => received.map(|_| "SIGTERM"),
            };
            let Some(signal_name) = received else {
                break;
            };
            if !lifecycle.request_shutdown(signal_name) {
                warn!(signal = signal_name, "shutdown already in progress; ignoring signal");
            }
        }
    }))
}

#[cfg(not(unix))]
pub fn spawn_signal_listener(lifecycle: Lifecycle) -> Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if !lifecycle.request_shutdown("ctrl-c") {
                warn!(signal = "ctrl-c", "shutdown already in progress; ignoring signal");
            }
        }
    }))
}
