//! OS signal handling and shutdown coordination.
//!
//! # Responsibilities
//! - Register process signal handlers exactly once (SIGTERM, Ctrl-C)
//! - Translate signals into the internal shutdown broadcast
//!
//! # Design Decisions
//! - Installation is config-gated and Once-guarded; the bootstrap
//!   sequence may skip it entirely
//! - Uses Tokio's signal handling, so installation requires a runtime

use std::sync::Once;

use tokio::sync::broadcast;

static INSTALL_HANDLER: Once = Once::new();

/// Coordinator for graceful shutdown.
///
/// The signal task triggers it; long-running tasks subscribe to it.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        tracing::info!("shutdown triggered");
        let _ = self.tx.send(());
    }

    /// Number of active subscribers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Install the process signal handler exactly once.
///
/// Later calls are no-ops, so a process restarting its loader cannot
/// double-register. Must run inside a Tokio runtime.
pub fn install_once(shutdown: &Shutdown) {
    INSTALL_HANDLER.call_once(|| {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            wait_for_signal().await;
            shutdown.trigger();
        });
        tracing::info!("process signal handler installed");
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate =
        signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if result.is_ok() {
                tracing::info!("interrupt received");
            }
        }
        _ = terminate.recv() => {
            tracing::info!("SIGTERM received");
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("interrupt received");
    }
}
