//! Shutdown coordination.

use std::io;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::{JoinError, JoinHandle};

use crate::observability::{Telemetry, TelemetryError};

/// Errors observed while shutting down. None of them stop the process from exiting.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// In-flight requests outlived the grace period and were aborted.
    #[error("server did not drain within {0:?}")]
    Timeout(Duration),

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Server(#[from] io::Error),

    /// A task panicked or was cancelled.
    #[error("task failed: {0}")]
    Join(#[from] JoinError),

    /// The tracer provider failed to flush or close.
    #[error("telemetry shutdown failed: {0}")]
    Telemetry(#[from] TelemetryError),
}

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
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
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait up to `grace` for the server task to finish, aborting it afterwards.
///
/// Aborting stops the accept loop only. Connection tasks still running at
/// that point are dropped when the runtime shuts down at process exit.
pub async fn drain(
    mut server: JoinHandle<io::Result<()>>,
    grace: Duration,
) -> Result<(), ShutdownError> {
    match tokio::time::timeout(grace, &mut server).await {
        Ok(joined) => flatten(joined),
        Err(_) => {
            server.abort();
            tracing::warn!(grace = ?grace, "Grace period elapsed, aborting in-flight requests");
            Err(ShutdownError::Timeout(grace))
        }
    }
}

/// Collapse a joined server task into a single result.
pub fn flatten(joined: Result<io::Result<()>, JoinError>) -> Result<(), ShutdownError> {
    joined??;
    Ok(())
}

/// Flush and close the tracer provider on a blocking thread.
pub async fn flush_telemetry(telemetry: Telemetry) -> Result<(), ShutdownError> {
    tokio::task::spawn_blocking(move || telemetry.shutdown()).await??;
    Ok(())
}
