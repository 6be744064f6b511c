//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize the tracer provider before anything serves traffic
//! - Bind the listener and start the server task
//! - Wait for the interrupt, then run the bounded shutdown sequence
//!
//! Any startup error is fatal; shutdown errors are only logged.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::RatingConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::{self, Shutdown};
use crate::lifecycle::signals;
use crate::observability::{metrics, Telemetry, TelemetryError};

/// Errors that prevent the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("tracing initialization failed: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("failed to bind listener: {0}")]
    Bind(#[from] io::Error),
}

/// Start the service and block until it has shut down.
pub async fn run(config: RatingConfig) -> Result<(), StartupError> {
    let telemetry = Telemetry::init(&config.telemetry)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, &telemetry);
    let grace = server.config().shutdown.grace_period();
    serve(server, listener, telemetry, grace, signals::interrupt()).await;
    Ok(())
}

/// Serve until `signal` resolves, then drain for at most `grace` and flush telemetry.
///
/// Shutdown failures are logged and swallowed.
pub async fn serve<F>(
    server: HttpServer,
    listener: TcpListener,
    telemetry: Telemetry,
    grace: Duration,
    signal: F,
) where
    F: Future<Output = io::Result<()>>,
{
    let coordinator = Shutdown::new();
    let mut task = tokio::spawn(server.run(listener, coordinator.subscribe()));

    let stopped_early = tokio::select! {
        received = signal => {
            if let Err(e) = received {
                tracing::error!(error = %e, "Failed to listen for interrupt, shutting down");
            }
            None
        }
        joined = &mut task => Some(joined),
    };

    let drained = match stopped_early {
        None => {
            coordinator.trigger();
            shutdown::drain(task, grace).await
        }
        Some(joined) => {
            tracing::error!("HTTP server exited before shutdown was requested");
            shutdown::flatten(joined)
        }
    };
    if let Err(e) = drained {
        tracing::error!(error = %e, "Error shutting down HTTP server");
    }

    if let Err(e) = shutdown::flush_telemetry(telemetry).await {
        tracing::error!(error = %e, "Error shutting down tracer provider");
    }

    tracing::info!("Shutdown complete");
}
