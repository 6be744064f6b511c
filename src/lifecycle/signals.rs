//! OS signal handling.
//!
//! Only the interrupt signal is observed; it triggers graceful shutdown.

/// Resolve once an interrupt (Ctrl-C / SIGINT) is received.
pub async fn interrupt() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    Ok(())
}
