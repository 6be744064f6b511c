//! Product rating service.
//!
//! # Architecture Overview
//!
//! ```text
//!     GET /product/{id}
//!     ─────────────────▶ ┌──────────────┐   ┌───────────┐   ┌──────────────┐
//!                        │ http handler │──▶│  service  │──▶│  repository  │
//!     ◀───────────────── │  + span      │◀──│  + span   │◀──│  + span      │
//!     200 / 400 / 404    └──────────────┘   └───────────┘   └──────────────┘
//!                               │                 │                │
//!                               └─────────────────┼────────────────┘
//!                                                 ▼
//!                                      tracer provider (batched)
//!                                                 │
//!                                                 ▼
//!                                          OTLP collector
//! ```

use std::path::PathBuf;

use clap::Parser;

use rating_service::config::{load_config, RatingConfig};
use rating_service::lifecycle::startup;
use rating_service::observability::logging;

#[derive(Parser)]
#[command(name = "rating-service")]
#[command(about = "Serves product ratings over HTTP", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RatingConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        collector_endpoint = %config.telemetry.collector_endpoint,
        grace_period_secs = config.shutdown.grace_period_secs,
        "rating-service starting"
    );

    startup::run(config).await?;
    Ok(())
}
