//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, access log)
//!     → metrics.rs (request counters and latency histograms)
//!     → tracing.rs (OpenTelemetry spans per layer)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → Prometheus scrape endpoint (optional)
//!     → OTLP collector (batched span export)
//! ```
//!
//! # Design Decisions
//! - Log events go through `tracing`; spans meant for the collector go
//!   through the OpenTelemetry SDK directly
//! - The tracer provider is an explicit object handed to each component,
//!   and is flushed on shutdown
//! - Tracing is a startup precondition: a broken exporter config is fatal

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::tracing::{Telemetry, TelemetryError};
