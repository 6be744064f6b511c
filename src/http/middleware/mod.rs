//! Per-request middleware.

pub mod telemetry;

pub use telemetry::trace_request;
