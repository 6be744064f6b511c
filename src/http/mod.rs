//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, access log, timeout)
//!     → middleware/telemetry.rs (server span, metrics)
//!     → handlers.rs (parse id, call service, map outcome to status)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::{AppState, HttpServer};
