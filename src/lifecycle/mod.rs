//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Init logging → Init tracer provider (fatal on error) → Bind listener
//!     → Spawn server task
//!
//! Signals (signals.rs):
//!     SIGINT / Ctrl-C → Trigger graceful shutdown
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → Drain in-flight requests (bounded)
//!     → Abort leftovers → Flush tracer provider → Exit
//! ```
//!
//! # Design Decisions
//! - The server runs on its own task; the main task only waits for the signal
//! - Shutdown has a deadline: stuck requests are aborted, not awaited
//! - Shutdown failures are logged, never retried

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownError};
