//! Rating domain subsystem.
//!
//! # Data Flow
//! ```text
//! http handler
//!     → service.rs (opens service span, delegates)
//!     → repository.rs (opens child span, looks up)
//!     → Rating | RatingError::NotFound back up unchanged
//! ```
//!
//! # Design Decisions
//! - Both layers are single-method traits so storage can be swapped
//!   without touching the transport
//! - The tracer is injected at construction; trace context is passed
//!   explicitly as `&opentelemetry::Context`
//! - Errors cross the layers unwrapped; only the handler maps them to
//!   status codes

pub mod repository;
pub mod service;
pub mod types;

pub use repository::{InMemoryRatingRepository, RatingRepository};
pub use service::{DefaultRatingService, RatingService};
pub use types::{Rating, RatingError, RatingResult};

/// Span attribute carrying the looked-up product identifier.
pub const PRODUCT_ID_ATTRIBUTE: &str = "productID";
