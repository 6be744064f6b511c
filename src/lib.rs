//! Product rating service with distributed tracing.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rating;

pub use config::RatingConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::Telemetry;
pub use rating::{Rating, RatingError};
