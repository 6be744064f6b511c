//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the rating routes
//! - Wire up middleware (request ID, access log, timeout, tracing)
//! - Serve on a listener until the shutdown signal fires

use std::io;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderName, Request, StatusCode},
    middleware,
    routing::get,
    Router,
};
use opentelemetry_sdk::trace::SdkTracer;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::RatingConfig;
use crate::http::handlers;
use crate::http::middleware::trace_request;
use crate::observability::Telemetry;
use crate::rating::{DefaultRatingService, InMemoryRatingRepository, RatingService};

/// Header carrying the per-request identifier.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn RatingService>,
    pub tracer: SdkTracer,
}

/// HTTP server for the rating API.
pub struct HttpServer {
    router: Router,
    config: RatingConfig,
}

impl HttpServer {
    /// Create a server over the seeded in-memory repository.
    pub fn new(config: RatingConfig, telemetry: &Telemetry) -> Self {
        let tracer = telemetry.tracer();
        let repository = InMemoryRatingRepository::new(tracer.clone());
        let service = DefaultRatingService::new(repository, tracer.clone());
        Self::with_service(config, Arc::new(service), tracer)
    }

    /// Create a server over an arbitrary service implementation.
    pub fn with_service(
        config: RatingConfig,
        service: Arc<dyn RatingService>,
        tracer: SdkTracer,
    ) -> Self {
        let state = AppState { service, tracer };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RatingConfig, state: AppState) -> Router {
        Router::new()
            .route("/product/{id}", get(handlers::get_rating))
            .route("/product/", get(handlers::missing_product_id))
            .route_layer(middleware::from_fn_with_state(state.clone(), trace_request))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                config.timeouts.request(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID)))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get(X_REQUEST_ID)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("unknown");
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id
                        )
                    })
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(SetRequestIdLayer::new(
                HeaderName::from_static(X_REQUEST_ID),
                MakeRequestUuid,
            ))
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain open connections.
    ///
    /// Draining is unbounded here; the caller enforces the deadline.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Configuration the server was built with.
    pub fn config(&self) -> &RatingConfig {
        &self.config
    }
}
