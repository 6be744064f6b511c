//! Distributed tracing support.
//!
//! # Responsibilities
//! - Build the OTLP span exporter and the tracer provider around it
//! - Register the provider and the W3C trace-context + baggage propagator
//!   as process defaults
//! - Hand out tracers to the components that open spans
//! - Flush buffered spans on shutdown
//!
//! # Design Decisions
//! - Every request is sampled
//! - Spans are exported in batches off the request path
//! - The exporter is built before anything global is touched, so a failed
//!   init leaves no half-registered state behind

use std::time::Duration;

use axum::http::Uri;
use opentelemetry::global;
use opentelemetry::propagation::TextMapCompositePropagator;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::{ExporterBuildError, WithExportConfig};
use opentelemetry_sdk::error::OTelSdkError;
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::{Sampler, SdkTracer, SdkTracerProvider, SpanExporter};
use opentelemetry_sdk::Resource;
use thiserror::Error;

use crate::config::TelemetryConfig;

/// Instrumentation scope of every tracer handed out by [`Telemetry`].
pub const INSTRUMENTATION_SCOPE: &str = "rating-server";

/// Resource attribute holding the numeric instance identifier.
pub const INSTANCE_ID_ATTRIBUTE: &str = "ID";

/// Errors raised while setting up or tearing down tracing.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The collector endpoint is not an absolute http(s) URI.
    #[error("invalid collector endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The OTLP exporter could not be constructed.
    #[error("failed to build span exporter: {0}")]
    Exporter(#[from] ExporterBuildError),

    /// Flushing or shutting down the provider failed.
    #[error("tracer provider error: {0}")]
    Provider(#[from] OTelSdkError),
}

/// Owner of the process tracer provider.
#[derive(Clone)]
pub struct Telemetry {
    provider: SdkTracerProvider,
}

impl Telemetry {
    /// Build the OTLP pipeline and register it as the process default.
    pub fn init(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        validate_endpoint(&config.collector_endpoint)?;

        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .with_endpoint(config.collector_endpoint.as_str())
            .with_timeout(Duration::from_secs(config.export_timeout_secs))
            .build()?;

        let telemetry = Self::with_batch_exporter(config, exporter);
        telemetry.install_global();

        tracing::info!(
            endpoint = %config.collector_endpoint,
            service_name = %config.service_name,
            instance_id = config.instance_id,
            "Tracer provider initialized"
        );
        Ok(telemetry)
    }

    /// Build a provider exporting through `exporter` in batches.
    ///
    /// Nothing is registered globally.
    pub fn with_batch_exporter<E>(config: &TelemetryConfig, exporter: E) -> Self
    where
        E: SpanExporter + 'static,
    {
        let provider = SdkTracerProvider::builder()
            .with_sampler(Sampler::AlwaysOn)
            .with_resource(resource(config))
            .with_batch_exporter(exporter)
            .build();
        Self { provider }
    }

    /// Wrap an already built provider.
    pub fn from_provider(provider: SdkTracerProvider) -> Self {
        Self { provider }
    }

    /// Register the provider and the composite propagator as process defaults.
    pub fn install_global(&self) {
        global::set_text_map_propagator(propagator());
        global::set_tracer_provider(self.provider.clone());
    }

    /// Tracer for this service's spans.
    pub fn tracer(&self) -> SdkTracer {
        self.provider.tracer(INSTRUMENTATION_SCOPE)
    }

    /// Export everything buffered so far.
    pub fn force_flush(&self) -> Result<(), TelemetryError> {
        self.provider.force_flush()?;
        Ok(())
    }

    /// Flush buffered spans and release the exporter.
    ///
    /// Blocks until the exporter is done; call it off the async executor.
    pub fn shutdown(&self) -> Result<(), TelemetryError> {
        self.provider.shutdown()?;
        Ok(())
    }
}

/// Resource describing this process.
pub fn resource(config: &TelemetryConfig) -> Resource {
    Resource::builder_empty()
        .with_service_name(config.service_name.clone())
        .with_attribute(KeyValue::new(INSTANCE_ID_ATTRIBUTE, config.instance_id))
        .build()
}

/// W3C trace-context plus baggage.
pub fn propagator() -> TextMapCompositePropagator {
    TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ])
}

fn validate_endpoint(endpoint: &str) -> Result<(), TelemetryError> {
    let invalid = |reason: String| TelemetryError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let uri: Uri = endpoint
        .parse()
        .map_err(|e: axum::http::uri::InvalidUri| invalid(e.to_string()))?;
    match uri.scheme_str() {
        Some("http") | Some("https") => {}
        _ => return Err(invalid("scheme must be http or https".to_string())),
    }
    if uri.host().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}
