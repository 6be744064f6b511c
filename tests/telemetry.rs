//! Process-wide telemetry registration. Kept in its own test binary because it
//! replaces the global provider and propagator.

use opentelemetry::global;
use rating_service::config::TelemetryConfig;
use rating_service::lifecycle::shutdown::flush_telemetry;
use rating_service::Telemetry;

#[tokio::test]
async fn test_init_registers_global_propagator() {
    let config = TelemetryConfig {
        collector_endpoint: "http://127.0.0.1:4318/v1/traces".to_string(),
        ..TelemetryConfig::default()
    };

    let telemetry = Telemetry::init(&config).expect("valid endpoint initializes");

    let fields: Vec<String> =
        global::get_text_map_propagator(|p| p.fields().map(str::to_string).collect());
    assert!(fields.iter().any(|f| f == "traceparent"), "fields: {fields:?}");
    assert!(fields.iter().any(|f| f == "baggage"), "fields: {fields:?}");

    flush_telemetry(telemetry).await.unwrap();
}
