//! End-to-end tests over TCP, including graceful shutdown.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use rating_service::config::RatingConfig;
use rating_service::lifecycle::startup::serve;
use rating_service::{HttpServer, Rating};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

mod common;

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Future resolving when the returned sender fires, standing in for SIGINT.
fn manual_signal() -> (oneshot::Sender<()>, impl Future<Output = io::Result<()>>) {
    let (tx, rx) = oneshot::channel::<()>();
    (tx, async move {
        let _ = rx.await;
        Ok(())
    })
}

async fn wait_for_calls(service: &common::ScriptedService, expected: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while service.calls() < expected {
        assert!(Instant::now() < deadline, "request never reached the service");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn spawn_request(addr: SocketAddr, path: &str) -> JoinHandle<reqwest::Result<reqwest::Response>> {
    let request = client().get(format!("http://{addr}{path}")).send();
    tokio::spawn(request)
}

#[tokio::test]
async fn test_serves_seeded_ratings_over_tcp() {
    let (telemetry, _exporter) = common::in_memory_telemetry();
    let server = HttpServer::new(RatingConfig::default(), &telemetry);
    let (listener, addr) = common::local_listener().await;
    let (signal, signal_fut) = manual_signal();
    let serving = tokio::spawn(serve(
        server,
        listener,
        telemetry,
        Duration::from_secs(3),
        signal_fut,
    ));

    let client = client();
    let ok = client.get(format!("http://{addr}/product/1")).send().await.unwrap();
    assert_eq!(ok.status(), 200);
    assert_eq!(ok.json::<Rating>().await.unwrap(), Rating::new(1, 4));

    let missing = client.get(format!("http://{addr}/product/99")).send().await.unwrap();
    assert_eq!(missing.status(), 404);
    assert_eq!(missing.text().await.unwrap(), "rating not found");

    let invalid = client.get(format!("http://{addr}/product/foo")).send().await.unwrap();
    assert_eq!(invalid.status(), 400);
    assert_eq!(invalid.text().await.unwrap(), "invalid parameter");

    signal.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), serving)
        .await
        .expect("server did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_inflight_request_completes_on_interrupt() {
    let (telemetry, _exporter) = common::in_memory_telemetry();
    let service =
        common::ScriptedService::delayed(Ok(Rating::new(1, 4)), Duration::from_millis(500));
    let server =
        HttpServer::with_service(RatingConfig::default(), service.clone(), telemetry.tracer());
    let (listener, addr) = common::local_listener().await;
    let (signal, signal_fut) = manual_signal();
    let grace = Duration::from_secs(3);
    let serving = tokio::spawn(serve(server, listener, telemetry, grace, signal_fut));

    let request = spawn_request(addr, "/product/1");
    wait_for_calls(&service, 1).await;

    let interrupted = Instant::now();
    signal.send(()).unwrap();

    let response = request.await.unwrap().expect("in-flight request failed");
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), r#"{"product_id":1,"value":4}"#);

    tokio::time::timeout(grace, serving)
        .await
        .expect("shutdown exceeded the grace period")
        .unwrap();
    assert!(interrupted.elapsed() < grace);
}

#[tokio::test]
async fn test_stuck_request_does_not_block_shutdown() {
    let (telemetry, _exporter) = common::in_memory_telemetry();
    let service =
        common::ScriptedService::delayed(Ok(Rating::new(1, 4)), Duration::from_secs(30));
    let mut config = RatingConfig::default();
    config.shutdown.grace_period_secs = 1;
    let server = HttpServer::with_service(config, service.clone(), telemetry.tracer());
    let grace = server.config().shutdown.grace_period();
    assert_eq!(grace, Duration::from_secs(1));
    let (listener, addr) = common::local_listener().await;
    let (signal, signal_fut) = manual_signal();
    let serving = tokio::spawn(serve(server, listener, telemetry, grace, signal_fut));

    let _request = spawn_request(addr, "/product/1");
    wait_for_calls(&service, 1).await;

    let interrupted = Instant::now();
    signal.send(()).unwrap();

    tokio::time::timeout(Duration::from_secs(5), serving)
        .await
        .expect("shutdown waited on a stuck request")
        .unwrap();
    assert!(interrupted.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_new_connections_refused_after_shutdown() {
    let (telemetry, _exporter) = common::in_memory_telemetry();
    let server = HttpServer::new(RatingConfig::default(), &telemetry);
    let (listener, addr) = common::local_listener().await;
    let (signal, signal_fut) = manual_signal();
    let serving = tokio::spawn(serve(
        server,
        listener,
        telemetry,
        Duration::from_secs(3),
        signal_fut,
    ));

    signal.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), serving)
        .await
        .expect("server did not stop")
        .unwrap();

    assert!(client().get(format!("http://{addr}/product/1")).send().await.is_err());
}
