//! End-to-end iterations of the closed-state race harness.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use is_closed_demo::config::{HarnessConfig, Target, Transport};
use is_closed_demo::harness::{read_and_compare, BugSignal, DriverState, ReadOutcome};
use is_closed_demo::net::{Connector, HandshakeEvent, SocketConnector};
use is_closed_demo::Harness;

mod common;

use common::LaggingConnector;

fn config(target: Target, transport: Transport, delay_ms: u64) -> HarnessConfig {
    HarnessConfig::new(target, transport, Duration::from_millis(delay_ms))
        .with_close_delay(Duration::from_millis(100))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plain_socket_stays_consistent() {
    let addr = common::start_echo_server().await;

    let outcomes = tokio::task::spawn_blocking(move || {
        let connector = SocketConnector::new(Transport::Plain).unwrap();
        let harness = Harness::new(
            connector,
            config(Target::new("127.0.0.1", addr.port()), Transport::Plain, 0),
        );

        let outcomes: Vec<_> = (1..=3).map(|i| harness.run_iteration(i).unwrap()).collect();
        assert_eq!(harness.state(), DriverState::Running);
        assert!(!harness.signal().is_raised());
        outcomes
    })
    .await
    .unwrap();

    assert_eq!(outcomes, vec![ReadOutcome::Consistent { closed: true }; 3]);
}

#[test]
fn test_lagging_close_detected_on_first_iteration() {
    let connector = LaggingConnector::new(Duration::from_millis(50));
    let connects = connector.connects.clone();
    let harness = Harness::new(connector, config(Target::new("localhost", 443), Transport::Tls, 50));

    let report = harness.run().unwrap().expect("bug should be observed");

    assert_eq!(report.iterations, 1);
    assert_eq!(
        report.observation,
        ReadOutcome::Inconsistent { before: false, after: true }
    );
    assert_eq!(connects.load(Ordering::SeqCst), 1);
}

#[test]
fn test_no_iterations_after_done() {
    let connector = LaggingConnector::new(Duration::from_millis(50));
    let connects = connector.connects.clone();
    let harness = Harness::new(connector, config(Target::new("localhost", 443), Transport::Tls, 50));

    harness.run().unwrap();
    assert_eq!(harness.state(), DriverState::Done);

    assert!(harness.run().unwrap().is_none());
    assert_eq!(connects.load(Ordering::SeqCst), 1);
}

#[test]
fn test_zero_delay_compares_immediate_samples() {
    let connector = LaggingConnector::new(Duration::from_millis(50));
    let harness = Harness::new(connector, config(Target::new("localhost", 443), Transport::Tls, 0));

    let outcome = harness.run_iteration(1).unwrap();

    // Both samples land inside the lag window.
    assert_eq!(outcome, ReadOutcome::Consistent { closed: false });
    assert!(!harness.signal().is_raised());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_close_before_read_fails_fast() {
    let addr = common::start_echo_server().await;

    let (outcome, elapsed) = tokio::task::spawn_blocking(move || {
        let connector = SocketConnector::new(Transport::Plain).unwrap();
        let conn = connector.connect(&Target::new("127.0.0.1", addr.port())).unwrap();
        conn.close().unwrap();

        let started = Instant::now();
        let outcome = read_and_compare(conn.as_ref(), Duration::ZERO, &BugSignal::new());
        (outcome, started.elapsed())
    })
    .await
    .unwrap();

    assert_eq!(outcome, ReadOutcome::Consistent { closed: true });
    assert!(elapsed < Duration::from_secs(1));
}

#[test]
fn test_tls_close_reports_stale_state() {
    let (addr, client_config) = common::start_tls_server();

    let handshakes = Arc::new(AtomicUsize::new(0));
    let counted = handshakes.clone();
    let connector = SocketConnector::with_client_config(client_config).with_handshake_listener(
        Arc::new(move |_: &HandshakeEvent| {
            counted.fetch_add(1, Ordering::SeqCst);
        }),
    );
    let config = HarnessConfig::new(Target::new("localhost", addr.port()), Transport::Tls, Duration::from_millis(50))
        .with_close_delay(Duration::from_millis(300));
    let harness = Harness::new(connector, config);

    let outcomes: Vec<_> = (1..=3).map(|i| harness.run_iteration(i).unwrap()).collect();

    assert_eq!(handshakes.load(Ordering::SeqCst), 3);
    assert_eq!(
        outcomes,
        vec![ReadOutcome::Inconsistent { before: false, after: true }; 3]
    );
    assert_eq!(harness.state(), DriverState::Done);
}
