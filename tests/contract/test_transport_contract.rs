//! Contract Tests: Transport
//!
//! Behavior every `Transport` implementation must honor, checked against the
//! scripted mock and, where no device is needed, the SSH transport.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::sync::Arc;
use std::time::{Duration, Instant};

use netconsole::config::TransportConfig;
use netconsole::console::dispatch;
use netconsole::models::ConnectionProfile;
use netconsole::transport::{RunError, SshTransport, Transport};
use test_utils::{create_test_profile, MockTransport, TEST_PASSWORD};

fn transports() -> Vec<Arc<dyn Transport>> {
    vec![
        Arc::new(MockTransport::new()),
        Arc::new(SshTransport::default()),
    ]
}

#[test]
fn test_transports_are_named() {
    for transport in transports() {
        assert!(!transport.name().is_empty());
    }
}

#[test]
fn test_ssh_transport_port_from_config() {
    let config = TransportConfig {
        port: 2222,
        ..TransportConfig::default()
    };
    assert_eq!(SshTransport::from_config(&config).port(), 2222);
    assert_eq!(SshTransport::default().port(), 22);
}

#[tokio::test]
async fn test_session_runs_command_and_closes() {
    let transport = MockTransport::new().respond("show run | include ip route", "ip route 0.0.0.0 0.0.0.0 10.0.0.254");
    let mut session = transport
        .connect(&create_test_profile(), Duration::from_secs(1))
        .await
        .unwrap();

    let output = session
        .run("show run | include ip route", Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(output, "ip route 0.0.0.0 0.0.0.0 10.0.0.254");

    session.close().await.unwrap();
    assert!(matches!(
        session.run("show run | include ip route", Duration::from_secs(1)).await,
        Err(RunError::Closed)
    ));
    assert_eq!(transport.close_count(), 1);
}

#[tokio::test]
async fn test_connect_error_names_host() {
    let transport = MockTransport::new().failing_connect("authentication failed");
    let err = match transport
        .connect(&create_test_profile(), Duration::from_secs(1))
        .await
    {
        Err(err) => err,
        Ok(_) => panic!("connect should fail"),
    };
    assert_eq!(err.host, "10.0.0.1");
    assert_eq!(err.reason, "authentication failed");
}

#[tokio::test]
async fn test_ssh_refused_connection_is_connect_error() {
    let transport = SshTransport::new(1);
    let profile = ConnectionProfile::new("loopback", "127.0.0.1", "admin", TEST_PASSWORD);

    let started = Instant::now();
    let err = match transport.connect(&profile, Duration::from_secs(5)).await {
        Err(err) => err,
        Ok(_) => panic!("nothing should be listening on port 1"),
    };

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(err.host, "127.0.0.1");
    assert!(!err.to_string().contains(TEST_PASSWORD));
}

#[tokio::test]
async fn test_ssh_unresolvable_host_is_connect_error() {
    let transport = SshTransport::default();
    let profile = ConnectionProfile::new("nowhere", "does-not-exist.invalid", "admin", TEST_PASSWORD);

    let err = match transport.connect(&profile, Duration::from_secs(5)).await {
        Err(err) => err,
        Ok(_) => panic!(".invalid names never resolve"),
    };
    assert_eq!(err.host, "does-not-exist.invalid");
    assert!(!err.reason.contains(TEST_PASSWORD));
}

#[tokio::test]
async fn test_execute_works_through_trait_object() {
    let transport: Arc<dyn Transport> =
        Arc::new(MockTransport::new().respond("show ip interface brief", "Gi0/0 up up"));
    let request = netconsole::console::DispatchRequest::new(
        "show ip interface brief",
        create_test_profile(),
        Duration::from_secs(1),
        Duration::from_secs(1),
    );

    let completion = dispatch::execute(transport.as_ref(), &request).await;
    assert_eq!(completion.id, request.id);
    assert!(completion.result.succeeded);
}
