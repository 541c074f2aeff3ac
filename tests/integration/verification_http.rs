//! Integration tests for production-mode verification over HTTP

use super::test_utils::{authority, closed_endpoint, people, spawn_silent, spawn_stub};
use slothframe::hasher::digest;
use slothframe::{Frame, FrameError, GateState};

#[tokio::test]
async fn test_affirmed_unlocks_once() {
    let stub = spawn_stub(200).await;
    let mut frame = Frame::new(people(), authority(Some("prod"), Some(stub.url.clone()), 5));

    frame.unlock("prod-token").await.unwrap();
    frame.unlock("prod-token").await.unwrap();

    assert_eq!(frame.state(), GateState::Unlocked);
    assert_eq!(stub.hits(), 1, "second unlock must not contact the authority");
}

#[tokio::test]
async fn test_request_carries_digest_not_token() {
    let stub = spawn_stub(200).await;
    let mut frame = Frame::new(people(), authority(None, Some(stub.url.clone()), 5));
    frame.unlock("prod-token").await.unwrap();

    let bodies = stub.bodies();
    assert_eq!(bodies.len(), 1);
    let body: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(body["client_id"], "sloth_frame_v1");
    assert_eq!(body["token_hash"], digest("prod-token").to_hex());
    assert!(body["timestamp"].as_f64().unwrap() > 0.0);
    assert!(!bodies[0].contains("prod-token"));
}

#[tokio::test]
async fn test_non_200_is_rejection() {
    let stub = spawn_stub(403).await;
    let mut frame = Frame::new(people(), authority(Some("prod"), Some(stub.url.clone()), 5));

    let err = frame.unlock("prod-token").await.unwrap_err();
    assert!(matches!(err, FrameError::RejectedCredential { status: 403 }));
    assert_eq!(frame.state(), GateState::Locked);

    // Failed attempts are retried in full.
    assert!(frame.unlock("prod-token").await.is_err());
    assert_eq!(stub.hits(), 2);
}

#[tokio::test]
async fn test_missing_endpoint_is_configuration_error() {
    let mut frame = Frame::new(people(), authority(None, None, 5));
    let err = frame.unlock("prod-token").await.unwrap_err();
    assert!(matches!(err, FrameError::ConfigurationError(_)));
    assert_eq!(frame.state(), GateState::Locked);
}

#[tokio::test]
async fn test_closed_port_is_transport_error() {
    let endpoint = closed_endpoint().await;
    let mut frame = Frame::new(people(), authority(Some("prod"), Some(endpoint), 5));
    let err = frame.unlock("prod-token").await.unwrap_err();
    assert!(matches!(err, FrameError::TransportError(_)));
    assert_eq!(frame.state(), GateState::Locked);
}

#[tokio::test]
async fn test_silent_authority_times_out() {
    let endpoint = spawn_silent().await;
    let mut frame = Frame::new(people(), authority(Some("prod"), Some(endpoint), 1));

    let started = std::time::Instant::now();
    let err = frame.unlock("prod-token").await.unwrap_err();
    assert!(matches!(err, FrameError::TransportError(ref msg) if msg.contains("timeout")));
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
    assert_eq!(frame.state(), GateState::Locked);
}
