use std::time::Duration;

use ais_stream::{
    ReconnectPolicy, StreamHandle,
    test_helper::{MockConnector, MockOutcome, RecordingSink},
};
use seawatch_core::ConnectionState;
use tokio::time::{Instant, sleep};

use crate::helper::*;

#[tokio::test(start_paused = true)]
async fn test_stream_connects_on_spawn() {
    test(|mut helper| async move {
        let _session = helper.server.accept().await;

        let status = helper.wait_for_state(ConnectionState::Connected).await;

        assert!(status.last_error.is_none());
        assert_eq!(helper.connector.attempts(), 1);
        assert_eq!(helper.connector.live_connections(), 1);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_disabled_stream_never_connects() {
    let helper = TestHelper::new(false, []);

    sleep(Duration::from_secs(30)).await;

    assert_eq!(helper.connector.attempts(), 0);
    assert_eq!(helper.handle.status().state, ConnectionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_failed_handshake_is_retried_with_fixed_delay() {
    let helper = TestHelper::new(
        true,
        [
            MockOutcome::Refuse("connection refused".into()),
            MockOutcome::Refuse("connection refused".into()),
        ],
    );
    let start = Instant::now();

    let status = wait_for_status(&helper.handle, |s| s.last_error.is_some()).await;
    assert_eq!(status.last_error.as_deref(), Some("connection refused"));

    let status = helper.wait_for_state(ConnectionState::Connected).await;

    assert!(status.last_error.is_none());
    assert_eq!(helper.connector.attempts(), 3);
    assert!(start.elapsed() >= RECONNECT_DELAY * 2);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_cancels_pending_reconnect() {
    test(|mut helper| async move {
        let session = helper.server.accept().await;
        helper.wait_for_state(ConnectionState::Connected).await;

        drop(session);
        helper.wait_for_state(ConnectionState::Disconnected).await;

        helper.handle.close().await;
        sleep(RECONNECT_DELAY * 10).await;

        assert_eq!(helper.connector.attempts(), 1);
        assert_eq!(helper.connector.live_connections(), 0);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_error_followed_by_close_reconnects_once() {
    test(|mut helper| async move {
        let session = helper.server.accept().await;
        helper.wait_for_state(ConnectionState::Connected).await;

        session.fail("connection reset by peer");

        let _second = helper.server.accept().await;
        helper.wait_for_state(ConnectionState::Connected).await;
        sleep(RECONNECT_DELAY * 10).await;

        assert_eq!(helper.connector.attempts(), 2);
        assert!(helper.server.try_accept().is_none());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_is_reported_until_reconnected() {
    let helper = TestHelper::new(
        true,
        [MockOutcome::Accept, MockOutcome::Refuse("down".into())],
    );
    let mut server = helper.server;
    let session = server.accept().await;
    wait_for_status(&helper.handle, |s| s.state == ConnectionState::Connected).await;

    session.fail("connection reset by peer");

    let status = wait_for_status(&helper.handle, |s| s.last_error.is_some()).await;
    assert_eq!(
        status.last_error.as_deref(),
        Some("connection reset by peer")
    );
    let status = wait_for_status(&helper.handle, |s| {
        s.last_error.as_deref() == Some("down")
    })
    .await;
    assert_ne!(status.state, ConnectionState::Connected);

    let _session = server.accept().await;
    let status = wait_for_status(&helper.handle, |s| s.state == ConnectionState::Connected).await;
    assert!(status.last_error.is_none());
    assert_eq!(helper.connector.attempts(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_disable_closes_connection_and_enable_reconnects() {
    test(|mut helper| async move {
        let session = helper.server.accept().await;
        helper.wait_for_state(ConnectionState::Connected).await;

        helper.handle.disable();
        let status = helper.wait_for_state(ConnectionState::Disconnected).await;

        assert!(status.last_error.is_none());
        assert_eq!(session.client_closes(), 1);
        assert_eq!(helper.connector.live_connections(), 0);

        sleep(RECONNECT_DELAY * 10).await;
        assert_eq!(helper.connector.attempts(), 1);

        helper.handle.enable();
        let _session = helper.server.accept().await;
        helper.wait_for_state(ConnectionState::Connected).await;
        assert_eq!(helper.connector.attempts(), 2);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_disable_during_handshake_abandons_attempt() {
    let mut helper = TestHelper::new(true, [MockOutcome::Hang]);
    helper.wait_for_state(ConnectionState::Connecting).await;

    helper.handle.disable();
    helper.wait_for_state(ConnectionState::Disconnected).await;
    sleep(RECONNECT_DELAY * 10).await;
    assert_eq!(helper.connector.attempts(), 1);

    helper.handle.enable();
    let _session = helper.server.accept().await;
    helper.wait_for_state(ConnectionState::Connected).await;
    assert_eq!(helper.connector.attempts(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_enable_is_noop_while_connected() {
    test(|mut helper| async move {
        let _session = helper.server.accept().await;
        helper.wait_for_state(ConnectionState::Connected).await;

        helper.handle.enable();
        helper.handle.enable();
        sleep(RECONNECT_DELAY * 2).await;

        assert_eq!(helper.connector.attempts(), 1);
        assert_eq!(helper.connector.live_connections(), 1);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_tears_down_driver() {
    test(|mut helper| async move {
        let _session = helper.server.accept().await;
        helper.wait_for_state(ConnectionState::Connected).await;

        drop(helper.handle);
        sleep(RECONNECT_DELAY * 10).await;

        assert_eq!(helper.connector.live_connections(), 0);
        assert_eq!(helper.connector.attempts(), 1);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_repeated_mount_and_unmount_leaks_nothing() {
    let (connector, mut server) = MockConnector::new();

    for _ in 0..50 {
        let handle = StreamHandle::spawn(
            "cycle",
            "ws://localhost/stream",
            true,
            ReconnectPolicy::fixed(RECONNECT_DELAY),
            connector.clone(),
            RecordingSink::default(),
        );
        let session = server.accept().await;
        wait_for_status(&handle, |s| s.state == ConnectionState::Connected).await;
        drop(session);
        wait_for_status(&handle, |s| s.state == ConnectionState::Disconnected).await;
        handle.close().await;
    }

    sleep(RECONNECT_DELAY * 10).await;

    assert_eq!(connector.attempts(), 50);
    assert_eq!(connector.live_connections(), 0);
    assert!(server.try_accept().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_messages_reach_sink_in_arrival_order() {
    let (connector, mut server) = MockConnector::new();
    let sink = RecordingSink::default();
    let handle = StreamHandle::spawn(
        "ordered",
        "ws://localhost/stream",
        true,
        ReconnectPolicy::default(),
        connector,
        sink.clone(),
    );
    let session = server.accept().await;

    for i in 0..100 {
        session.send(format!("{i}"));
    }
    sleep(Duration::from_millis(10)).await;

    let expected: Vec<String> = (0..100).map(|i| i.to_string()).collect();
    assert_eq!(sink.payloads(), expected);
    assert_eq!(handle.last_message().as_deref(), Some("99"));
    handle.close().await;
}
