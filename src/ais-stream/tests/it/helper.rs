use std::time::Duration;

use ais_stream::{
    FeedStatsHandle, ReconnectPolicy, StreamHandle, VesselFeed,
    test_helper::{MockConnector, MockOutcome, MockServer},
};
use futures::Future;
use seawatch_core::{ConnectionState, ConnectionStatus, Snapshot};
use tokio::sync::watch;

pub const RECONNECT_DELAY: Duration = Duration::from_millis(3000);

pub struct TestHelper {
    pub connector: MockConnector,
    pub server: MockServer,
    pub handle: StreamHandle,
    pub snapshots: watch::Receiver<Snapshot>,
    pub stats: FeedStatsHandle,
}

pub async fn test<T, Fut>(test_closure: T)
where
    T: FnOnce(TestHelper) -> Fut,
    Fut: Future<Output = ()>,
{
    test_closure(TestHelper::new(true, [])).await;
}

impl TestHelper {
    pub fn new(enabled: bool, script: impl IntoIterator<Item = MockOutcome>) -> TestHelper {
        let (connector, server) = MockConnector::new();
        connector.script(script);

        let feed = VesselFeed::new("test", None);
        let snapshots = feed.subscribe();
        let stats = feed.stats();

        let handle = StreamHandle::spawn(
            "test",
            "ws://localhost/stream",
            enabled,
            ReconnectPolicy::fixed(RECONNECT_DELAY),
            connector.clone(),
            feed,
        );

        TestHelper {
            connector,
            server,
            handle,
            snapshots,
            stats,
        }
    }

    pub async fn wait_for_state(&self, state: ConnectionState) -> ConnectionStatus {
        wait_for_status(&self.handle, |s| s.state == state).await
    }

    pub async fn wait_for_vessels(&mut self, count: usize) -> Snapshot {
        self.snapshots
            .wait_for(|s| s.len() == count)
            .await
            .unwrap()
            .clone()
    }
}

pub async fn wait_for_status(
    handle: &StreamHandle,
    condition: impl FnMut(&ConnectionStatus) -> bool,
) -> ConnectionStatus {
    let mut status = handle.subscribe_status();
    let current = status.wait_for(condition).await.unwrap().clone();
    current
}
