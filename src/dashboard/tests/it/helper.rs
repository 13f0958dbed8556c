use std::{collections::BTreeMap, sync::Arc};

use ais_stream::{
    Connector, ReconnectSettings, StreamSettings,
    test_helper::{MockConnection, MockConnector, MockOutcome, MockServer, MockSession},
};
use async_trait::async_trait;
use dashboard::{composition::Dashboard, headless::HeadlessMap, settings::MapSettings};
use futures::Future;
use seawatch_core::{ClusterSettings, ConnectionStatus, LatLon, Snapshot};
use serde_json::{Value, json};

pub const ZOOM: f64 = 10.0;

/// Hands every stream URL to its own [MockConnector].
#[derive(Clone)]
pub struct RoutingConnector {
    routes: Arc<BTreeMap<String, MockConnector>>,
}

pub struct TestStream {
    pub name: &'static str,
    pub enabled: bool,
    pub script: Vec<MockOutcome>,
}

pub struct TestHelper {
    pub dashboard: Dashboard<HeadlessMap>,
    connectors: BTreeMap<String, MockConnector>,
    servers: BTreeMap<String, MockServer>,
}

#[async_trait]
impl Connector for RoutingConnector {
    type Connection = MockConnection;

    async fn connect(&self, url: &str) -> ais_stream::Result<MockConnection> {
        self.routes[url].connect(url).await
    }
}

pub async fn test<T, Fut>(test_closure: T)
where
    T: FnOnce(TestHelper) -> Fut,
    Fut: Future<Output = ()>,
{
    test_with(
        vec![TestStream::enabled("all"), TestStream::enabled("rotterdam")],
        test_closure,
    )
    .await;
}

pub async fn test_with<T, Fut>(streams: Vec<TestStream>, test_closure: T)
where
    T: FnOnce(TestHelper) -> Fut,
    Fut: Future<Output = ()>,
{
    test_closure(TestHelper::new(streams)).await;
}

impl TestStream {
    pub fn enabled(name: &'static str) -> Self {
        Self {
            name,
            enabled: true,
            script: vec![],
        }
    }

    pub fn disabled(name: &'static str) -> Self {
        Self {
            enabled: false,
            ..Self::enabled(name)
        }
    }

    pub fn refusing(name: &'static str, reason: &str) -> Self {
        Self {
            script: vec![MockOutcome::Refuse(reason.into())],
            ..Self::enabled(name)
        }
    }
}

fn stream_url(name: &str) -> String {
    format!("ws://localhost/{name}")
}

impl TestHelper {
    pub fn new(streams: Vec<TestStream>) -> TestHelper {
        let mut connectors = BTreeMap::new();
        let mut servers = BTreeMap::new();
        let mut settings = Vec::with_capacity(streams.len());

        for stream in streams {
            let (connector, server) = MockConnector::new();
            connector.script(stream.script);
            connectors.insert(stream.name.to_string(), connector);
            servers.insert(stream.name.to_string(), server);
            settings.push(StreamSettings {
                name: stream.name.to_string(),
                url: stream_url(stream.name),
                enabled: stream.enabled,
                filter: None,
                reconnect: ReconnectSettings::default(),
            });
        }

        let routing = RoutingConnector {
            routes: Arc::new(
                connectors
                    .iter()
                    .map(|(name, c)| (stream_url(name), c.clone()))
                    .collect(),
            ),
        };

        let map = MapSettings {
            center: LatLon {
                latitude: 51.9225,
                longitude: 4.4792,
            },
            zoom: ZOOM,
            cluster: ClusterSettings::default(),
        };

        let dashboard = Dashboard::start(&settings, &map, routing, |_| HeadlessMap::new());

        TestHelper {
            dashboard,
            connectors,
            servers,
        }
    }

    pub fn connector(&self, stream: &str) -> &MockConnector {
        &self.connectors[stream]
    }

    pub async fn accept(&mut self, stream: &str) -> MockSession {
        self.servers.get_mut(stream).unwrap().accept().await
    }

    pub async fn wait_for_vessels(&self, stream: &str, count: usize) -> Snapshot {
        let mut snapshots = self.dashboard.stream(stream).unwrap().subscribe();
        let snapshot = snapshots.wait_for(|s| s.len() == count).await.unwrap().clone();
        snapshot
    }

    pub async fn wait_for_status(
        &self,
        stream: &str,
        condition: impl FnMut(&ConnectionStatus) -> bool,
    ) -> ConnectionStatus {
        let mut status = self
            .dashboard
            .stream(stream)
            .unwrap()
            .handle()
            .subscribe_status();
        let current = status.wait_for(condition).await.unwrap().clone();
        current
    }
}

pub fn vessel_payload(mmsi: i32, latitude: f64, longitude: f64) -> String {
    json!({
        "mmsi": mmsi,
        "ship_name": format!("VESSEL {mmsi}"),
        "latitude": latitude,
        "longitude": longitude,
        "speed": 8.5,
        "course": 90.0,
        "heading": 92,
        "nav_status": 0,
        "ship_type": 70,
        "destination": "ROTTERDAM",
        "timestamp": "2025-06-01T12:00:00Z"
    })
    .to_string()
}

pub fn risk_timeline() -> Value {
    json!({
        "city": "Rotterdam",
        "storm_threshold": 0.7,
        "timeline": [
            { "time": "2025-06-01 00:00:00", "risk_score": 0.25, "is_storm": false },
            { "time": "2025-06-01 03:00:00", "risk_score": 0.75, "is_storm": true }
        ]
    })
}

pub fn multi_metric() -> Value {
    json!({
        "city": "Rotterdam",
        "thresholds": { "high_waves": 3.0, "strong_wind": 10.0, "high_rain": 50.0 },
        "data": [
            { "time": "2025-06-01 00:00:00", "waveHeight": 1.2, "windSpeed": 6.0, "rainProbability": 20.0 },
            { "time": "2025-06-01 03:00:00", "waveHeight": 3.4, "windSpeed": 12.0, "rainProbability": 70.0 }
        ]
    })
}

pub fn risk_distribution() -> Value {
    json!({
        "city": "Rotterdam",
        "total_hours": 2,
        "distribution": { "Safe": 1, "Moderate": 0, "High": 0, "Dangerous": 1 },
        "percentages": { "Safe": 50.0, "Moderate": 0.0, "High": 0.0, "Dangerous": 50.0 }
    })
}

pub fn insights() -> Value {
    json!({
        "city": "Rotterdam",
        "insights": [{
            "time": "2025-06-01 03:00:00",
            "waveHeight": 3.4,
            "windSpeed": 12.0,
            "pop": 0.7,
            "risk_score": 0.75,
            "cross_angle": 45.0,
            "storm_flag": true,
            "temperature": 14.5,
            "pressure": 998.0,
            "seaLevel": 0.4
        }],
        "summary": {
            "max_risk": 0.75,
            "max_risk_time": "2025-06-01 03:00:00",
            "storm_hours": ["2025-06-01 03:00:00"],
            "avg_wave_height": 2.3,
            "avg_wind_speed": 9.0
        }
    })
}

pub fn marine_data() -> Value {
    json!({
        "hours": [{
            "time": "2025-06-01T12:00:00+00:00",
            "waveHeight": { "sg": 2.4, "noaa": 1.6 },
            "waveDirection": { "sg": 250.0 },
            "seaLevel": { "sg": 0.3 },
            "currentSpeed": { "sg": 0.2 },
            "currentDirection": { "sg": 180.0 }
        }]
    })
}

pub fn weather_data() -> Value {
    json!({
        "list": [{
            "dt": 1748779200,
            "main": { "temp": 288.15, "feels_like": 286.15, "pressure": 1010, "humidity": 80 },
            "weather": [{ "description": "overcast clouds", "icon": "04d" }],
            "wind": { "speed": 5.0, "deg": 200 },
            "visibility": 8000,
            "pop": 0.1,
            "dt_txt": "2025-06-01 12:00:00"
        }],
        "city": { "name": "Rotterdam" }
    })
}
