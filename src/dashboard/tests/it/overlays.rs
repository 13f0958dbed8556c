use dashboard::{
    overlays::{LoadState, MarineData, MarineMetric, Overlay, WeatherData},
    settings::OverlaySource,
};
use http_client::HttpClient;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use crate::helper::*;

fn source(server: &MockServer, file: &str) -> OverlaySource {
    OverlaySource {
        url: format!("{}/{file}", server.uri()),
        active: false,
    }
}

#[tokio::test]
async fn test_overlay_is_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/marine_data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(marine_data()))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new();
    let mut overlay = Overlay::<MarineData>::new(&source(&server, "marine_data.json"));
    assert!(matches!(overlay.state(), LoadState::NotLoaded));

    let data = overlay.activate(&client).await.unwrap();
    let hour = data.current().unwrap();
    assert!((hour.average(MarineMetric::WaveHeight).unwrap() - 2.0).abs() < 1e-9);

    overlay.deactivate();
    assert!(!overlay.is_active());
    assert!(overlay.activate(&client).await.is_some());
    assert!(overlay.activate(&client).await.is_some());
    assert!(overlay.is_active());
}

#[tokio::test]
async fn test_failed_overlay_is_retried_after_reactivation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather_data.json"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather_data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_data()))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new();
    let mut overlay = Overlay::<WeatherData>::new(&source(&server, "weather_data.json"));

    assert!(overlay.activate(&client).await.is_none());
    assert!(matches!(overlay.state(), LoadState::Failed(_)));

    // Already active, nothing is fetched.
    assert!(overlay.activate(&client).await.is_none());

    overlay.deactivate();
    let data = overlay.activate(&client).await.unwrap();
    assert_eq!(data.city.name, "Rotterdam");
    let entry = data.current().unwrap();
    assert!((entry.temperature_celsius() - 15.0).abs() < 1e-9);
    assert!((entry.wind_kmh() - 18.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_undecodable_overlay_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let mut overlay = Overlay::<MarineData>::new(&source(&server, "marine_data.json"));

    assert!(overlay.activate(&HttpClient::new()).await.is_none());
    assert!(matches!(overlay.state(), LoadState::Failed(_)));
    assert!(overlay.data().is_none());
}

#[tokio::test]
async fn test_configured_client_does_not_retry_failed_overlay() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather_data.json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = crate::load("config/production.yml", "production")
        .http
        .client()
        .unwrap();
    let mut overlay = Overlay::<WeatherData>::new(&source(&server, "weather_data.json"));

    assert!(overlay.activate(&client).await.is_none());
    assert!(matches!(overlay.state(), LoadState::Failed(_)));
}
