use dashboard::{
    risk::{CardState, RiskCard, RiskDashboard},
    settings::RiskDashboardSettings,
};
use http_client::HttpClient;
use seawatch_core::RiskLevel;
use serde_json::Value;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use crate::helper::*;

async fn mount(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/rotterdam/{endpoint}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn dashboard(server: &MockServer) -> RiskDashboard {
    RiskDashboard::new(
        HttpClient::new(),
        RiskDashboardSettings {
            base_url: format!("{}/rotterdam/", server.uri()),
            load_on_start: true,
        },
    )
}

#[tokio::test]
async fn test_all_cards_load() {
    let server = MockServer::start().await;
    mount(&server, "risk-timeline", risk_timeline()).await;
    mount(&server, "multi-metric", multi_metric()).await;
    mount(&server, "risk-distribution", risk_distribution()).await;
    mount(&server, "insights", insights()).await;

    let mut risk = dashboard(&server);
    assert!(risk.timeline.is_loading());

    risk.load_all().await;

    assert!(risk.failed_cards().is_empty());
    let timeline = risk.timeline.loaded().unwrap();
    assert_eq!(timeline.storm_hours().count(), 1);
    assert_eq!(risk.multi_metric.loaded().unwrap().alert_hours(), 1);
    assert_eq!(
        risk.distribution.loaded().unwrap().dominant_level(),
        RiskLevel::Dangerous
    );
    let insights = risk.insights.loaded().unwrap();
    assert_eq!(insights.summary.level(), RiskLevel::Dangerous);
    assert!(insights.summary.has_storm());
}

#[tokio::test]
async fn test_failing_card_does_not_affect_the_others() {
    let server = MockServer::start().await;
    mount(&server, "risk-timeline", risk_timeline()).await;
    mount(&server, "multi-metric", multi_metric()).await;
    mount(&server, "risk-distribution", risk_distribution()).await;
    Mock::given(method("GET"))
        .and(path("/rotterdam/insights"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut risk = dashboard(&server);
    risk.load_all().await;

    assert_eq!(risk.failed_cards(), vec![RiskCard::Insights]);
    assert_eq!(
        risk.insights,
        CardState::Failed("Failed to fetch insights: Service Unavailable".into())
    );
    assert!(risk.timeline.loaded().is_some());
    assert!(risk.multi_metric.loaded().is_some());
    assert!(risk.distribution.loaded().is_some());
}

#[tokio::test]
async fn test_retry_reloads_only_the_failed_card() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rotterdam/risk-timeline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(risk_timeline()))
        .expect(1)
        .mount(&server)
        .await;
    mount(&server, "multi-metric", multi_metric()).await;
    mount(&server, "risk-distribution", risk_distribution()).await;
    Mock::given(method("GET"))
        .and(path("/rotterdam/insights"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount(&server, "insights", insights()).await;

    let mut risk = dashboard(&server);
    risk.load_all().await;
    assert_eq!(
        risk.error(RiskCard::Insights),
        Some("Failed to fetch insights: Internal Server Error")
    );

    risk.retry(RiskCard::Insights).await;

    assert!(risk.failed_cards().is_empty());
    assert_eq!(risk.insights.loaded().unwrap().insights.len(), 1);
}

#[tokio::test]
async fn test_configured_client_does_not_retry_failed_card() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rotterdam/insights"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = crate::load("config/production.yml", "production")
        .http
        .client()
        .unwrap();
    let mut risk = RiskDashboard::new(
        client,
        RiskDashboardSettings {
            base_url: format!("{}/rotterdam", server.uri()),
            load_on_start: false,
        },
    );

    risk.retry(RiskCard::Insights).await;

    assert!(risk.insights.error().is_some());
}
