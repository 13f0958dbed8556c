//! The port risk dashboard: four cards loaded independently from the analysis backend.

use http_client::HttpClient;
use serde::de::DeserializeOwned;
use strum::{EnumIter, IntoEnumIterator};
use tracing::{info, instrument, warn};

use crate::settings::RiskDashboardSettings;

mod models;

pub use models::*;

#[derive(Debug, Clone, PartialEq)]
pub enum CardState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, strum::Display)]
pub enum RiskCard {
    #[strum(serialize = "risk timeline")]
    Timeline,
    #[strum(serialize = "multi metric")]
    MultiMetric,
    #[strum(serialize = "risk distribution")]
    Distribution,
    #[strum(serialize = "insights")]
    Insights,
}

pub struct RiskDashboard {
    client: HttpClient,
    settings: RiskDashboardSettings,
    pub timeline: CardState<RiskTimelineResponse>,
    pub multi_metric: CardState<MultiMetricResponse>,
    pub distribution: CardState<RiskDistributionResponse>,
    pub insights: CardState<InsightsResponse>,
}

impl<T> CardState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            CardState::Loaded(v) => Some(v),
            CardState::Loading | CardState::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CardState::Failed(e) => Some(e),
            CardState::Loading | CardState::Loaded(_) => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, CardState::Loading)
    }
}

impl RiskCard {
    pub fn path(&self) -> &'static str {
        match self {
            RiskCard::Timeline => "risk-timeline",
            RiskCard::MultiMetric => "multi-metric",
            RiskCard::Distribution => "risk-distribution",
            RiskCard::Insights => "insights",
        }
    }
}

impl RiskDashboard {
    pub fn new(client: HttpClient, settings: RiskDashboardSettings) -> Self {
        Self {
            client,
            settings,
            timeline: CardState::Loading,
            multi_metric: CardState::Loading,
            distribution: CardState::Loading,
            insights: CardState::Loading,
        }
    }

    /// Loads every card concurrently, a failing card leaves the others untouched.
    #[instrument(skip_all)]
    pub async fn load_all(&mut self) {
        self.timeline = CardState::Loading;
        self.multi_metric = CardState::Loading;
        self.distribution = CardState::Loading;
        self.insights = CardState::Loading;

        let (timeline, multi_metric, distribution, insights) = tokio::join!(
            self.fetch(RiskCard::Timeline),
            self.fetch(RiskCard::MultiMetric),
            self.fetch(RiskCard::Distribution),
            self.fetch(RiskCard::Insights),
        );

        self.timeline = timeline;
        self.multi_metric = multi_metric;
        self.distribution = distribution;
        self.insights = insights;

        self.log_cards();
    }

    /// Reloads a single card.
    #[instrument(skip(self))]
    pub async fn retry(&mut self, card: RiskCard) {
        match card {
            RiskCard::Timeline => {
                self.timeline = CardState::Loading;
                self.timeline = self.fetch(card).await;
            }
            RiskCard::MultiMetric => {
                self.multi_metric = CardState::Loading;
                self.multi_metric = self.fetch(card).await;
            }
            RiskCard::Distribution => {
                self.distribution = CardState::Loading;
                self.distribution = self.fetch(card).await;
            }
            RiskCard::Insights => {
                self.insights = CardState::Loading;
                self.insights = self.fetch(card).await;
            }
        }
    }

    pub fn error(&self, card: RiskCard) -> Option<&str> {
        match card {
            RiskCard::Timeline => self.timeline.error(),
            RiskCard::MultiMetric => self.multi_metric.error(),
            RiskCard::Distribution => self.distribution.error(),
            RiskCard::Insights => self.insights.error(),
        }
    }

    pub fn failed_cards(&self) -> Vec<RiskCard> {
        RiskCard::iter()
            .filter(|card| self.error(*card).is_some())
            .collect()
    }

    async fn fetch<T: DeserializeOwned>(&self, card: RiskCard) -> CardState<T> {
        let url = self.settings.endpoint(card.path());
        match self.client.get_json(url.as_str(), None::<&()>).await {
            Ok(v) => CardState::Loaded(v),
            Err(e) => {
                warn!(%card, %url, "failed to load risk card: {e:?}");
                let reason = e
                    .status()
                    .and_then(|s| s.canonical_reason())
                    .map(ToString::to_string)
                    .unwrap_or_else(|| e.to_string());
                CardState::Failed(format!("Failed to fetch {card}: {reason}"))
            }
        }
    }

    fn log_cards(&self) {
        if let Some(insights) = self.insights.loaded() {
            let summary = &insights.summary;
            info!(
                city = %insights.city,
                max_risk = summary.max_risk,
                max_risk_time = %summary.max_risk_time,
                level = %summary.level(),
                storm_hours = summary.storm_hours.len(),
                "port risk insights"
            );
        }
        if let Some(distribution) = self.distribution.loaded() {
            info!(
                total_hours = distribution.total_hours,
                dominant = %distribution.dominant_level(),
                "port risk distribution"
            );
        }
        if let Some(timeline) = self.timeline.loaded() {
            info!(
                storm_hours = timeline.storm_hours().count(),
                storm_threshold = timeline.storm_threshold,
                "port risk timeline"
            );
        }
        if let Some(metrics) = self.multi_metric.loaded() {
            info!(alert_hours = metrics.alert_hours(), "port weather metrics");
        }
        for card in self.failed_cards() {
            warn!(%card, "risk card unavailable");
        }
    }
}
