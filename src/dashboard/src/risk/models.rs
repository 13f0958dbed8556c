use seawatch_core::{
    HIGH_RAIN_THRESHOLD, HIGH_WAVES_THRESHOLD, RiskLevel, STORM_THRESHOLD, STRONG_WIND_THRESHOLD,
};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RiskTimelineResponse {
    pub city: String,
    #[serde(default = "default_storm_threshold")]
    pub storm_threshold: f64,
    pub timeline: Vec<RiskTimelinePoint>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RiskTimelinePoint {
    pub time: String,
    pub risk_score: f64,
    pub is_storm: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MultiMetricResponse {
    pub city: String,
    #[serde(default)]
    pub thresholds: MetricThresholds,
    pub data: Vec<MetricPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MetricThresholds {
    /// Meters.
    pub high_waves: f64,
    /// Meters per second.
    pub strong_wind: f64,
    /// Percent.
    pub high_rain: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPoint {
    pub time: String,
    pub wave_height: f64,
    pub wind_speed: f64,
    pub rain_probability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricAlert {
    HighWaves,
    StrongWind,
    HighRain,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RiskDistributionResponse {
    pub city: String,
    pub total_hours: u32,
    pub distribution: LevelCounts<u32>,
    pub percentages: LevelCounts<f64>,
}

/// A value per [RiskLevel].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LevelCounts<T> {
    pub safe: T,
    pub moderate: T,
    pub high: T,
    pub dangerous: T,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InsightsResponse {
    pub city: String,
    pub insights: Vec<Insight>,
    pub summary: InsightsSummary,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Insight {
    pub time: String,
    #[serde(rename = "waveHeight")]
    pub wave_height: f64,
    #[serde(rename = "windSpeed")]
    pub wind_speed: f64,
    pub pop: f64,
    pub risk_score: f64,
    pub cross_angle: f64,
    pub storm_flag: bool,
    pub temperature: f64,
    pub pressure: f64,
    #[serde(rename = "seaLevel")]
    pub sea_level: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InsightsSummary {
    pub max_risk: f64,
    pub max_risk_time: String,
    pub storm_hours: Vec<String>,
    pub avg_wave_height: f64,
    pub avg_wind_speed: f64,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            high_waves: HIGH_WAVES_THRESHOLD,
            strong_wind: STRONG_WIND_THRESHOLD,
            high_rain: HIGH_RAIN_THRESHOLD,
        }
    }
}

fn default_storm_threshold() -> f64 {
    STORM_THRESHOLD
}

impl RiskTimelineResponse {
    pub fn storm_hours(&self) -> impl Iterator<Item = &RiskTimelinePoint> {
        self.timeline
            .iter()
            .filter(|p| p.is_storm || p.risk_score > self.storm_threshold)
    }

    pub fn peak(&self) -> Option<&RiskTimelinePoint> {
        self.timeline
            .iter()
            .max_by(|a, b| a.risk_score.total_cmp(&b.risk_score))
    }
}

impl RiskTimelinePoint {
    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score)
    }
}

impl MetricPoint {
    pub fn alerts(&self, thresholds: &MetricThresholds) -> Vec<MetricAlert> {
        [
            (self.wave_height > thresholds.high_waves, MetricAlert::HighWaves),
            (self.wind_speed > thresholds.strong_wind, MetricAlert::StrongWind),
            (self.rain_probability > thresholds.high_rain, MetricAlert::HighRain),
        ]
        .into_iter()
        .filter_map(|(exceeded, alert)| exceeded.then_some(alert))
        .collect()
    }
}

impl MultiMetricResponse {
    /// Number of hours where at least one metric exceeds its threshold.
    pub fn alert_hours(&self) -> usize {
        self.data
            .iter()
            .filter(|p| !p.alerts(&self.thresholds).is_empty())
            .count()
    }
}

impl<T: Copy> LevelCounts<T> {
    pub fn get(&self, level: RiskLevel) -> T {
        match level {
            RiskLevel::Safe => self.safe,
            RiskLevel::Moderate => self.moderate,
            RiskLevel::High => self.high,
            RiskLevel::Dangerous => self.dangerous,
        }
    }
}

impl RiskDistributionResponse {
    /// The level with the most hours, the more severe level wins ties.
    pub fn dominant_level(&self) -> RiskLevel {
        [
            RiskLevel::Safe,
            RiskLevel::Moderate,
            RiskLevel::High,
            RiskLevel::Dangerous,
        ]
        .into_iter()
        .max_by_key(|level| (self.distribution.get(*level), *level))
        .unwrap_or(RiskLevel::Safe)
    }
}

impl Insight {
    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score)
    }
}

impl InsightsSummary {
    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.max_risk)
    }

    pub fn has_storm(&self) -> bool {
        !self.storm_hours.is_empty()
    }
}
