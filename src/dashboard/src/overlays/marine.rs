use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use super::OverlayData;

/// Stormglass, the source selected when none is chosen.
pub const DEFAULT_MARINE_SOURCE: &str = "sg";

#[derive(Debug, Clone, Deserialize)]
pub struct MarineData {
    pub hours: Vec<MarineHour>,
}

/// One hour of marine readings, every metric keyed by the data source that reported it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarineHour {
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub wave_height: BTreeMap<String, f64>,
    #[serde(default)]
    pub wave_direction: BTreeMap<String, f64>,
    #[serde(default)]
    pub sea_level: BTreeMap<String, f64>,
    #[serde(default)]
    pub current_speed: BTreeMap<String, f64>,
    #[serde(default)]
    pub current_direction: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarineMetric {
    WaveHeight,
    WaveDirection,
    SeaLevel,
    CurrentSpeed,
    CurrentDirection,
}

/// Readings of a single source for one hour, missing readings are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarineConditions {
    pub wave_height: f64,
    pub wave_direction: f64,
    pub sea_level: f64,
    pub current_speed: f64,
    pub current_direction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum WaveSeverity {
    Calm,
    Elevated,
    Rough,
}

impl MarineData {
    pub fn current(&self) -> Option<&MarineHour> {
        self.hours.first()
    }
}

impl MarineHour {
    pub fn readings(&self, metric: MarineMetric) -> &BTreeMap<String, f64> {
        match metric {
            MarineMetric::WaveHeight => &self.wave_height,
            MarineMetric::WaveDirection => &self.wave_direction,
            MarineMetric::SeaLevel => &self.sea_level,
            MarineMetric::CurrentSpeed => &self.current_speed,
            MarineMetric::CurrentDirection => &self.current_direction,
        }
    }

    pub fn reading(&self, metric: MarineMetric, source: &str) -> f64 {
        self.readings(metric).get(source).copied().unwrap_or(0.0)
    }

    /// Mean across every source that reported `metric`.
    pub fn average(&self, metric: MarineMetric) -> Option<f64> {
        let readings = self.readings(metric);
        if readings.is_empty() {
            None
        } else {
            Some(readings.values().sum::<f64>() / readings.len() as f64)
        }
    }

    pub fn conditions(&self, source: &str) -> MarineConditions {
        MarineConditions {
            wave_height: self.reading(MarineMetric::WaveHeight, source),
            wave_direction: self.reading(MarineMetric::WaveDirection, source),
            sea_level: self.reading(MarineMetric::SeaLevel, source),
            current_speed: self.reading(MarineMetric::CurrentSpeed, source),
            current_direction: self.reading(MarineMetric::CurrentDirection, source),
        }
    }
}

impl MarineConditions {
    pub fn wave_severity(&self) -> WaveSeverity {
        if self.wave_height > 2.0 {
            WaveSeverity::Rough
        } else if self.wave_height > 1.5 {
            WaveSeverity::Elevated
        } else {
            WaveSeverity::Calm
        }
    }

    pub fn sea_level_above_mean(&self) -> bool {
        self.sea_level > 0.0
    }
}

impl OverlayData for MarineData {
    const NAME: &'static str = "marine";

    fn log_current(&self) {
        let Some(hour) = self.current() else {
            return;
        };
        let conditions = hour.conditions(DEFAULT_MARINE_SOURCE);
        info!(
            time = %hour.time,
            wave_height = conditions.wave_height,
            wave_direction = conditions.wave_direction,
            current_speed = conditions.current_speed,
            sea_level = conditions.sea_level,
            severity = %conditions.wave_severity(),
            "current marine conditions"
        );
    }
}
