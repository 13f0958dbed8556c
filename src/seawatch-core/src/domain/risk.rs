use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Combined storm probability above which conditions count as a storm.
pub const STORM_THRESHOLD: f64 = 0.7;
/// Wave height in meters.
pub const HIGH_WAVES_THRESHOLD: f64 = 3.0;
/// Wind speed in meters per second.
pub const STRONG_WIND_THRESHOLD: f64 = 10.0;
/// Precipitation probability in percent.
pub const HIGH_RAIN_THRESHOLD: f64 = 50.0;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    AsRefStr,
    EnumString,
)]
pub enum RiskLevel {
    Safe,
    Moderate,
    High,
    Dangerous,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score > STORM_THRESHOLD {
            RiskLevel::Dangerous
        } else if score > 0.5 {
            RiskLevel::High
        } else if score > 0.3 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Safe
        }
    }
}
