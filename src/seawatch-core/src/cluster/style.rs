use serde::Serialize;
use strum::{AsRefStr, IntoStaticStr};

use crate::VesselRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SpeedClass {
    Stopped,
    Slow,
    Moving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum VesselCategory {
    Passenger,
    Cargo,
    Tanker,
    Fishing,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ClusterSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VesselIcon {
    pub speed_class: SpeedClass,
    pub category: VesselCategory,
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterIcon {
    pub count: usize,
    pub size: ClusterSize,
}

impl SpeedClass {
    pub fn from_speed(knots: f64) -> Self {
        if knots < 0.1 {
            SpeedClass::Stopped
        } else if knots < 5.0 {
            SpeedClass::Slow
        } else {
            SpeedClass::Moving
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SpeedClass::Stopped => "#FF4444",
            SpeedClass::Slow => "#FFA500",
            SpeedClass::Moving => "#00FF00",
        }
    }
}

impl VesselCategory {
    pub fn from_ship_type(ship_type: i32) -> Self {
        match ship_type {
            60..=69 => VesselCategory::Passenger,
            70..=79 => VesselCategory::Cargo,
            80..=89 => VesselCategory::Tanker,
            30..=39 => VesselCategory::Fishing,
            _ => VesselCategory::Other,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            VesselCategory::Passenger => "🚢",
            VesselCategory::Cargo => "📦",
            VesselCategory::Tanker => "🛢️",
            VesselCategory::Fishing => "🎣",
            VesselCategory::Other => "⛵",
        }
    }
}

impl ClusterSize {
    pub fn from_count(count: usize) -> Self {
        if count < 10 {
            ClusterSize::Small
        } else if count < 100 {
            ClusterSize::Medium
        } else {
            ClusterSize::Large
        }
    }

    pub fn icon_px(&self) -> u32 {
        match self {
            ClusterSize::Small => 30,
            ClusterSize::Medium => 40,
            ClusterSize::Large => 50,
        }
    }

    pub fn font_px(&self) -> u32 {
        match self {
            ClusterSize::Small => 12,
            ClusterSize::Medium => 14,
            ClusterSize::Large => 16,
        }
    }
}

impl VesselIcon {
    pub fn for_vessel(vessel: &VesselRecord) -> Self {
        Self {
            speed_class: SpeedClass::from_speed(vessel.speed),
            category: VesselCategory::from_ship_type(vessel.ship_type),
            rotation: vessel.rotation(),
        }
    }
}

impl ClusterIcon {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            size: ClusterSize::from_count(count),
        }
    }

    pub fn label(&self) -> String {
        self.count.to_string()
    }
}
