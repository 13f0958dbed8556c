use std::{collections::BTreeMap, fmt::Display};

use chrono::{DateTime, Utc};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use strum::{AsRefStr, EnumString, IntoStaticStr};

use crate::LatLon;

/// AIS sentinel for "heading not available".
pub const HEADING_NOT_AVAILABLE: f64 = 511.0;

pub const UNKNOWN_VESSEL_NAME: &str = "Unknown Vessel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct Mmsi(i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMmsi(pub i64);

/// The unified vessel record every stream payload is normalized into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VesselRecord {
    pub mmsi: Mmsi,
    pub latitude: f64,
    pub longitude: f64,
    pub course: f64,
    pub heading: f64,
    pub speed: f64,
    pub name: Option<String>,
    pub call_sign: Option<String>,
    pub destination: Option<String>,
    pub ship_type: i32,
    pub navigational_status: NavigationStatus,
    pub timestamp: DateTime<Utc>,
    pub docking_status: DockingStatus,
    pub risk_score: Option<f64>,
    pub risk_factors: BTreeMap<String, RiskFactor>,
}

#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    PartialEq,
    FromPrimitive,
    Eq,
    Serialize_repr,
    Deserialize_repr,
    strum::Display,
    AsRefStr,
    EnumString,
)]
#[repr(i32)]
pub enum NavigationStatus {
    #[default]
    UnderWayUsingEngine = 0,
    AtAnchor = 1,
    NotUnderCommand = 2,
    RestrictedManoeuverability = 3,
    ConstrainedByDraught = 4,
    Moored = 5,
    Aground = 6,
    EngagedInFishing = 7,
    UnderWaySailing = 8,
    Reserved9 = 9,
    Reserved10 = 10,
    PowerDrivenTowingAstern = 11,
    PowerDrivenPushingAhead = 12,
    Reserved13 = 13,
    AisSartIsActive = 14,
    NotDefined = 15,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    strum::Display,
)]
pub enum DockingStatus {
    #[default]
    #[serde(rename = "N/A")]
    #[strum(serialize = "N/A")]
    Unknown,
    #[serde(rename = "DOCK")]
    #[strum(serialize = "DOCK")]
    Dock,
    #[serde(rename = "DELAY")]
    #[strum(serialize = "DELAY")]
    Delay,
    #[serde(rename = "NO_DOCK")]
    #[strum(serialize = "NO_DOCK")]
    NoDock,
}

/// A single named contributor to a vessel's risk score, either a measured value or a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RiskFactor {
    Number(f64),
    Text(String),
}

impl Mmsi {
    pub fn into_inner(self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for Mmsi {
    type Error = InvalidMmsi;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match i32::try_from(value) {
            Ok(v) if v > 0 => Ok(Self(v)),
            _ => Err(InvalidMmsi(value)),
        }
    }
}

impl From<Mmsi> for i32 {
    fn from(value: Mmsi) -> Self {
        value.0
    }
}

impl Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Display for InvalidMmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is not a valid mmsi", self.0)
    }
}

impl std::error::Error for InvalidMmsi {}

impl VesselRecord {
    /// Returns true if `other` carries the same position, speed and navigational status.
    /// These are the only fields that make an update visible on the map.
    pub fn has_same_tracked_state(&self, other: &VesselRecord) -> bool {
        self.latitude == other.latitude
            && self.longitude == other.longitude
            && self.speed == other.speed
            && self.navigational_status == other.navigational_status
    }

    /// Marker rotation in degrees, heading when known and course otherwise.
    pub fn rotation(&self) -> f64 {
        if self.heading != 0.0 {
            self.heading
        } else {
            self.course
        }
    }

    pub fn position(&self) -> LatLon {
        LatLon {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_VESSEL_NAME)
    }

    pub fn ship_type_name(&self) -> &'static str {
        ship_type_name(self.ship_type)
    }
}

impl NavigationStatus {
    pub fn description(&self) -> &'static str {
        use NavigationStatus::*;

        match self {
            UnderWayUsingEngine => "Under Way Using Engine",
            AtAnchor => "At Anchor",
            NotUnderCommand => "Not Under Command",
            RestrictedManoeuverability => "Restricted Maneuverability",
            ConstrainedByDraught => "Constrained by Draught",
            Moored => "Moored",
            Aground => "Aground",
            EngagedInFishing => "Engaged in Fishing",
            UnderWaySailing => "Under Way Sailing",
            PowerDrivenTowingAstern => "Power-driven Vessel Towing Astern",
            PowerDrivenPushingAhead => "Power-driven Vessel Pushing Ahead",
            NotDefined => "Undefined",
            Reserved9 | Reserved10 | Reserved13 | AisSartIsActive => "Unknown",
        }
    }
}

impl From<i64> for NavigationStatus {
    fn from(value: i64) -> Self {
        NavigationStatus::from_i64(value).unwrap_or(NavigationStatus::NotDefined)
    }
}

impl DockingStatus {
    /// Parses a docking status leniently, anything unrecognised becomes `N/A`.
    pub fn from_lenient(value: &str) -> Self {
        value.trim().to_uppercase().parse().unwrap_or_default()
    }
}

/// Human readable name of an AIS ship type code.
pub fn ship_type_name(ship_type: i32) -> &'static str {
    match ship_type {
        30 => "Fishing",
        31 | 32 => "Towing",
        33 => "Dredging",
        34 => "Diving",
        35 => "Military",
        36 => "Sailing",
        37 => "Pleasure",
        40 => "High Speed Craft",
        50 => "Pilot",
        51 => "Search and Rescue",
        52 => "Tug",
        53 => "Port Tender",
        54 => "Anti-Pollution",
        55 => "Law Enforcement",
        58 => "Medical",
        60 => "Passenger",
        70 => "Cargo",
        71 => "Cargo - Hazardous A",
        72 => "Cargo - Hazardous B",
        73 => "Cargo - Hazardous C",
        74 => "Cargo - Hazardous D",
        80 => "Tanker",
        81 => "Tanker - Hazardous A",
        82 => "Tanker - Hazardous B",
        83 => "Tanker - Hazardous C",
        84 => "Tanker - Hazardous D",
        90 => "Other",
        _ => "Unknown",
    }
}
