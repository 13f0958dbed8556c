use chrono::{TimeZone, Utc};

use crate::{DockingStatus, Mmsi, NavigationStatus, VesselRecord};

impl Mmsi {
    pub fn test_new(mmsi: i32) -> Self {
        Self::try_from(i64::from(mmsi)).unwrap()
    }
}

impl VesselRecord {
    pub fn test_default(mmsi: Mmsi) -> VesselRecord {
        VesselRecord {
            mmsi,
            latitude: 51.95,
            longitude: 4.05,
            course: 270.0,
            heading: 268.0,
            speed: 11.3,
            name: Some("test_vessel".to_string()),
            call_sign: Some("PDQX".to_string()),
            destination: Some("ROTTERDAM".to_string()),
            ship_type: 70,
            navigational_status: NavigationStatus::UnderWayUsingEngine,
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            docking_status: DockingStatus::Unknown,
            risk_score: None,
            risk_factors: Default::default(),
        }
    }

    pub fn test_at(mmsi: i32, latitude: f64, longitude: f64) -> VesselRecord {
        VesselRecord {
            latitude,
            longitude,
            ..Self::test_default(Mmsi::test_new(mmsi))
        }
    }
}
