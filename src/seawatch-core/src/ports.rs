use std::sync::Arc;

use crate::{Bounds, ClusterIcon, LatLon, VesselIcon, VesselRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum MapMarker {
    Vessel {
        position: LatLon,
        icon: VesselIcon,
        vessel: Arc<VesselRecord>,
    },
    Cluster {
        position: LatLon,
        icon: ClusterIcon,
        bounds: Bounds,
    },
}

/// The map widget markers are drawn on.
pub trait MapSurface {
    fn add_marker(&mut self, marker: MapMarker) -> MarkerId;
    fn remove_marker(&mut self, id: MarkerId);
    fn fly_to_bounds(&mut self, bounds: Bounds);
    fn fly_to(&mut self, center: LatLon, zoom: f64);
}

/// Receives the vessel a user selected on the map.
pub trait VesselDetailView {
    fn show_vessel(&mut self, vessel: Arc<VesselRecord>);
}

impl MapMarker {
    pub fn position(&self) -> LatLon {
        match self {
            MapMarker::Vessel { position, .. } | MapMarker::Cluster { position, .. } => *position,
        }
    }
}
