//! Map surface and detail view used when the dashboard runs without a UI, markers are
//! tracked in memory and selections end up in the log.

use std::{collections::BTreeMap, sync::Arc};

use seawatch_core::{
    Bounds, LatLon, MapMarker, MapSurface, MarkerId, VesselDetailView, VesselRecord,
};
use tracing::info;

#[derive(Debug, Default)]
pub struct HeadlessMap {
    next_id: u64,
    markers: BTreeMap<MarkerId, MapMarker>,
    added: usize,
    removed: usize,
    viewport: Option<Bounds>,
    center: Option<(LatLon, f64)>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> impl Iterator<Item = (&MarkerId, &MapMarker)> {
        self.markers.iter()
    }

    pub fn marker(&self, id: MarkerId) -> Option<&MapMarker> {
        self.markers.get(&id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Total markers ever added.
    pub fn added(&self) -> usize {
        self.added
    }

    pub fn removed(&self) -> usize {
        self.removed
    }

    /// Bounds of the last fly-to request.
    pub fn viewport(&self) -> Option<Bounds> {
        self.viewport
    }

    /// Center and zoom of the last fly-to request.
    pub fn center(&self) -> Option<(LatLon, f64)> {
        self.center
    }

    pub fn cluster_ids(&self) -> Vec<MarkerId> {
        self.markers
            .iter()
            .filter(|(_, m)| matches!(m, MapMarker::Cluster { .. }))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn vessel_ids(&self) -> Vec<MarkerId> {
        self.markers
            .iter()
            .filter(|(_, m)| matches!(m, MapMarker::Vessel { .. }))
            .map(|(id, _)| *id)
            .collect()
    }
}

impl MapSurface for HeadlessMap {
    fn add_marker(&mut self, marker: MapMarker) -> MarkerId {
        self.next_id += 1;
        self.added += 1;
        let id = MarkerId(self.next_id);
        self.markers.insert(id, marker);
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        if self.markers.remove(&id).is_some() {
            self.removed += 1;
        }
    }

    fn fly_to_bounds(&mut self, bounds: Bounds) {
        self.viewport = Some(bounds);
    }

    fn fly_to(&mut self, center: LatLon, zoom: f64) {
        self.center = Some((center, zoom));
    }
}

/// Logs the vessel a user selected and remembers the last one.
#[derive(Debug, Default)]
pub struct LogDetailView {
    selected: Option<Arc<VesselRecord>>,
}

impl LogDetailView {
    pub fn selected(&self) -> Option<&Arc<VesselRecord>> {
        self.selected.as_ref()
    }
}

impl VesselDetailView for LogDetailView {
    fn show_vessel(&mut self, vessel: Arc<VesselRecord>) {
        info!(
            mmsi = %vessel.mmsi,
            name = vessel.display_name(),
            ship_type = vessel.ship_type_name(),
            status = vessel.navigational_status.description(),
            speed = vessel.speed,
            destination = vessel.destination.as_deref().unwrap_or("-"),
            docking = %vessel.docking_status,
            "selected vessel"
        );
        self.selected = Some(vessel);
    }
}
