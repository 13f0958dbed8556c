use std::{collections::BTreeMap, sync::Arc};

use tracing::debug;

use crate::{
    Bounds, ClusterIcon, ClusterSettings, LatLon, MapMarker, MapSurface, MarkerId, Mmsi,
    Snapshot, VesselDetailView, VesselIcon, VesselRecord, group_vessels,
};

/// Zoom the map flies to when a single vessel is focused.
pub const VESSEL_FOCUS_ZOOM: f64 = 15.0;

/// Draws a [Snapshot] onto a [MapSurface] as vessel and cluster markers.
///
/// The renderer owns every marker it adds and removes them all before each redraw, so the
/// surface never holds more than one generation of markers.
pub struct ClusterRenderer<M> {
    surface: M,
    settings: ClusterSettings,
    zoom: f64,
    snapshot: Option<Snapshot>,
    markers: BTreeMap<MarkerId, MarkerTarget>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerClick {
    VesselSelected(Mmsi),
    ZoomedToBounds(Bounds),
}

enum MarkerTarget {
    Vessel(Arc<VesselRecord>),
    Cluster(Bounds),
}

impl<M: MapSurface> ClusterRenderer<M> {
    pub fn new(surface: M, settings: ClusterSettings, zoom: f64) -> Self {
        Self {
            surface,
            settings,
            zoom,
            snapshot: None,
            markers: BTreeMap::new(),
        }
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Redraws if `snapshot` differs from the last rendered one, returns whether it did.
    pub fn render(&mut self, snapshot: &Snapshot) -> bool {
        if self
            .snapshot
            .as_ref()
            .is_some_and(|s| s.shares_storage_with(snapshot))
        {
            return false;
        }
        self.snapshot = Some(snapshot.clone());
        self.redraw();
        true
    }

    /// Regroups the current snapshot for a new zoom level.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if self.zoom == zoom {
            return false;
        }
        self.zoom = zoom;
        if self.snapshot.is_some() {
            self.redraw();
        }
        true
    }

    /// Centers the map on `center` and regroups the current snapshot for `zoom`.
    pub fn fly_to(&mut self, center: LatLon, zoom: f64) {
        self.surface.fly_to(center, zoom);
        self.set_zoom(zoom);
    }

    /// Handles a click on one of the markers this renderer added. Vessel markers open the
    /// detail view, cluster markers fly the map to the bounds of their members.
    pub fn handle_click(
        &mut self,
        id: MarkerId,
        detail: &mut impl VesselDetailView,
    ) -> Option<MarkerClick> {
        match self.markers.get(&id)? {
            MarkerTarget::Vessel(vessel) => {
                detail.show_vessel(vessel.clone());
                Some(MarkerClick::VesselSelected(vessel.mmsi))
            }
            MarkerTarget::Cluster(bounds) => {
                let bounds = *bounds;
                self.surface.fly_to_bounds(bounds);
                Some(MarkerClick::ZoomedToBounds(bounds))
            }
        }
    }

    /// Removes every marker from the surface and hands it back.
    pub fn detach(mut self) -> M {
        self.clear();
        self.surface
    }

    fn clear(&mut self) {
        for id in std::mem::take(&mut self.markers).into_keys() {
            self.surface.remove_marker(id);
        }
    }

    fn redraw(&mut self) {
        self.clear();

        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let groups = group_vessels(snapshot.vessels(), self.zoom, &self.settings);

        for group in &groups {
            let (marker, target) = match (group.single(), group.bounds()) {
                (Some(vessel), _) => (
                    MapMarker::Vessel {
                        position: vessel.position(),
                        icon: VesselIcon::for_vessel(vessel),
                        vessel: vessel.clone(),
                    },
                    MarkerTarget::Vessel(vessel.clone()),
                ),
                (None, Some(bounds)) => (
                    MapMarker::Cluster {
                        position: group.centroid(),
                        icon: ClusterIcon::new(group.len()),
                        bounds,
                    },
                    MarkerTarget::Cluster(bounds),
                ),
                (None, None) => continue,
            };
            let id = self.surface.add_marker(marker);
            self.markers.insert(id, target);
        }

        debug!(
            version = snapshot.version(),
            zoom = self.zoom,
            vessels = snapshot.len(),
            markers = self.markers.len(),
            "rendered vessel markers"
        );
    }
}
