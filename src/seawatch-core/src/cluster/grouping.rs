use std::{collections::HashMap, sync::Arc};

use serde::Deserialize;

use crate::{Bounds, LatLon, Point, VesselRecord, project};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ClusterSettings {
    /// Vessels within this many screen pixels of a group's anchor join that group.
    pub max_cluster_radius_px: f64,
    /// At or above this zoom every vessel is drawn individually.
    pub disable_clustering_at_zoom: f64,
}

/// Vessels drawn as one marker at the current zoom.
#[derive(Debug, Clone)]
pub struct VesselGroup {
    anchor: Point,
    members: Vec<Arc<VesselRecord>>,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            max_cluster_radius_px: 50.0,
            disable_clustering_at_zoom: 15.0,
        }
    }
}

impl ClusterSettings {
    /// Whether vessels are grouped at `zoom`. A radius that is not a positive number
    /// disables grouping.
    pub fn clusters_at(&self, zoom: f64) -> bool {
        self.max_cluster_radius_px.is_finite()
            && self.max_cluster_radius_px > 0.0
            && zoom < self.disable_clustering_at_zoom
    }
}

impl VesselGroup {
    fn new(anchor: Point, vessel: Arc<VesselRecord>) -> Self {
        Self {
            anchor,
            members: vec![vessel],
        }
    }

    pub fn members(&self) -> &[Arc<VesselRecord>] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn single(&self) -> Option<&Arc<VesselRecord>> {
        match self.members.as_slice() {
            [vessel] => Some(vessel),
            _ => None,
        }
    }

    pub fn centroid(&self) -> LatLon {
        let n = self.members.len().max(1) as f64;
        let (lat, lon) = self
            .members
            .iter()
            .fold((0.0, 0.0), |(lat, lon), v| (lat + v.latitude, lon + v.longitude));
        LatLon {
            latitude: lat / n,
            longitude: lon / n,
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.members.iter().map(|v| v.position()))
    }
}

/// Groups vessels by screen-space proximity at `zoom`.
///
/// Vessels are visited in iteration order; each one joins the group whose anchor is nearest
/// and within the configured radius, or starts a new group anchored at its own position.
/// The outcome depends only on the input order, positions and zoom.
pub fn group_vessels<'a>(
    vessels: impl IntoIterator<Item = &'a Arc<VesselRecord>>,
    zoom: f64,
    settings: &ClusterSettings,
) -> Vec<VesselGroup> {
    let vessels = vessels.into_iter();

    if !settings.clusters_at(zoom) {
        return vessels
            .map(|v| VesselGroup::new(project(v.position(), zoom), v.clone()))
            .collect();
    }

    let radius = settings.max_cluster_radius_px;
    let mut groups: Vec<VesselGroup> = Vec::new();
    let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();

    for vessel in vessels {
        let point = project(vessel.position(), zoom);
        let cell = grid_cell(point, radius);

        let nearest = neighbours(cell)
            .filter_map(|c| grid.get(&c))
            .flatten()
            .map(|&i| (i, groups[i].anchor.distance(&point)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);

        match nearest {
            Some(i) => groups[i].members.push(vessel.clone()),
            None => {
                grid.entry(cell).or_default().push(groups.len());
                groups.push(VesselGroup::new(point, vessel.clone()));
            }
        }
    }

    groups
}

fn grid_cell(point: Point, size: f64) -> (i64, i64) {
    (
        (point.x / size).floor() as i64,
        (point.y / size).floor() as i64,
    )
}

fn neighbours((x, y): (i64, i64)) -> impl Iterator<Item = (i64, i64)> {
    (-1..=1).flat_map(move |dx| {
        (-1..=1).map(move |dy| (x.saturating_add(dx), y.saturating_add(dy)))
    })
}
