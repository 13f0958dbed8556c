use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

/// A geographic bounding box, inclusive on all edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn from_point(point: LatLon) -> Self {
        Self {
            south: point.latitude,
            west: point.longitude,
            north: point.latitude,
            east: point.longitude,
        }
    }

    /// Smallest bounds enclosing every point, `None` for an empty iterator.
    pub fn enclosing(points: impl IntoIterator<Item = LatLon>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut bounds = Self::from_point(points.next()?);
        points.for_each(|p| bounds.extend(p));
        Some(bounds)
    }

    pub fn extend(&mut self, point: LatLon) {
        self.south = self.south.min(point.latitude);
        self.north = self.north.max(point.latitude);
        self.west = self.west.min(point.longitude);
        self.east = self.east.max(point.longitude);
    }

    pub fn contains(&self, point: LatLon) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }
}
