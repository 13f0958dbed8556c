use std::f64::consts::PI;

use crate::LatLon;

/// Tile size of the Web Mercator projection at zoom 0.
pub const TILE_SIZE: f64 = 256.0;
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Screen-space position in pixels at a given zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub fn project(position: LatLon, zoom: f64) -> Point {
    let scale = TILE_SIZE * 2f64.powf(zoom);
    let latitude = position.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

    Point {
        x: (position.longitude + 180.0) / 360.0 * scale,
        y: (1.0 - (latitude.tan() + 1.0 / latitude.cos()).ln() / PI) / 2.0 * scale,
    }
}

impl Point {
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
