//! Spherical web mercator as used by web map surfaces: the whole world is a square of
//! [`TILE_SIZE`] pixels at zoom level 0, doubling with every zoom level.

use std::f64::consts::PI;

use crate::{GeoPoint, Point2d};

/// Size of the world square in pixels at zoom 0.
pub const TILE_SIZE: f64 = 512.0;

/// Latitude limit of the web mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Size of the world square in pixels at the given zoom.
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

/// Projects the point into world pixel coordinates (y grows to the south).
pub fn project(point: &GeoPoint, zoom: f64) -> Point2d {
    let size = world_size(zoom);
    let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

    let x = (point.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;

    Point2d::new(x, y)
}

/// Inverse of [`project`].
pub fn unproject(point: &Point2d, zoom: f64) -> GeoPoint {
    let size = world_size(zoom);

    let lng = point.x / size * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * point.y / size);
    let lat = n.sinh().atan().to_degrees();

    GeoPoint::new(lng, lat)
}
