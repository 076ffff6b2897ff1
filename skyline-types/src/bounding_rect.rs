//! Axis aligned bounding rectangle in geographic coordinates.

use serde::{Deserialize, Serialize};

use crate::contour::Contour;
use crate::GeoPoint;

/// Rectangle with sides parallel to meridians and parallels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
    /// Western edge.
    pub lng_min: f64,
    /// Southern edge.
    pub lat_min: f64,
    /// Eastern edge.
    pub lng_max: f64,
    /// Northern edge.
    pub lat_max: f64,
}

impl BoundingRect {
    /// Creates a new rectangle.
    pub fn new(lng_min: f64, lat_min: f64, lng_max: f64, lat_max: f64) -> Self {
        Self {
            lng_min,
            lat_min,
            lng_max,
            lat_max,
        }
    }

    /// Degenerate rectangle containing a single point.
    pub fn from_point(p: &GeoPoint) -> Self {
        Self::new(p.lng, p.lat, p.lng, p.lat)
    }

    /// Smallest rectangle containing all the points. Returns `None` if the iterator is empty.
    pub fn from_points<'a>(mut points: impl Iterator<Item = &'a GeoPoint>) -> Option<Self> {
        let first = points.next()?;
        Some(points.fold(Self::from_point(first), |rect, p| {
            rect.merge(Self::from_point(p))
        }))
    }

    /// Smallest rectangle containing both rectangles.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            lng_min: self.lng_min.min(other.lng_min),
            lat_min: self.lat_min.min(other.lat_min),
            lng_max: self.lng_max.max(other.lng_max),
            lat_max: self.lat_max.max(other.lat_max),
        }
    }

    /// Grows the rectangle by `delta` degrees on every side.
    pub fn expand(&self, delta: f64) -> Self {
        Self {
            lng_min: self.lng_min - delta,
            lat_min: self.lat_min - delta,
            lng_max: self.lng_max + delta,
            lat_max: self.lat_max + delta,
        }
    }

    /// Center of the rectangle.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.lng_min + self.lng_max) / 2.0,
            (self.lat_min + self.lat_max) / 2.0,
        )
    }

    /// Returns true if the point is inside or on the border of the rectangle.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lng >= self.lng_min
            && point.lng <= self.lng_max
            && point.lat >= self.lat_min
            && point.lat <= self.lat_max
    }

    /// Closed ring going around the rectangle counter-clockwise starting at the south-west corner.
    pub fn to_contour(&self) -> Contour {
        Contour::closed(vec![
            GeoPoint::new(self.lng_min, self.lat_min),
            GeoPoint::new(self.lng_max, self.lat_min),
            GeoPoint::new(self.lng_max, self.lat_max),
            GeoPoint::new(self.lng_min, self.lat_max),
        ])
    }
}
