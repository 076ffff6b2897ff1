//! Sequences of points: line strings and polygon rings.

use crate::bounding_rect::BoundingRect;
use crate::GeoPoint;

/// A sequence of points. A closed contour implicitly connects its last point with the first
/// one, and never stores the closing point twice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    points: Vec<GeoPoint>,
    is_closed: bool,
}

impl Contour {
    /// Creates a contour. If `is_closed` is set and the input repeats the first point at the end
    /// (as GeoJSON rings do), the duplicate is dropped.
    pub fn new(mut points: Vec<GeoPoint>, is_closed: bool) -> Self {
        if is_closed && points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        Self { points, is_closed }
    }

    /// Creates a closed contour.
    pub fn closed(points: Vec<GeoPoint>) -> Self {
        Self::new(points, true)
    }

    /// Creates an open contour (line string).
    pub fn open(points: Vec<GeoPoint>) -> Self {
        Self::new(points, false)
    }

    /// Converts the contour into a closed one. Returns `None` if the contour cannot form a
    /// ring (less than 3 distinct points).
    pub fn into_closed(self) -> Option<Self> {
        let contour = Self::new(self.points, true);
        if contour.points.len() < 3 {
            return None;
        }

        Some(contour)
    }

    /// Returns true if the last point is connected to the first one.
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// Points of the contour without the closing point.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Iterates over points, repeating the first point at the end for closed contours.
    pub fn iter_points_closing(&self) -> impl Iterator<Item = &GeoPoint> {
        let closing = if self.is_closed {
            self.points.first()
        } else {
            None
        };

        self.points.iter().chain(closing)
    }

    /// Iterates over all segments of the contour.
    pub fn iter_segments(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        let points: Vec<&GeoPoint> = self.iter_points_closing().collect();
        (1..points.len()).map(move |i| (*points[i - 1], *points[i]))
    }

    /// Arithmetic mean of the contour vertices. Returns `None` for an empty contour.
    pub fn vertex_centroid(&self) -> Option<GeoPoint> {
        if self.points.is_empty() {
            return None;
        }

        let count = self.points.len() as f64;
        let (lng, lat) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(lng, lat), p| (lng + p.lng, lat + p.lat));

        Some(GeoPoint::new(lng / count, lat / count))
    }

    /// Bounding rectangle of the contour.
    pub fn bounding_rect(&self) -> Option<BoundingRect> {
        BoundingRect::from_points(self.points.iter())
    }

    /// Winding number of the closed contour around the point. Zero means the point is outside.
    pub(crate) fn winding_number(&self, point: &GeoPoint) -> i64 {
        let mut wn = 0i64;
        for (from, to) in self.iter_segments() {
            if from.lat <= point.lat {
                if to.lat > point.lat && is_left(&from, &to, point) > 0.0 {
                    wn += 1;
                }
            } else if to.lat <= point.lat && is_left(&from, &to, point) < 0.0 {
                wn -= 1;
            }
        }

        wn
    }

    /// Returns true if the point lies on one of the contour segments.
    pub(crate) fn is_on_boundary(&self, point: &GeoPoint) -> bool {
        const EPSILON: f64 = 1e-12;

        self.iter_segments().any(|(from, to)| {
            let cross = is_left(&from, &to, point);
            if cross.abs() > EPSILON {
                return false;
            }

            point.lng >= from.lng.min(to.lng) - EPSILON
                && point.lng <= from.lng.max(to.lng) + EPSILON
                && point.lat >= from.lat.min(to.lat) - EPSILON
                && point.lat <= from.lat.max(to.lat) + EPSILON
        })
    }
}

fn is_left(from: &GeoPoint, to: &GeoPoint, point: &GeoPoint) -> f64 {
    (to.lng - from.lng) * (point.lat - from.lat) - (point.lng - from.lng) * (to.lat - from.lat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lnglat;

    #[test]
    fn closing_point_is_not_duplicated() {
        let contour = Contour::closed(vec![
            lnglat!(0.0, 0.0),
            lnglat!(1.0, 0.0),
            lnglat!(1.0, 1.0),
            lnglat!(0.0, 0.0),
        ]);

        assert_eq!(contour.points().len(), 3);
        assert_eq!(contour.iter_points_closing().count(), 4);
        assert_eq!(contour.iter_segments().count(), 3);
    }

    #[test]
    fn open_contour_cannot_close_with_two_points() {
        let contour = Contour::open(vec![lnglat!(0.0, 0.0), lnglat!(1.0, 0.0)]);
        assert!(contour.into_closed().is_none());
    }

    #[test]
    fn vertex_centroid_ignores_closing_point() {
        let contour = Contour::closed(vec![
            lnglat!(0.0, 0.0),
            lnglat!(2.0, 0.0),
            lnglat!(2.0, 2.0),
            lnglat!(0.0, 2.0),
            lnglat!(0.0, 0.0),
        ]);

        assert_eq!(contour.vertex_centroid(), Some(lnglat!(1.0, 1.0)));
        assert_eq!(Contour::default().vertex_centroid(), None);
    }
}
