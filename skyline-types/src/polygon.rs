//! Polygon geometry.

use crate::bounding_rect::BoundingRect;
use crate::contour::Contour;
use crate::GeoPoint;

/// Polygon consists of one outer contour, and zero or more inner contours (holes).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Outer ring of the polygon.
    pub outer_contour: Contour,
    /// Holes.
    pub inner_contours: Vec<Contour>,
}

impl Polygon {
    /// Creates a new polygon.
    pub fn new(outer_contour: Contour, inner_contours: Vec<Contour>) -> Self {
        Self {
            outer_contour,
            inner_contours,
        }
    }

    /// Iterates over all contours of the polygon starting with the outer one.
    pub fn iter_contours(&self) -> impl Iterator<Item = &Contour> {
        std::iter::once(&self.outer_contour).chain(self.inner_contours.iter())
    }

    /// Returns true if the `point` lies inside the polygon or on one of its sides. Points inside
    /// a hole are outside of the polygon.
    pub fn contains_point(&self, point: &GeoPoint) -> bool {
        if self.iter_contours().any(|c| c.is_on_boundary(point)) {
            return true;
        }

        self.outer_contour.winding_number(point) != 0
            && self
                .inner_contours
                .iter()
                .all(|hole| hole.winding_number(point) == 0)
    }

    /// Representative center of the polygon: the mean of the outer ring vertices.
    pub fn centroid(&self) -> Option<GeoPoint> {
        self.outer_contour.vertex_centroid()
    }

    /// Bounding rectangle of the outer ring.
    pub fn bounding_rect(&self) -> Option<BoundingRect> {
        self.outer_contour.bounding_rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lnglat;

    fn square(min: f64, max: f64) -> Contour {
        Contour::closed(vec![
            lnglat!(min, min),
            lnglat!(max, min),
            lnglat!(max, max),
            lnglat!(min, max),
        ])
    }

    #[test]
    fn contains_point() {
        let polygon = Polygon::new(
            Contour::closed(vec![
                lnglat!(0.0, 0.0),
                lnglat!(1.0, 1.0),
                lnglat!(1.0, 0.0),
            ]),
            vec![],
        );

        assert!(polygon.contains_point(&lnglat!(0.0, 0.0)));
        assert!(polygon.contains_point(&lnglat!(1.0, 1.0)));
        assert!(polygon.contains_point(&lnglat!(0.5, 0.0)));
        assert!(polygon.contains_point(&lnglat!(0.2, 0.1)));
        assert!(!polygon.contains_point(&lnglat!(0.2, 0.3)));
        assert!(!polygon.contains_point(&lnglat!(0.2, -0.3)));
        assert!(!polygon.contains_point(&lnglat!(1.1, 0.0)));
    }

    #[test]
    fn hole_is_outside() {
        let polygon = Polygon::new(square(0.0, 10.0), vec![square(4.0, 6.0)]);

        assert!(polygon.contains_point(&lnglat!(2.0, 2.0)));
        assert!(!polygon.contains_point(&lnglat!(5.0, 5.0)));
        assert!(polygon.contains_point(&lnglat!(4.0, 5.0)));
        assert!(!polygon.contains_point(&lnglat!(11.0, 5.0)));
    }

    #[test]
    fn centroid_of_square() {
        let polygon = Polygon::new(square(83.0, 84.0), vec![]);
        assert_eq!(polygon.centroid(), Some(lnglat!(83.5, 83.5)));
    }
}
