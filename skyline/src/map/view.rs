use serde::{Deserialize, Serialize};
use skyline_types::{mercator, GeoPoint, Point2d};

/// Size of the map surface in pixels.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Center of the surface in screen pixels.
    pub fn center(&self) -> Point2d {
        Point2d::new(self.width / 2.0, self.height / 2.0)
    }

    /// Returns true if the surface has no area.
    pub fn is_zero(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Camera of the map: what part of the world is visible and from which angle.
///
/// Screen to map conversions use the top-down projection. Pitch and bearing are passed on to
/// the surface for drawing but do not take part in hit testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    center: GeoPoint,
    zoom: f64,
    pitch: f64,
    bearing: f64,
    size: Size,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: GeoPoint::ORIGIN,
            zoom: 0.0,
            pitch: 0.0,
            bearing: 0.0,
            size: Size::new(0.0, 0.0),
        }
    }
}

impl MapView {
    /// Minimum zoom level.
    pub const MIN_ZOOM: f64 = 0.0;
    /// Maximum zoom level.
    pub const MAX_ZOOM: f64 = 22.0;
    /// Maximum pitch in degrees.
    pub const MAX_PITCH: f64 = 85.0;

    /// Creates a new view looking straight down at `center`.
    pub fn new(center: GeoPoint, zoom: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM),
            ..Default::default()
        }
    }

    /// Center of the view.
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Camera tilt in degrees, 0 is looking straight down.
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Rotation of the map in degrees clockwise from north.
    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    /// Size of the surface.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns a copy with a different center.
    pub fn with_center(&self, center: GeoPoint) -> Self {
        Self { center, ..*self }
    }

    /// Returns a copy with a different zoom, clamped to the valid range.
    pub fn with_zoom(&self, zoom: f64) -> Self {
        Self {
            zoom: zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM),
            ..*self
        }
    }

    /// Returns a copy with a different pitch, clamped to the valid range.
    pub fn with_pitch(&self, pitch: f64) -> Self {
        Self {
            pitch: pitch.clamp(0.0, Self::MAX_PITCH),
            ..*self
        }
    }

    /// Returns a copy with a different bearing.
    pub fn with_bearing(&self, bearing: f64) -> Self {
        Self {
            bearing: bearing.rem_euclid(360.0),
            ..*self
        }
    }

    /// Returns a copy with a different surface size.
    pub fn with_size(&self, size: Size) -> Self {
        Self { size, ..*self }
    }

    /// Converts a screen pixel position into geographic coordinates.
    pub fn screen_to_geo(&self, px: Point2d) -> GeoPoint {
        let center = mercator::project(&self.center, self.zoom);
        let world = center + (px - self.size.center());
        mercator::unproject(&world, self.zoom)
    }

    /// Converts geographic coordinates into a screen pixel position.
    pub fn geo_to_screen(&self, point: &GeoPoint) -> Point2d {
        let center = mercator::project(&self.center, self.zoom);
        let world = mercator::project(point, self.zoom);
        world - center + self.size.center()
    }

    /// Moves the view so that the map follows a pointer moved by `delta` pixels.
    pub fn translate_by_pixels(&self, delta: Point2d) -> Self {
        let center = mercator::project(&self.center, self.zoom);
        let moved = center - delta;
        self.with_center(mercator::unproject(&moved, self.zoom))
    }

    /// Changes the zoom by `delta` keeping the map point under `px` in place.
    pub fn zoom_around(&self, delta: f64, px: Point2d) -> Self {
        let anchor = self.screen_to_geo(px);
        let zoomed = self.with_zoom(self.zoom + delta);
        let drift = zoomed.geo_to_screen(&anchor) - px;
        zoomed.translate_by_pixels(Point2d::new(-drift.x, -drift.y))
    }

    /// Linear interpolation between two views. `k == 0` gives `self`, `k == 1` gives `target`.
    pub fn interpolate(&self, target: &MapView, k: f64) -> Self {
        let k = k.clamp(0.0, 1.0);
        let lerp = |from: f64, to: f64| from + (to - from) * k;

        Self {
            center: GeoPoint::new(
                lerp(self.center.lng, target.center.lng),
                lerp(self.center.lat, target.center.lat),
            ),
            zoom: lerp(self.zoom, target.zoom),
            pitch: lerp(self.pitch, target.pitch),
            bearing: lerp(self.bearing, target.bearing),
            size: target.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use skyline_types::lnglat;

    use super::*;

    fn view() -> MapView {
        MapView::new(lnglat!(83.2185, 17.6868), 16.0).with_size(Size::new(800.0, 600.0))
    }

    #[test]
    fn screen_center_is_view_center() {
        let view = view();
        assert_relative_eq!(
            view.screen_to_geo(Point2d::new(400.0, 300.0)),
            view.center(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn screen_and_geo_are_inverse() {
        let view = view();
        let px = Point2d::new(123.0, 456.0);
        let point = view.screen_to_geo(px);

        assert_relative_eq!(view.geo_to_screen(&point), px, epsilon = 1e-6);
        assert!(point.lng < view.center().lng);
        assert!(point.lat < view.center().lat);
    }

    #[test]
    fn translate_follows_pointer() {
        let view = view();
        let grabbed = view.screen_to_geo(Point2d::new(100.0, 100.0));
        let moved = view.translate_by_pixels(Point2d::new(50.0, -20.0));

        assert_relative_eq!(
            moved.geo_to_screen(&grabbed),
            Point2d::new(150.0, 80.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn zoom_around_keeps_anchor() {
        let view = view();
        let px = Point2d::new(200.0, 100.0);
        let anchor = view.screen_to_geo(px);
        let zoomed = view.zoom_around(1.0, px);

        assert_relative_eq!(zoomed.zoom(), 17.0);
        assert_relative_eq!(zoomed.geo_to_screen(&anchor), px, epsilon = 1e-6);
    }

    #[test]
    fn values_are_clamped() {
        let view = view().with_zoom(40.0).with_pitch(120.0).with_bearing(-90.0);
        assert_relative_eq!(view.zoom(), MapView::MAX_ZOOM);
        assert_relative_eq!(view.pitch(), MapView::MAX_PITCH);
        assert_relative_eq!(view.bearing(), 270.0);
    }

    #[test]
    fn interpolation() {
        let start = view();
        let end = start.with_center(lnglat!(84.2185, 18.6868)).with_zoom(18.0);
        let half = start.interpolate(&end, 0.5);

        assert_relative_eq!(half.center(), lnglat!(83.7185, 18.1868), epsilon = 1e-9);
        assert_relative_eq!(half.zoom(), 17.0);

        let clamped = start.interpolate(&end, 2.0);
        assert_relative_eq!(clamped.center(), end.center(), epsilon = 1e-9);
        assert_relative_eq!(clamped.zoom(), 18.0);
    }
}
