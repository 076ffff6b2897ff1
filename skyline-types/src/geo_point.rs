use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

/// A point on the surface of the Earth in degrees (WGS84).
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct GeoPoint {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl GeoPoint {
    /// Null island. Used as the fallback location for features with broken geometry.
    pub const ORIGIN: GeoPoint = GeoPoint { lng: 0.0, lat: 0.0 };

    /// Creates a new point from longitude and latitude in degrees.
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Returns the point as a `[lng, lat]` pair.
    pub fn to_array(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Returns true if both coordinates are finite and inside valid WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl AbsDiffEq for GeoPoint {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.lng.abs_diff_eq(&other.lng, epsilon) && self.lat.abs_diff_eq(&other.lat, epsilon)
    }
}

impl RelativeEq for GeoPoint {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.lng.relative_eq(&other.lng, epsilon, max_relative)
            && self.lat.relative_eq(&other.lat, epsilon, max_relative)
    }
}

/// Creates a new [`GeoPoint`] from longitude and latitude values (in degrees).
///
/// ```
/// use skyline_types::lnglat;
///
/// let point = lnglat!(83.23, 17.72);
/// assert_eq!(point.lat, 17.72);
/// ```
#[macro_export]
macro_rules! lnglat {
    ($lng:expr, $lat:expr) => {
        $crate::GeoPoint::new($lng, $lat)
    };
}
