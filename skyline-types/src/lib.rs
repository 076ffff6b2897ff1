//! Geographic primitives used by the `skyline` map viewer.
//!
//! Coordinates are stored in the order the web mapping world uses them: longitude first,
//! latitude second. Geometry algorithms (point-in-polygon, centroid, bounding boxes) treat
//! `lng`/`lat` as planar `x`/`y`, which is accurate enough for building footprints.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod bounding_rect;
pub mod contour;
pub mod error;
mod geo_point;
pub mod mercator;
mod point;
pub mod polygon;

#[cfg(feature = "geojson")]
pub mod geojson;

pub use bounding_rect::BoundingRect;
pub use contour::Contour;
pub use geo_point::GeoPoint;
pub use point::Point2d;
pub use polygon::Polygon;
