//! Conversions between `geojson` values and the crate geometries.

use geojson::{Geometry, LineStringType, PolygonType, Position, Value};

use crate::error::SkylineTypesError;
use crate::{BoundingRect, Contour, GeoPoint, Polygon};

impl TryFrom<&Position> for GeoPoint {
    type Error = SkylineTypesError;

    fn try_from(value: &Position) -> Result<Self, Self::Error> {
        if value.len() < 2 {
            return Err(SkylineTypesError::Conversion(
                "point must contain at least 2 dimensions".to_string(),
            ));
        }

        Ok(GeoPoint::new(value[0], value[1]))
    }
}

impl From<GeoPoint> for Value {
    fn from(value: GeoPoint) -> Self {
        Value::Point(vec![value.lng, value.lat])
    }
}

impl From<&Polygon> for Value {
    fn from(value: &Polygon) -> Self {
        Value::Polygon(
            value
                .iter_contours()
                .map(|c| c.iter_points_closing().map(|p| p.to_array().to_vec()).collect())
                .collect(),
        )
    }
}

impl From<&BoundingRect> for Value {
    fn from(value: &BoundingRect) -> Self {
        Value::from(&Polygon::new(value.to_contour(), vec![]))
    }
}

/// Converts a GeoJSON polygon ring into a closed contour.
pub fn convert_ring(ring: &LineStringType) -> Result<Contour, SkylineTypesError> {
    let points = ring
        .iter()
        .map(GeoPoint::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Contour::closed(points)
        .into_closed()
        .ok_or_else(|| SkylineTypesError::Conversion("ring has less than 3 points".to_string()))
}

/// Converts GeoJSON polygon coordinates into a polygon.
pub fn convert_polygon(polygon: &PolygonType) -> Result<Polygon, SkylineTypesError> {
    let Some(outer) = polygon.first() else {
        return Err(SkylineTypesError::Conversion(
            "polygon has no outer ring".to_string(),
        ));
    };

    Ok(Polygon::new(
        convert_ring(outer)?,
        polygon[1..]
            .iter()
            .map(convert_ring)
            .collect::<Result<Vec<_>, _>>()?,
    ))
}

/// Extracts the footprint polygon of a geometry. For multipolygons the first polygon is used.
pub fn footprint(geometry: &Geometry) -> Result<Polygon, SkylineTypesError> {
    match &geometry.value {
        Value::Polygon(polygon) => convert_polygon(polygon),
        Value::MultiPolygon(polygons) => match polygons.first() {
            Some(polygon) => convert_polygon(polygon),
            None => Err(SkylineTypesError::Conversion(
                "empty multipolygon".to_string(),
            )),
        },
        _ => Err(SkylineTypesError::Conversion(
            "geometry is not a polygon".to_string(),
        )),
    }
}

/// Returns the coordinates of a point geometry.
pub fn point(geometry: &Geometry) -> Result<GeoPoint, SkylineTypesError> {
    match &geometry.value {
        Value::Point(position) => GeoPoint::try_from(position),
        _ => Err(SkylineTypesError::Conversion(
            "geometry is not a point".to_string(),
        )),
    }
}

/// Returns true if the geometry is a line string or a multi line string.
pub fn is_line(geometry: &Geometry) -> bool {
    matches!(
        geometry.value,
        Value::LineString(_) | Value::MultiLineString(_)
    )
}
