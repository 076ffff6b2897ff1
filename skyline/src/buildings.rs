//! Building dataset: parsing of the GeoJSON collection and derivation of marker points.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde_json::Value as JsonValue;
use skyline_types::geojson::{footprint, point};
use skyline_types::{BoundingRect, GeoPoint, Polygon};

use crate::error::SkylineError;

/// Half size in degrees of the box drawn around a selected marker.
const MARKER_EXTENT: f64 = 0.0001;

/// Properties of a building feature the viewer understands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingProperties {
    /// Display name. Empty if the feature has none.
    pub name: String,
    /// Identifier. Numeric ids are converted to strings.
    pub id: String,
    /// Category name.
    pub category: Option<String>,
    /// Url of a photo of the building.
    pub image_url: Option<String>,
    /// Height in meters, used for extrusion.
    pub height: Option<f64>,
    /// Preferred marker location, overriding the footprint centroid.
    pub viewpoint: Option<GeoPoint>,
}

impl BuildingProperties {
    /// Reads the known properties from a GeoJSON properties object. Unknown and malformed
    /// values are ignored.
    pub fn from_properties(properties: Option<&JsonObject>) -> Self {
        let Some(properties) = properties else {
            return Self::default();
        };

        Self {
            name: string_property(properties, "name").unwrap_or_default(),
            id: string_property(properties, "id").unwrap_or_default(),
            category: string_property(properties, "category"),
            image_url: string_property(properties, "imageURL").filter(|url| !url.is_empty()),
            height: match properties.get("height") {
                Some(JsonValue::Number(n)) => n.as_f64(),
                Some(JsonValue::String(s)) => s.trim().parse().ok(),
                _ => None,
            },
            viewpoint: properties
                .get("viewpoint")
                .and_then(|v| v.get("coordinates"))
                .and_then(JsonValue::as_array)
                .and_then(|coords| {
                    let lng = coords.first()?.as_f64()?;
                    let lat = coords.get(1)?.as_f64()?;
                    Some(GeoPoint::new(lng, lat))
                }),
        }
    }
}

fn string_property(properties: &JsonObject, key: &str) -> Option<String> {
    match properties.get(key)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One feature of the building dataset.
#[derive(Debug, Clone)]
pub struct Building {
    feature: Feature,
    properties: BuildingProperties,
    footprint: Option<Polygon>,
    location: Option<GeoPoint>,
}

impl Building {
    /// Wraps a dataset feature. Features without a usable geometry are kept; their
    /// representative point falls back to `[0, 0]`.
    pub fn new(feature: Feature) -> Self {
        let properties = BuildingProperties::from_properties(feature.properties.as_ref());
        let (footprint, location) = match &feature.geometry {
            Some(geometry) => (footprint(geometry).ok(), point(geometry).ok()),
            None => (None, None),
        };

        Self {
            feature,
            properties,
            footprint,
            location,
        }
    }

    /// Properties of the building.
    pub fn properties(&self) -> &BuildingProperties {
        &self.properties
    }

    /// Footprint polygon, if the feature has a polygon geometry.
    pub fn footprint(&self) -> Option<&Polygon> {
        self.footprint.as_ref()
    }

    /// The original feature.
    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    /// Point where the marker of the building is placed: the viewpoint override if present,
    /// else the footprint centroid, else the point geometry, else `[0, 0]`.
    pub fn marker_point(&self) -> GeoPoint {
        self.properties
            .viewpoint
            .or_else(|| self.footprint.as_ref().and_then(Polygon::centroid))
            .or(self.location)
            .unwrap_or_else(|| {
                log::warn!(
                    "Building '{}' has no usable location, placing its marker at [0, 0]",
                    self.properties.id
                );
                GeoPoint::ORIGIN
            })
    }

    /// Representative point of the footprint: its centroid, or the marker point for buildings
    /// without a polygon.
    pub fn centroid(&self) -> GeoPoint {
        self.footprint
            .as_ref()
            .and_then(Polygon::centroid)
            .unwrap_or_else(|| self.marker_point())
    }

    /// Extent of the footprint. Buildings without a polygon get a small box around the marker.
    pub fn extent(&self) -> BoundingRect {
        self.footprint
            .as_ref()
            .and_then(Polygon::bounding_rect)
            .unwrap_or_else(|| BoundingRect::from_point(&self.marker_point()).expand(MARKER_EXTENT))
    }

    /// Point feature for the marker dataset, carrying the properties of the building.
    pub fn marker_feature(&self) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::from(self.marker_point()))),
            id: self.feature.id.clone(),
            properties: self.feature.properties.clone(),
            foreign_members: None,
        }
    }
}

/// The building dataset shown by the viewer.
#[derive(Debug, Clone, Default)]
pub struct BuildingCollection {
    buildings: Vec<Building>,
}

impl BuildingCollection {
    /// Creates a collection from the features of a GeoJSON feature collection.
    pub fn new(collection: FeatureCollection) -> Self {
        Self {
            buildings: collection.features.into_iter().map(Building::new).collect(),
        }
    }

    /// Parses a GeoJSON document. The document must be a `FeatureCollection`.
    pub fn from_geojson_str(json: &str) -> Result<Self, SkylineError> {
        match json
            .parse::<GeoJson>()
            .map_err(|e| SkylineError::Decoding(e.to_string()))?
        {
            GeoJson::FeatureCollection(collection) => Ok(Self::new(collection)),
            _ => Err(SkylineError::Decoding(
                "building dataset must be a FeatureCollection".into(),
            )),
        }
    }

    /// Iterates over the buildings.
    pub fn iter(&self) -> impl Iterator<Item = &Building> {
        self.buildings.iter()
    }

    /// Number of buildings.
    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Feature collection for the building polygon dataset.
    pub fn polygons(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.buildings.iter().map(|b| b.feature.clone()).collect(),
            foreign_members: None,
        }
    }

    /// Feature collection for the marker point dataset.
    pub fn markers(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.buildings.iter().map(Building::marker_feature).collect(),
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use skyline_types::lnglat;

    use super::*;

    const DATASET: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "Kailasagiri", "id": 7, "category": "Recreational",
                               "height": "35", "imageURL": "https://img.example.com/k.jpg"},
                "geometry": {"type": "Polygon", "coordinates": [[
                    [83.0, 17.0], [83.2, 17.0], [83.2, 17.2], [83.0, 17.2], [83.0, 17.0]
                ]]}
            },
            {
                "type": "Feature",
                "properties": {"name": "Tower", "id": "t-1", "category": "Commercial",
                               "viewpoint": {"coordinates": [83.5, 17.5]}},
                "geometry": {"type": "Polygon", "coordinates": [[
                    [83.0, 17.0], [83.2, 17.0], [83.2, 17.2], [83.0, 17.0]
                ]]}
            },
            {
                "type": "Feature",
                "properties": {"name": "Broken", "id": "b", "imageURL": ""},
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": {"name": "Lighthouse", "id": "l"},
                "geometry": {"type": "Point", "coordinates": [83.3, 17.7]}
            }
        ]
    }"#;

    #[test]
    fn properties_are_parsed() {
        let collection = BuildingCollection::from_geojson_str(DATASET).expect("valid dataset");
        assert_eq!(collection.len(), 4);

        let first = collection.iter().next().expect("has buildings").properties();
        assert_eq!(first.name, "Kailasagiri");
        assert_eq!(first.id, "7");
        assert_eq!(first.category.as_deref(), Some("Recreational"));
        assert_eq!(first.image_url.as_deref(), Some("https://img.example.com/k.jpg"));
        assert_eq!(first.height, Some(35.0));

        let broken = collection.iter().nth(2).expect("has buildings").properties();
        assert_eq!(broken.image_url, None);
        assert_eq!(broken.category, None);
    }

    #[test]
    fn marker_point_fallbacks() {
        let collection = BuildingCollection::from_geojson_str(DATASET).expect("valid dataset");
        let points: Vec<GeoPoint> = collection.iter().map(Building::marker_point).collect();

        assert_relative_eq!(points[0], lnglat!(83.1, 17.1), epsilon = 1e-9);
        assert_eq!(points[1], lnglat!(83.5, 17.5));
        assert_eq!(points[2], GeoPoint::ORIGIN);
        assert_eq!(points[3], lnglat!(83.3, 17.7));
    }

    #[test]
    fn centroid_ignores_viewpoint() {
        let collection = BuildingCollection::from_geojson_str(DATASET).expect("valid dataset");
        let tower = collection.iter().nth(1).expect("has buildings");

        assert_relative_eq!(
            tower.centroid(),
            lnglat!((83.0 + 83.2 + 83.2) / 3.0, (17.0 + 17.0 + 17.2) / 3.0),
            epsilon = 1e-9
        );
        assert_relative_eq!(tower.extent().lat_max, 17.2, epsilon = 1e-9);

        let lighthouse = collection.iter().nth(3).expect("has buildings");
        assert_eq!(lighthouse.centroid(), lnglat!(83.3, 17.7));
        assert!(lighthouse.extent().contains(&lnglat!(83.3, 17.7)));
    }

    #[test]
    fn markers_carry_properties() {
        let collection = BuildingCollection::from_geojson_str(DATASET).expect("valid dataset");
        let markers = collection.markers();

        assert_eq!(markers.features.len(), 4);
        assert_eq!(
            markers.features[1].property("name"),
            Some(&JsonValue::from("Tower"))
        );
        assert_matches!(
            markers.features[1].geometry.as_ref().map(|g| &g.value),
            Some(Value::Point(_))
        );
        assert_eq!(collection.polygons().features.len(), 4);
    }

    #[test]
    fn non_collection_is_rejected() {
        assert_matches!(
            BuildingCollection::from_geojson_str(
                r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#
            ),
            Err(SkylineError::Decoding(_))
        );
        assert!(BuildingCollection::from_geojson_str("not json").is_err());
    }
}
