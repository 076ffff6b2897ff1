use std::sync::Arc;

use geojson::Feature;
use serde_json::Value;

use crate::color::Color;
use crate::decoded_image::DecodedImage;

/// Predicate deciding which features of a dataset a layer draws (and can be hit by queries).
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Filter {
    /// Every feature passes.
    #[default]
    All,
    /// Features whose `property` equals `value`.
    Eq {
        /// Property name.
        property: String,
        /// Expected value.
        value: Value,
    },
}

impl Filter {
    /// Equality filter on a feature property.
    pub fn eq(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            property: property.into(),
            value: value.into(),
        }
    }

    /// Returns true if the feature passes the filter.
    pub fn matches(&self, feature: &Feature) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { property, value } => feature.property(property) == Some(value),
        }
    }
}

/// How a layer draws the features of its dataset.
#[derive(Debug, Clone)]
pub enum LayerKind {
    /// Polygons extruded to the height stored in the given property.
    FillExtrusion {
        /// Feature property holding the height in meters.
        height_property: String,
        /// Height used for features without the property.
        default_height: f64,
    },
    /// Point features drawn as an icon.
    Symbol {
        /// Icon image.
        icon: Arc<DecodedImage>,
    },
    /// Line features.
    Line {
        /// Line width in pixels.
        width: f64,
    },
    /// Polygon outlines.
    Outline {
        /// Line width in pixels.
        width: f64,
    },
    /// Point features drawn as circles.
    Circle {
        /// Circle radius in pixels.
        radius: f64,
    },
}

/// Paint and style rule bound to a dataset.
#[derive(Debug, Clone)]
pub struct Layer {
    id: String,
    dataset_id: String,
    kind: LayerKind,
    color: Color,
    filter: Filter,
    interactive: bool,
}

impl Layer {
    /// Creates a non-interactive layer drawing every feature of the dataset.
    pub fn new(
        id: impl Into<String>,
        dataset_id: impl Into<String>,
        kind: LayerKind,
        color: Color,
    ) -> Self {
        Self {
            id: id.into(),
            dataset_id: dataset_id.into(),
            kind,
            color,
            filter: Filter::All,
            interactive: false,
        }
    }

    /// Makes the layer a target of feature queries.
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Id of the layer.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the dataset the layer draws.
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// Kind of the layer.
    pub fn kind(&self) -> &LayerKind {
        &self.kind
    }

    /// Paint color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Current filter.
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Whether feature queries consider the layer.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub(crate) fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn feature(properties: Value) -> Feature {
        Feature {
            properties: properties.as_object().cloned(),
            ..Default::default()
        }
    }

    #[test]
    fn eq_filter() {
        let filter = Filter::eq("category", "Commercial");

        assert!(filter.matches(&feature(json!({"category": "Commercial"}))));
        assert!(!filter.matches(&feature(json!({"category": "Residential"}))));
        assert!(!filter.matches(&feature(json!({"name": "Mall"}))));
        assert!(!filter.matches(&Feature::default()));
        assert!(Filter::All.matches(&Feature::default()));
    }
}
