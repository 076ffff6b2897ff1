//! Datasets and layers of the viewer and their initial registration with the [`MapHost`].

use std::sync::Arc;

use crate::buildings::BuildingCollection;
use crate::color::Color;
use crate::config::ViewerConfig;
use crate::decoded_image::DecodedImage;
use crate::error::SkylineError;
use crate::map::{empty_collection, Layer, LayerKind, MapHost};

/// Building footprints.
pub const BUILDINGS_DATASET: &str = "buildings";
/// One point per building, where its marker is drawn.
pub const MARKERS_DATASET: &str = "building-markers";
/// Route line and its endpoints.
pub const ROUTE_DATASET: &str = "route";
/// Box around the selected building.
pub const SELECTION_DATASET: &str = "selection-box";
/// Logged pointer presses.
pub const CLICKS_DATASET: &str = "click-markers";
/// Collected coordinates.
pub const COLLECTED_DATASET: &str = "collected-coordinates";

/// Every dataset the viewer registers.
pub const DATASETS: [&str; 6] = [
    BUILDINGS_DATASET,
    MARKERS_DATASET,
    ROUTE_DATASET,
    SELECTION_DATASET,
    CLICKS_DATASET,
    COLLECTED_DATASET,
];

/// Extruded building footprints.
pub const BUILDINGS_LAYER: &str = "buildings-3d";
/// Building marker icons. Added once the icon is loaded.
pub const MARKERS_LAYER: &str = "building-markers";
/// Route line.
pub const ROUTE_LINE_LAYER: &str = "route-line";
/// Route endpoints.
pub const ROUTE_POINTS_LAYER: &str = "route-points";
/// Selection box outline.
pub const SELECTION_LAYER: &str = "selection-box";
/// Logged pointer presses.
pub const CLICKS_LAYER: &str = "click-markers";
/// Collected coordinates.
pub const COLLECTED_LAYER: &str = "collected-points";

/// Layers affected by the category filter.
pub const FILTERED_LAYERS: [&str; 2] = [BUILDINGS_LAYER, MARKERS_LAYER];

/// Property holding the building height.
pub const HEIGHT_PROPERTY: &str = "height";
const DEFAULT_HEIGHT: f64 = 10.0;

/// Registers the building data and the empty overlay datasets with their layers. Datasets left
/// over from a previous setup are removed first, so the setup can run again on the same host.
pub fn install(
    host: &mut MapHost,
    buildings: &BuildingCollection,
    config: &ViewerConfig,
) -> Result<(), SkylineError> {
    for id in DATASETS {
        if host.remove_dataset(id) {
            log::debug!("Removed stale dataset '{id}'");
        }
    }

    host.add_dataset(BUILDINGS_DATASET, buildings.polygons())?;
    host.add_dataset(MARKERS_DATASET, buildings.markers())?;
    for id in [
        ROUTE_DATASET,
        SELECTION_DATASET,
        CLICKS_DATASET,
        COLLECTED_DATASET,
    ] {
        host.add_dataset(id, empty_collection())?;
    }

    host.add_layer(
        Layer::new(
            BUILDINGS_LAYER,
            BUILDINGS_DATASET,
            LayerKind::FillExtrusion {
                height_property: HEIGHT_PROPERTY.into(),
                default_height: DEFAULT_HEIGHT,
            },
            config.building_color,
        )
        .interactive(),
    )?;
    host.add_layer(Layer::new(
        SELECTION_LAYER,
        SELECTION_DATASET,
        LayerKind::Outline { width: 3.0 },
        Color::SELECTION,
    ))?;
    host.add_layer(Layer::new(
        ROUTE_LINE_LAYER,
        ROUTE_DATASET,
        LayerKind::Line { width: 4.0 },
        Color::ROUTE,
    ))?;
    host.add_layer(Layer::new(
        ROUTE_POINTS_LAYER,
        ROUTE_DATASET,
        LayerKind::Circle { radius: 6.0 },
        Color::ROUTE,
    ))?;
    host.add_layer(Layer::new(
        CLICKS_LAYER,
        CLICKS_DATASET,
        LayerKind::Circle { radius: 4.0 },
        Color::CLICK,
    ))?;
    host.add_layer(Layer::new(
        COLLECTED_LAYER,
        COLLECTED_DATASET,
        LayerKind::Circle { radius: 5.0 },
        Color::COLLECTED,
    ))?;

    log::info!(
        "Map setup done: {} buildings, {} layers",
        buildings.len(),
        host.layers().len()
    );
    Ok(())
}

/// Adds the marker layer drawing `icon` on top of the other layers, replacing an existing one.
pub fn add_marker_layer(host: &mut MapHost, icon: DecodedImage) -> Result<(), SkylineError> {
    host.remove_layer(MARKERS_LAYER);
    host.add_layer(
        Layer::new(
            MARKERS_LAYER,
            MARKERS_DATASET,
            LayerKind::Symbol {
                icon: Arc::new(icon),
            },
            Color::TRANSPARENT,
        )
        .interactive(),
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use skyline_types::lnglat;

    use super::*;
    use crate::map::MapView;

    const DATASET: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"name": "A", "id": "a", "category": "Educational"},
         "geometry": {"type": "Polygon", "coordinates": [[
            [83.0, 17.0], [83.1, 17.0], [83.1, 17.1], [83.0, 17.0]]]}}
    ]}"#;

    fn host() -> MapHost {
        MapHost::new(MapView::new(lnglat!(83.0, 17.0), 15.0), None)
    }

    #[test]
    fn install_is_idempotent() {
        let buildings = BuildingCollection::from_geojson_str(DATASET).expect("valid dataset");
        let config = ViewerConfig::default();
        let mut host = host();

        install(&mut host, &buildings, &config).expect("setup failed");
        install(&mut host, &buildings, &config).expect("second setup failed");

        assert_eq!(host.datasets().count(), 6);
        assert_eq!(host.layers().len(), 6);
        assert_eq!(host.dataset(MARKERS_DATASET).map(|d| d.len()), Some(1));
        assert!(host
            .dataset(COLLECTED_DATASET)
            .is_some_and(|d| d.is_empty()));
        assert!(host.layer(MARKERS_LAYER).is_none());
    }

    #[test]
    fn marker_layer_is_on_top() {
        let buildings = BuildingCollection::from_geojson_str(DATASET).expect("valid dataset");
        let mut host = host();
        install(&mut host, &buildings, &ViewerConfig::default()).expect("setup failed");

        let icon = DecodedImage::from_raw(vec![255; 4], 1, 1).expect("valid image");
        add_marker_layer(&mut host, icon.clone()).expect("marker layer");
        add_marker_layer(&mut host, icon).expect("marker layer again");

        assert_eq!(host.layers().len(), 7);
        let top = host.layers().last().expect("has layers");
        assert_eq!(top.id(), MARKERS_LAYER);
        assert!(top.is_interactive());
        assert_matches!(top.kind(), LayerKind::Symbol { .. });
    }
}
