//! Reconciliation of the map host with the interaction state.
//!
//! Handlers only change the [`InteractionState`]. [`Scene::from_state`] derives everything the
//! map should show from it, and [`Scene::apply`] compares that with what the host currently
//! holds and pushes only the differences.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use crate::category::CategoryStyle;
use crate::config::ViewerConfig;
use crate::map::setup::{
    BUILDINGS_LAYER, CLICKS_DATASET, COLLECTED_DATASET, FILTERED_LAYERS, ROUTE_DATASET,
    SELECTION_DATASET,
};
use crate::map::MapHost;
use crate::state::{point_feature, InteractionState, RoutePointKind};

/// A change pushed to the host by [`Scene::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneChange {
    /// Contents of the dataset were replaced.
    Dataset(&'static str),
    /// Paint color of the layer changed.
    LayerColor(&'static str),
    /// Filter of the layer changed.
    LayerFilter(&'static str),
}

/// What the overlay datasets and the category-aware layers should look like.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    datasets: Vec<(&'static str, FeatureCollection)>,
    style: CategoryStyle,
}

impl Scene {
    /// Derives the scene from the state.
    pub fn from_state(state: &InteractionState, config: &ViewerConfig) -> Self {
        Self {
            datasets: vec![
                (ROUTE_DATASET, route_collection(state)),
                (SELECTION_DATASET, selection_collection(state)),
                (CLICKS_DATASET, clicks_collection(state)),
                (COLLECTED_DATASET, state.collected_geojson()),
            ],
            style: state
                .category()
                .layer_style(config.building_color, config.highlight_color),
        }
    }

    /// Desired contents of a dataset.
    pub fn dataset(&self, id: &str) -> Option<&FeatureCollection> {
        self.datasets
            .iter()
            .find(|(dataset_id, _)| *dataset_id == id)
            .map(|(_, data)| data)
    }

    /// Desired style of the category-aware layers.
    pub fn style(&self) -> &CategoryStyle {
        &self.style
    }

    /// Brings the host in line with the scene. Datasets and layers the host does not have are
    /// skipped. Returns the changes that were made.
    pub fn apply(self, host: &mut MapHost) -> Vec<SceneChange> {
        let mut changes = vec![];

        for (id, data) in self.datasets {
            let Some(current) = host.dataset(id) else {
                continue;
            };

            if current.data() != &data && host.set_dataset(id, data).is_ok() {
                changes.push(SceneChange::Dataset(id));
            }
        }

        if host
            .layer(BUILDINGS_LAYER)
            .is_some_and(|layer| layer.color() != self.style.color)
            && host
                .set_layer_color(BUILDINGS_LAYER, self.style.color)
                .is_ok()
        {
            changes.push(SceneChange::LayerColor(BUILDINGS_LAYER));
        }

        for id in FILTERED_LAYERS {
            if host
                .layer(id)
                .is_some_and(|layer| layer.filter() != &self.style.filter)
                && host.set_layer_filter(id, self.style.filter.clone()).is_ok()
            {
                changes.push(SceneChange::LayerFilter(id));
            }
        }

        if !changes.is_empty() {
            log::debug!("Scene reconciled: {changes:?}");
        }

        changes
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn properties(value: serde_json::Value) -> Option<JsonObject> {
    match value {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    }
}

fn route_collection(state: &InteractionState) -> FeatureCollection {
    let route = state.route();
    let mut features: Vec<Feature> = route
        .points()
        .into_iter()
        .map(|p| {
            let role = match p.kind {
                RoutePointKind::Start => "start",
                RoutePointKind::End => "end",
            };
            point_feature(p.point, properties(json!({ "role": role })))
        })
        .collect();

    if let Some(line) = route.line() {
        features.push(Feature {
            bbox: None,
            geometry: Some(line.clone()),
            id: None,
            properties: properties(json!({ "role": "route" })),
            foreign_members: None,
        });
    }

    collection(features)
}

fn selection_collection(state: &InteractionState) -> FeatureCollection {
    let features = state
        .selected_feature()
        .map(|selected| Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::from(&selected.extent))),
            id: None,
            properties: properties(json!({ "id": selected.id, "name": selected.name })),
            foreign_members: None,
        })
        .into_iter()
        .collect();

    collection(features)
}

fn clicks_collection(state: &InteractionState) -> FeatureCollection {
    collection(
        state
            .clicks()
            .iter()
            .map(|click| {
                point_feature(
                    click.point,
                    properties(json!({ "button": format!("{:?}", click.button) })),
                )
            })
            .collect(),
    )
}
