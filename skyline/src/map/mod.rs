//! Map host: the owner of the drawing surface state (camera, datasets and layers).

use std::time::Duration;

use geojson::{Feature, FeatureCollection, Value};
use skyline_types::geojson::convert_polygon;
use skyline_types::{GeoPoint, Point2d};
use web_time::Instant;

use crate::color::Color;
use crate::error::SkylineError;
use crate::messenger::Messenger;

mod dataset;
mod layer;
pub mod setup;
mod view;

pub use dataset::{empty_collection, Dataset};
pub use layer::{Filter, Layer, LayerKind};
pub use view::{MapView, Size};

const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Default duration of [`MapHost::fly_to`] animations.
pub const FLY_DURATION: Duration = Duration::from_millis(1500);

/// Notifications the host produces for the rest of the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The camera moved. Carries the new center.
    Moved(GeoPoint),
}

/// Feature found under a screen point.
#[derive(Debug, Clone, PartialEq)]
pub struct QueriedFeature {
    /// Layer the feature was hit in.
    pub layer_id: String,
    /// Copy of the feature.
    pub feature: Feature,
}

/// Owns the state of the map surface: the camera, the registered datasets and the layers
/// drawing them.
///
/// The host is created once per mount of the viewer and dropped on unmount. Drawing itself is
/// done by the surface behind the [`Messenger`], which is asked to redraw after every change.
pub struct MapHost {
    view: MapView,
    datasets: Vec<Dataset>,
    layers: Vec<Layer>,
    messenger: Option<Box<dyn Messenger>>,
    animation: Option<AnimationParameters>,
    events: Vec<HostEvent>,
}

struct AnimationParameters {
    start_view: MapView,
    end_view: MapView,
    start_time: Instant,
    duration: Duration,
}

impl MapHost {
    /// Creates a new host with no datasets and no layers.
    pub fn new(view: MapView, messenger: Option<Box<dyn Messenger>>) -> Self {
        log::debug!("Map host created at {:?}", view.center());
        Self {
            view,
            datasets: vec![],
            layers: vec![],
            messenger,
            animation: None,
            events: vec![],
        }
    }

    /// Current view of the map.
    pub fn view(&self) -> &MapView {
        &self.view
    }

    /// Changes the view of the map to the given one.
    pub fn set_view(&mut self, view: MapView) {
        let moved = view.center() != self.view.center();
        self.view = view;
        if moved {
            self.events.push(HostEvent::Moved(view.center()));
        }

        self.redraw();
    }

    /// Set the size of the surface.
    pub fn set_size(&mut self, size: Size) {
        self.view = self.view.with_size(size);
        self.redraw();
    }

    /// Request redraw of the map.
    pub fn redraw(&self) {
        if let Some(messenger) = &self.messenger {
            messenger.request_redraw();
        }
    }

    /// Request a gradual change of the map view to the specified view.
    pub fn animate_to(&mut self, target: MapView, duration: Duration) {
        let now = Instant::now();
        self.animation = Some(AnimationParameters {
            start_view: self.view,
            end_view: target.with_size(self.view.size()),
            start_time: now.checked_sub(FRAME_DURATION).unwrap_or(now),
            duration,
        });
        self.redraw();
    }

    /// Flies the camera to `center` with the given zoom and pitch.
    pub fn fly_to(&mut self, center: GeoPoint, zoom: f64, pitch: Option<f64>) {
        let mut target = self.target_view().with_center(center).with_zoom(zoom);
        if let Some(pitch) = pitch {
            target = target.with_pitch(pitch);
        }

        self.animate_to(target, FLY_DURATION);
    }

    /// Target view of the current animation, or the current view if nothing is animated.
    pub fn target_view(&self) -> &MapView {
        self.animation
            .as_ref()
            .map(|v| &v.end_view)
            .unwrap_or(&self.view)
    }

    /// Advances the camera animation started by [`MapHost::animate_to`] to the moment `now`.
    pub fn animate(&mut self, now: Instant) {
        let Some(animation) = &self.animation else {
            return;
        };

        let k = now
            .saturating_duration_since(animation.start_time)
            .as_millis() as f64
            / animation.duration.as_millis().max(1) as f64;

        let view = if k >= 1.0 {
            let end_view = animation.end_view;
            self.animation = None;
            end_view
        } else {
            animation.start_view.interpolate(&animation.end_view, k)
        };

        self.set_view(view);
    }

    /// Takes notifications produced since the last call.
    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns the dataset with the given id.
    pub fn dataset(&self, id: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id() == id)
    }

    /// Iterates over registered datasets.
    pub fn datasets(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }

    /// Registers a new dataset.
    pub fn add_dataset(
        &mut self,
        id: impl Into<String>,
        data: FeatureCollection,
    ) -> Result<(), SkylineError> {
        let id = id.into();
        if self.dataset(&id).is_some() {
            return Err(SkylineError::Duplicate(id));
        }

        self.datasets.push(Dataset::new(id, data));
        self.redraw();
        Ok(())
    }

    /// Replaces the contents of a dataset.
    pub fn set_dataset(&mut self, id: &str, data: FeatureCollection) -> Result<(), SkylineError> {
        let dataset = self
            .datasets
            .iter_mut()
            .find(|d| d.id() == id)
            .ok_or_else(|| SkylineError::NotFound(id.to_string()))?;
        dataset.replace(data);

        self.redraw();
        Ok(())
    }

    /// Removes a dataset together with all layers drawing it. Returns false if there was no
    /// dataset with this id.
    pub fn remove_dataset(&mut self, id: &str) -> bool {
        let count = self.datasets.len();
        self.datasets.retain(|d| d.id() != id);
        if self.datasets.len() == count {
            return false;
        }

        self.layers.retain(|l| l.dataset_id() != id);
        self.redraw();
        true
    }

    /// Returns the layer with the given id.
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    /// Layers in drawing order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Adds a layer on top of the existing ones. The dataset of the layer must be registered.
    pub fn add_layer(&mut self, layer: Layer) -> Result<(), SkylineError> {
        if self.layer(layer.id()).is_some() {
            return Err(SkylineError::Duplicate(layer.id().to_string()));
        }

        if self.dataset(layer.dataset_id()).is_none() {
            return Err(SkylineError::NotFound(layer.dataset_id().to_string()));
        }

        self.layers.push(layer);
        self.redraw();
        Ok(())
    }

    /// Removes a layer. Returns false if there was no layer with this id.
    pub fn remove_layer(&mut self, id: &str) -> bool {
        let count = self.layers.len();
        self.layers.retain(|l| l.id() != id);
        let removed = self.layers.len() != count;
        if removed {
            self.redraw();
        }

        removed
    }

    /// Sets the feature filter of a layer.
    pub fn set_layer_filter(&mut self, id: &str, filter: Filter) -> Result<(), SkylineError> {
        self.layer_mut(id)?.set_filter(filter);
        self.redraw();
        Ok(())
    }

    /// Sets the paint color of a layer.
    pub fn set_layer_color(&mut self, id: &str, color: Color) -> Result<(), SkylineError> {
        self.layer_mut(id)?.set_color(color);
        self.redraw();
        Ok(())
    }

    fn layer_mut(&mut self, id: &str) -> Result<&mut Layer, SkylineError> {
        self.layers
            .iter_mut()
            .find(|l| l.id() == id)
            .ok_or_else(|| SkylineError::NotFound(id.to_string()))
    }

    /// Returns the features drawn under the screen point `px` by the given layers, top-most
    /// layer first. Only interactive layers are queried, and only features passing the layer
    /// filter can be hit. Point features are hit within `tolerance` pixels.
    pub fn query_features(
        &self,
        px: Point2d,
        layer_ids: &[&str],
        tolerance: f64,
    ) -> Vec<QueriedFeature> {
        let position = self.view.screen_to_geo(px);
        let mut found = vec![];

        for layer in self.layers.iter().rev() {
            if !layer.is_interactive() || !layer_ids.contains(&layer.id()) {
                continue;
            }

            let Some(dataset) = self.dataset(layer.dataset_id()) else {
                continue;
            };

            for feature in &dataset.data().features {
                if !layer.filter().matches(feature) {
                    continue;
                }

                if self.is_hit(feature, px, &position, tolerance) {
                    found.push(QueriedFeature {
                        layer_id: layer.id().to_string(),
                        feature: feature.clone(),
                    });
                }
            }
        }

        found
    }

    fn is_hit(&self, feature: &Feature, px: Point2d, position: &GeoPoint, tolerance: f64) -> bool {
        let Some(geometry) = &feature.geometry else {
            return false;
        };

        match &geometry.value {
            Value::Point(p) => GeoPoint::try_from(p)
                .map(|p| self.view.geo_to_screen(&p).distance(&px) <= tolerance)
                .unwrap_or(false),
            Value::Polygon(polygon) => convert_polygon(polygon)
                .map(|p| p.contains_point(position))
                .unwrap_or(false),
            Value::MultiPolygon(polygons) => polygons.iter().any(|polygon| {
                convert_polygon(polygon)
                    .map(|p| p.contains_point(position))
                    .unwrap_or(false)
            }),
            _ => false,
        }
    }
}

impl Drop for MapHost {
    fn drop(&mut self) {
        log::debug!(
            "Map host released with {} datasets and {} layers",
            self.datasets.len(),
            self.layers.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use serde_json::json;
    use skyline_types::lnglat;

    use super::*;

    struct CountingMessenger(Arc<AtomicUsize>);

    impl Messenger for CountingMessenger {
        fn request_redraw(&self) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn host() -> MapHost {
        MapHost::new(
            MapView::new(lnglat!(83.2185, 17.6868), 17.0).with_size(Size::new(800.0, 600.0)),
            None,
        )
    }

    fn collection(features: serde_json::Value) -> FeatureCollection {
        serde_json::from_value(json!({"type": "FeatureCollection", "features": features}))
            .expect("valid collection")
    }

    fn square_around(center: GeoPoint, half: f64, category: &str) -> serde_json::Value {
        json!({
            "type": "Feature",
            "properties": {"category": category},
            "geometry": {"type": "Polygon", "coordinates": [[
                [center.lng - half, center.lat - half],
                [center.lng + half, center.lat - half],
                [center.lng + half, center.lat + half],
                [center.lng - half, center.lat + half],
                [center.lng - half, center.lat - half],
            ]]}
        })
    }

    #[test]
    fn dataset_lifecycle() {
        let mut host = host();
        host.add_dataset("a", empty_collection()).expect("added");
        assert_matches!(
            host.add_dataset("a", empty_collection()),
            Err(SkylineError::Duplicate(_))
        );

        host.add_layer(Layer::new("a-line", "a", LayerKind::Line { width: 2.0 }, Color::ROUTE))
            .expect("added");
        assert_matches!(
            host.add_layer(Layer::new("b-line", "b", LayerKind::Line { width: 2.0 }, Color::ROUTE)),
            Err(SkylineError::NotFound(_))
        );

        host.set_dataset("a", collection(json!([]))).expect("replaced");
        assert_eq!(host.dataset("a").map(|d| d.revision()), Some(1));
        assert_matches!(
            host.set_dataset("missing", empty_collection()),
            Err(SkylineError::NotFound(_))
        );

        assert!(host.remove_dataset("a"));
        assert!(host.layer("a-line").is_none());
        assert!(!host.remove_dataset("a"));
    }

    #[test]
    fn changes_request_redraw() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut host = MapHost::new(
            MapView::default(),
            Some(Box::new(CountingMessenger(counter.clone()))),
        );

        host.add_dataset("a", empty_collection()).expect("added");
        host.set_dataset("a", empty_collection()).expect("replaced");
        host.set_view(MapView::new(lnglat!(1.0, 1.0), 3.0));

        assert_eq!(counter.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn query_respects_filter_and_interactivity() {
        let mut host = host();
        let center = host.view().center();
        host.add_dataset(
            "buildings",
            collection(json!([square_around(center, 0.0005, "Commercial")])),
        )
        .expect("added");
        host.add_layer(
            Layer::new(
                "buildings-3d",
                "buildings",
                LayerKind::Outline { width: 1.0 },
                Color::BUILDING,
            )
            .interactive(),
        )
        .expect("added");
        host.add_layer(Layer::new(
            "decoration",
            "buildings",
            LayerKind::Outline { width: 1.0 },
            Color::BUILDING,
        ))
        .expect("added");

        let px = host.view().size().center();
        let hits = host.query_features(px, &["buildings-3d", "decoration"], 0.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].layer_id, "buildings-3d");

        assert!(host
            .query_features(Point2d::new(0.0, 0.0), &["buildings-3d"], 0.0)
            .is_empty());

        host.set_layer_filter("buildings-3d", Filter::eq("category", "Residential"))
            .expect("layer exists");
        assert!(host.query_features(px, &["buildings-3d"], 0.0).is_empty());
    }

    #[test]
    fn point_features_are_hit_within_tolerance() {
        let mut host = host();
        let center = host.view().center();
        host.add_dataset(
            "markers",
            collection(json!([{
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "Point", "coordinates": [center.lng, center.lat]}
            }])),
        )
        .expect("added");
        host.add_layer(
            Layer::new("markers", "markers", LayerKind::Circle { radius: 5.0 }, Color::CLICK)
                .interactive(),
        )
        .expect("added");

        let px = host.view().size().center();
        assert_eq!(
            host.query_features(px + Point2d::new(10.0, 0.0), &["markers"], 16.0)
                .len(),
            1
        );
        assert!(host
            .query_features(px + Point2d::new(30.0, 0.0), &["markers"], 16.0)
            .is_empty());
    }

    #[test]
    fn fly_to_sets_target_and_reports_moves() {
        let mut host = host();
        host.fly_to(lnglat!(83.21, 17.72), 16.0, Some(60.0));

        let target = *host.target_view();
        assert_relative_eq!(target.center(), lnglat!(83.21, 17.72));
        assert_relative_eq!(target.zoom(), 16.0);
        assert_relative_eq!(target.pitch(), 60.0);

        host.animate(Instant::now() + FLY_DURATION);
        assert_relative_eq!(host.view().center(), lnglat!(83.21, 17.72));
        assert_eq!(
            host.drain_events(),
            vec![HostEvent::Moved(lnglat!(83.21, 17.72))]
        );
        assert!(host.drain_events().is_empty());
    }
}
