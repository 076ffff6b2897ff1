use std::sync::Arc;

use parking_lot::RwLock;

use crate::buildings::Building;
use crate::config::ViewerConfig;
use crate::control::{EventPropagation, MouseButton, MouseEvent, UserEvent, UserEventHandler};
use crate::dispatch::Dispatcher;
use crate::map::setup::{BUILDINGS_LAYER, MARKERS_LAYER};
use crate::map::{MapHost, QueriedFeature};
use crate::state::{InteractionState, LoggedClick, SelectedFeature};

/// Turns pointer input into changes of the [`InteractionState`]: feature selection, reverse
/// geocoding, the click log and coordinate collection.
///
/// Feature hits always win. A primary click on a building or a marker selects it and never
/// starts a reverse geocode; a secondary press on a marker never collects its coordinate.
pub struct InteractionHandler {
    state: Arc<RwLock<InteractionState>>,
    dispatcher: Dispatcher,
    selection_zoom: f64,
    selection_pitch: f64,
    hit_tolerance: f64,
}

impl InteractionHandler {
    /// Creates a new handler writing into `state`.
    pub fn new(
        state: Arc<RwLock<InteractionState>>,
        dispatcher: Dispatcher,
        config: &ViewerConfig,
    ) -> Self {
        Self {
            state,
            dispatcher,
            selection_zoom: config.selection_zoom,
            selection_pitch: config.selection_pitch,
            hit_tolerance: config.marker_hit_tolerance,
        }
    }

    fn query(&self, layer_id: &str, event: &MouseEvent, map: &MapHost) -> Option<QueriedFeature> {
        map.query_features(event.screen_pointer_position, &[layer_id], self.hit_tolerance)
            .into_iter()
            .next()
    }

    fn marker_hit(&self, event: &MouseEvent, map: &MapHost) -> Option<QueriedFeature> {
        self.query(MARKERS_LAYER, event, map)
    }

    fn feature_hit(&self, event: &MouseEvent, map: &MapHost) -> Option<QueriedFeature> {
        self.marker_hit(event, map)
            .or_else(|| self.query(BUILDINGS_LAYER, event, map))
    }

    fn select(&self, hit: QueriedFeature, map: &mut MapHost) -> SelectedFeature {
        let selection = selection(hit);
        log::debug!("Selected '{}' at {:?}", selection.id, selection.center);

        map.fly_to(
            selection.center,
            self.selection_zoom,
            Some(self.selection_pitch),
        );
        self.state.write().select_feature(selection.clone());

        selection
    }

    fn on_press(&self, button: MouseButton, event: &MouseEvent, map: &MapHost) {
        let point = event.map_pointer_position;
        let collect = button == MouseButton::Right && self.marker_hit(event, map).is_none();

        let mut state = self.state.write();
        state.log_click(LoggedClick { point, button });
        if collect {
            state.collect(point);
            state.clear_route();
        }
    }

    fn on_primary_click(&self, event: &MouseEvent, map: &mut MapHost) -> EventPropagation {
        if let Some(hit) = self.feature_hit(event, map) {
            self.select(hit, map);
            return EventPropagation::Stop;
        }

        let point = event.map_pointer_position;
        let token = self.dispatcher.reverse_geocode(point);
        self.state.write().begin_reverse_geocode(token, point);

        EventPropagation::Propagate
    }

    fn on_context_menu(&self, event: &MouseEvent, map: &mut MapHost) -> EventPropagation {
        let Some(hit) = self.marker_hit(event, map) else {
            return EventPropagation::Propagate;
        };

        self.select(hit, map);
        self.state.write().panels.collection_panel_open = false;

        EventPropagation::Stop
    }
}

impl UserEventHandler for InteractionHandler {
    fn handle(&self, event: &UserEvent, map: &mut MapHost) -> EventPropagation {
        match event {
            UserEvent::ButtonPressed(button, mouse_event) => {
                self.on_press(*button, mouse_event, map);
                EventPropagation::Propagate
            }
            UserEvent::Click(MouseButton::Left, mouse_event) => {
                self.on_primary_click(mouse_event, map)
            }
            UserEvent::ContextMenu(mouse_event) => self.on_context_menu(mouse_event, map),
            _ => EventPropagation::Propagate,
        }
    }
}

/// Marker hits are represented by the marker point, building hits by the footprint centroid.
fn selection(hit: QueriedFeature) -> SelectedFeature {
    let building = Building::new(hit.feature);
    let center = if hit.layer_id == MARKERS_LAYER {
        building.marker_point()
    } else {
        building.centroid()
    };

    SelectedFeature::new(building.properties().clone(), center, building.extent())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use skyline_types::{lnglat, GeoPoint};

    use super::*;
    use crate::buildings::BuildingCollection;
    use crate::control::MouseButtonsState;
    use crate::decoded_image::DecodedImage;
    use crate::map::setup::{add_marker_layer, install};
    use crate::map::{MapView, Size};
    use crate::state::{Overlay, RouteState, TokenSource};
    use crate::testing::{fake_services, DATASET};

    struct Fixture {
        host: MapHost,
        state: Arc<RwLock<InteractionState>>,
        handler: InteractionHandler,
    }

    fn fixture(with_markers: bool) -> Fixture {
        let config = ViewerConfig::default();
        let mut host = MapHost::new(
            MapView::new(lnglat!(83.1, 17.1), 16.0).with_size(Size::new(800.0, 600.0)),
            None,
        );
        let buildings = BuildingCollection::from_geojson_str(DATASET).expect("valid dataset");
        install(&mut host, &buildings, &config).expect("setup failed");
        if with_markers {
            let icon = DecodedImage::from_raw(vec![0; 4], 1, 1).expect("valid icon");
            add_marker_layer(&mut host, icon).expect("marker layer");
        }

        let state = Arc::new(RwLock::new(InteractionState::new(&config)));
        let (dispatcher, _receiver) = Dispatcher::new(fake_services());
        let handler = InteractionHandler::new(state.clone(), dispatcher, &config);

        Fixture {
            host,
            state,
            handler,
        }
    }

    fn mouse_event(host: &MapHost, point: GeoPoint) -> MouseEvent {
        let px = host.view().geo_to_screen(&point);
        MouseEvent {
            screen_pointer_position: px,
            map_pointer_position: host.view().screen_to_geo(px),
            buttons: MouseButtonsState::default(),
        }
    }

    #[tokio::test]
    async fn click_on_building_selects_it() {
        let Fixture {
            mut host,
            state,
            handler,
        } = fixture(false);

        let event = mouse_event(&host, lnglat!(83.1, 17.05));
        let result = handler.handle(&UserEvent::Click(MouseButton::Left, event), &mut host);

        assert_eq!(result, EventPropagation::Stop);
        let state = state.read();
        let selected = state.selected_feature().expect("building selected");
        assert_eq!(selected.id, "kgh");
        assert!(state.panels.image_viewer_open);
        assert_relative_eq!(host.target_view().zoom(), 18.0);
        assert_relative_eq!(host.target_view().center(), selected.center);
    }

    #[tokio::test]
    async fn marker_wins_over_building() {
        let Fixture {
            mut host,
            state,
            handler,
        } = fixture(true);

        let event = mouse_event(&host, lnglat!(83.15, 17.1));
        handler.handle(&UserEvent::Click(MouseButton::Left, event), &mut host);

        let state = state.read();
        let selected = state.selected_feature().expect("marker selected");
        assert_eq!(selected.id, "lib");
        assert_relative_eq!(selected.center, lnglat!(83.15, 17.1), epsilon = 1e-9);
    }

    #[tokio::test]
    async fn click_on_empty_map_reverse_geocodes() {
        let Fixture {
            mut host,
            state,
            handler,
        } = fixture(true);
        state.write().begin_route(
            TokenSource::default().next(),
            lnglat!(83.0, 17.0),
            lnglat!(83.1, 17.1),
        );

        let event = mouse_event(&host, lnglat!(83.3, 17.3));
        let result = handler.handle(&UserEvent::Click(MouseButton::Left, event), &mut host);

        assert_eq!(result, EventPropagation::Propagate);
        let state = state.read();
        assert!(state.is_reverse_geocoding());
        assert_eq!(state.route(), &RouteState::None);
    }

    #[tokio::test]
    async fn secondary_press_collects() {
        let Fixture {
            mut host,
            state,
            handler,
        } = fixture(true);

        let event = mouse_event(&host, lnglat!(83.3, 17.3));
        handler.handle(&UserEvent::ButtonPressed(MouseButton::Right, event.clone()), &mut host);
        handler.handle(&UserEvent::ContextMenu(event), &mut host);

        let state = state.read();
        assert_eq!(state.collected().len(), 1);
        assert!(state.panels.collection_panel_open);
        assert_eq!(state.clicks().len(), 1);
        assert_eq!(state.overlay(), &Overlay::None);
    }

    #[tokio::test]
    async fn secondary_press_on_marker_selects() {
        let Fixture {
            mut host,
            state,
            handler,
        } = fixture(true);
        state.write().collect(lnglat!(0.0, 0.0));

        let event = mouse_event(&host, lnglat!(83.15, 17.1));
        handler.handle(&UserEvent::ButtonPressed(MouseButton::Right, event.clone()), &mut host);
        let result = handler.handle(&UserEvent::ContextMenu(event), &mut host);

        assert_eq!(result, EventPropagation::Stop);
        let state = state.read();
        assert_eq!(state.collected().len(), 1);
        assert!(!state.panels.collection_panel_open);
        assert_matches!(state.overlay(), Overlay::Feature(f) if f.id == "lib");
        assert_eq!(
            state.clicks().latest().map(|c| c.button),
            Some(MouseButton::Right)
        );
    }

    #[tokio::test]
    async fn primary_press_is_only_logged() {
        let Fixture {
            mut host,
            state,
            handler,
        } = fixture(false);

        let event = mouse_event(&host, lnglat!(83.3, 17.3));
        handler.handle(&UserEvent::ButtonPressed(MouseButton::Left, event), &mut host);

        let state = state.read();
        assert!(state.collected().is_empty());
        assert_eq!(state.clicks().len(), 1);
    }
}
