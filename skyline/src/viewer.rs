//! [`MapViewer`]: the component tying the map host, input handling, interaction state,
//! network services and reconciliation together.

use std::sync::Arc;

use geojson::FeatureCollection;
use parking_lot::{RwLock, RwLockReadGuard};
use skyline_types::GeoPoint;
use tokio::sync::mpsc::UnboundedReceiver;
use web_time::Instant;

use crate::buildings::BuildingCollection;
use crate::category::Category;
use crate::config::ViewerConfig;
use crate::control::{EventProcessor, InteractionHandler, MapController, RawUserEvent};
use crate::debounce::Debouncer;
use crate::dispatch::{Completion, Dispatcher};
use crate::error::SkylineError;
use crate::map::{setup, HostEvent, MapHost, MapView, Size};
use crate::messenger::Messenger;
use crate::services::{SearchSuggestion, Services};
use crate::state::{InteractionState, RequestToken, RouteOutcome};
use crate::sync::Scene;

/// Interactive building map.
///
/// The viewer owns the [`MapHost`] while it is mounted, turns pointer input into state changes,
/// runs geocoding and routing requests in the background and keeps the map in line with the
/// [`InteractionState`]. The embedding application calls [`MapViewer::tick`] once per frame;
/// finished requests and debounced searches are applied there.
pub struct MapViewer {
    config: ViewerConfig,
    buildings: BuildingCollection,
    host: Option<MapHost>,
    event_processor: EventProcessor,
    state: Arc<RwLock<InteractionState>>,
    dispatcher: Dispatcher,
    completions: UnboundedReceiver<Completion>,
    debouncer: Debouncer<String>,
    icon_request: Option<RequestToken>,
}

impl MapViewer {
    /// Creates a viewer for the given building dataset. Nothing is drawn until the viewer is
    /// mounted.
    pub fn new(config: ViewerConfig, buildings: BuildingCollection, services: Services) -> Self {
        let state = Arc::new(RwLock::new(InteractionState::new(&config)));
        let (dispatcher, completions) = Dispatcher::new(services);

        let mut event_processor = EventProcessor::default();
        event_processor.add_handler(InteractionHandler::new(
            state.clone(),
            dispatcher.clone(),
            &config,
        ));
        event_processor.add_handler(MapController::default());

        Self {
            debouncer: Debouncer::new(config.debounce_delay()),
            config,
            buildings,
            host: None,
            event_processor,
            state,
            dispatcher,
            completions,
            icon_request: None,
        }
    }

    /// Creates a viewer talking to the services named in `config` over HTTP.
    pub fn with_http_services(
        config: ViewerConfig,
        buildings: BuildingCollection,
    ) -> Result<Self, SkylineError> {
        let platform = Arc::new(crate::platform::PlatformServiceImpl::new()?);
        let services = Services::from_config(&config, platform);
        Ok(Self::new(config, buildings, services))
    }

    /// Configuration of the viewer.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Current interaction state.
    pub fn state(&self) -> RwLockReadGuard<'_, InteractionState> {
        self.state.read()
    }

    /// The map host, if the viewer is mounted.
    pub fn host(&self) -> Option<&MapHost> {
        self.host.as_ref()
    }

    /// Returns true if the viewer is mounted.
    pub fn is_mounted(&self) -> bool {
        self.host.is_some()
    }

    /// Creates the map host with the surface of the given size and registers the datasets and
    /// layers. Mounting an already mounted viewer does nothing.
    pub fn mount(
        &mut self,
        size: Size,
        messenger: Option<Box<dyn Messenger>>,
    ) -> Result<(), SkylineError> {
        if self.host.is_some() {
            log::warn!("Map viewer is already mounted");
            return Ok(());
        }

        let view = MapView::new(self.config.initial_center, self.config.initial_zoom)
            .with_pitch(self.config.initial_pitch)
            .with_size(size);
        let mut host = MapHost::new(view, messenger);
        setup::install(&mut host, &self.buildings, &self.config)?;

        self.state.write().set_center(view.center());
        self.icon_request = self
            .config
            .marker_icon_url
            .clone()
            .map(|url| self.dispatcher.load_icon(url));
        self.host = Some(host);
        self.sync();

        log::info!("Map viewer mounted");
        Ok(())
    }

    /// Releases the map host. Requests that finish later only update the interaction state.
    pub fn unmount(&mut self) {
        if self.host.take().is_some() {
            self.icon_request = None;
            self.debouncer.cancel();
            log::info!("Map viewer unmounted");
        }
    }

    /// Changes the size of the map surface.
    pub fn resize(&mut self, size: Size) -> Result<(), SkylineError> {
        self.host_mut()?.set_size(size);
        Ok(())
    }

    fn host_mut(&mut self) -> Result<&mut MapHost, SkylineError> {
        self.host.as_mut().ok_or(SkylineError::NotMounted)
    }

    /// Handles a pointer event from the map surface.
    pub fn handle_event(&mut self, event: RawUserEvent) {
        let Some(host) = self.host.as_mut() else {
            log::debug!("Ignoring {event:?}: viewer is not mounted");
            return;
        };

        self.event_processor.handle(event, host);
        self.sync();
    }

    /// Advances the viewer to the moment `now`: fires the debounced suggestion request, moves
    /// camera animations and applies finished requests.
    pub fn tick(&mut self, now: Instant) {
        if let Some(query) = self.debouncer.poll(now) {
            let token = self
                .dispatcher
                .suggestions(query, self.config.suggestion_limit);
            self.state.write().begin_suggestions(token);
        }

        if let Some(host) = self.host.as_mut() {
            host.animate(now);
        }

        while let Ok(completion) = self.completions.try_recv() {
            self.apply_completion(completion);
        }

        self.sync();
    }

    /// Waits for the next request to finish and applies its result. Only returns once a
    /// request started earlier finishes.
    pub async fn process_next_completion(&mut self) {
        if let Some(completion) = self.completions.recv().await {
            self.apply_completion(completion);
            self.sync();
        }
    }

    /// Updates the search text. Suggestions are requested once the text is long enough and
    /// stayed unchanged for the debounce delay.
    pub fn set_search_text(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        if text.trim().chars().count() >= self.config.min_query_length {
            self.debouncer.schedule(text.trim().to_string(), now);
        } else {
            self.debouncer.cancel();
        }

        self.state.write().set_search_text(text);
    }

    /// Looks up the current search text right away and navigates to the best match.
    pub fn submit_search(&mut self) {
        self.debouncer.cancel();

        let query = self.state.read().search.text.trim().to_string();
        if query.is_empty() {
            return;
        }

        let token = self.dispatcher.search(query);
        self.state.write().begin_submit(token);
    }

    /// Navigates to the suggestion with the given index.
    pub fn choose_suggestion(&mut self, index: usize) -> Result<(), SkylineError> {
        let suggestion = self
            .state
            .read()
            .search
            .suggestions
            .get(index)
            .cloned()
            .ok_or_else(|| SkylineError::NotFound(format!("suggestion {index}")))?;

        self.navigate_to(suggestion);
        self.sync();
        Ok(())
    }

    fn navigate_to(&mut self, place: SearchSuggestion) {
        log::debug!("Navigating to '{}'", place.name);
        if let Some(host) = self.host.as_mut() {
            host.fly_to(place.position(), place.zoom, None);
        }

        let mut state = self.state.write();
        state.navigated();
        state.search.text = place.name;
    }

    /// Requests a route from the current map center to `destination`.
    pub fn request_route(&mut self, destination: GeoPoint) {
        let start = self.state.read().center();
        let token = self.dispatcher.route(start, destination);
        self.state.write().begin_route(token, start, destination);
        self.sync();
    }

    /// Requests a route from the current map center to the selected building.
    pub fn route_to_selection(&mut self) -> Result<(), SkylineError> {
        let destination = self
            .state
            .read()
            .selected_feature()
            .map(|feature| feature.center)
            .ok_or_else(|| SkylineError::Generic("no building is selected".into()))?;

        self.request_route(destination);
        Ok(())
    }

    /// Changes the active building category.
    pub fn set_category(&mut self, category: Category) {
        self.state.write().set_category(category);
        self.sync();
    }

    /// Removes all collected coordinates.
    pub fn clear_collected(&mut self) {
        self.state.write().clear_collected();
        self.sync();
    }

    /// Collected coordinates as a GeoJSON collection of points.
    pub fn export_collected_geojson(&self) -> FeatureCollection {
        self.state.read().collected_geojson()
    }

    /// Collected coordinates as `lng,lat` lines.
    pub fn export_collected_text(&self) -> String {
        self.state.read().collected_text()
    }

    /// Closes the reverse geocode or feature panel.
    pub fn close_overlay(&mut self) {
        self.state.write().clear_overlay();
        self.sync();
    }

    /// Closes the image viewer. The building stays selected.
    pub fn close_image_viewer(&mut self) {
        self.state.write().panels.image_viewer_open = false;
    }

    /// Closes the collected coordinates panel.
    pub fn close_collection_panel(&mut self) {
        self.state.write().panels.collection_panel_open = false;
    }

    /// Hides the error message.
    pub fn dismiss_error(&mut self) {
        self.state.write().dismiss_error();
    }

    fn apply_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Suggestions { token, suggestions } => {
                if !self.state.write().complete_suggestions(token, suggestions) {
                    log::debug!("Dropping stale suggestions {token:?}");
                }
            }
            Completion::Searched { token, result } => {
                let place = self.state.write().complete_submit(token, result);
                if let Some(place) = place {
                    self.navigate_to(place);
                }
            }
            Completion::ReverseGeocoded { token, result } => {
                if !self.state.write().complete_reverse_geocode(token, result) {
                    log::debug!("Dropping stale reverse geocode result {token:?}");
                }
            }
            Completion::Routed { token, result } => {
                let outcome = self.state.write().complete_route(token, result);
                match outcome {
                    RouteOutcome::Applied(start) => {
                        if let Some(host) = self.host.as_mut() {
                            host.fly_to(start, self.config.route_zoom, None);
                        }
                    }
                    RouteOutcome::Failed => {}
                    RouteOutcome::Stale => log::debug!("Dropping stale route {token:?}"),
                }
            }
            Completion::IconLoaded { token, result } => {
                if self.icon_request != Some(token) {
                    log::debug!("Dropping marker icon of a previous mount");
                    return;
                }

                self.icon_request = None;
                match (result, self.host.as_mut()) {
                    (Ok(icon), Some(host)) => {
                        if let Err(error) = setup::add_marker_layer(host, icon) {
                            log::warn!("Failed to add the marker layer: {error}");
                        }
                    }
                    (Ok(_), None) => {}
                    (Err(error), _) => {
                        log::warn!("Failed to load the marker icon, markers are hidden: {error}");
                    }
                }
            }
        }
    }

    fn sync(&mut self) {
        let Some(host) = self.host.as_mut() else {
            return;
        };

        for event in host.drain_events() {
            match event {
                HostEvent::Moved(center) => self.state.write().set_center(center),
            }
        }

        let scene = Scene::from_state(&self.state.read(), &self.config);
        scene.apply(host);
    }
}

impl Drop for MapViewer {
    fn drop(&mut self) {
        self.unmount();
    }
}
