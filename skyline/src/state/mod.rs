//! Interaction state: everything the user did or asked for since the viewer was mounted.
//!
//! Facts that cannot be true at the same time share one enum. A reverse geocode result and a
//! selected feature are both an [`Overlay`], so entering one of them replaces the other.

use geojson::{Feature, FeatureCollection, Geometry};
use skyline_types::{BoundingRect, GeoPoint};

use crate::buildings::BuildingProperties;
use crate::category::Category;
use crate::config::ViewerConfig;
use crate::control::MouseButton;
use crate::error::SkylineError;
use crate::services::{ReverseGeocodeResult, SearchSuggestion};

mod buffer;
mod token;

pub use buffer::{CappedBuffer, RingBuffer};
pub use token::{RequestToken, TokenSource};

/// Message shown when the routing service fails.
pub const ROUTE_ERROR: &str = "Failed to fetch route. Please try again.";
/// Message shown when a submitted search finds nothing.
pub const LOCATION_NOT_FOUND: &str = "Location not found";
/// Message shown when a submitted search fails.
pub const SEARCH_ERROR: &str = "Error searching location. Please try again.";

/// A pointer press recorded in the click log.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoggedClick {
    /// Map position of the press.
    pub point: GeoPoint,
    /// Pressed button.
    pub button: MouseButton,
}

/// Building or marker the user is inspecting.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFeature {
    /// Display name.
    pub name: String,
    /// Identifier from the dataset.
    pub id: String,
    /// Photo of the building.
    pub image_url: Option<String>,
    /// Category name.
    pub category: Option<String>,
    /// Representative point: polygon centroid or the marker location.
    pub center: GeoPoint,
    /// Extent of the feature, used for the selection box.
    pub extent: BoundingRect,
}

impl SelectedFeature {
    /// Creates a selection from feature properties and its representative point.
    pub fn new(properties: BuildingProperties, center: GeoPoint, extent: BoundingRect) -> Self {
        Self {
            name: properties.name,
            id: properties.id,
            image_url: properties.image_url,
            category: properties.category,
            center,
            extent,
        }
    }
}

/// State of a reverse geocode request.
#[derive(Debug, Clone, PartialEq)]
pub enum ReverseGeocode {
    /// The request is in flight.
    Pending {
        /// Token of the request.
        token: RequestToken,
        /// Clicked point.
        point: GeoPoint,
    },
    /// The address is known.
    Resolved(ReverseGeocodeResult),
}

/// The panel the user is looking at. At most one of them exists.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Overlay {
    /// Nothing is inspected.
    #[default]
    None,
    /// Address of a clicked point.
    ReverseGeocode(ReverseGeocode),
    /// A building or a marker.
    Feature(SelectedFeature),
}

/// Role of a route endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RoutePointKind {
    /// Map center at the moment of the request.
    Start,
    /// Selected building.
    End,
}

/// Endpoint of a route.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RoutePoint {
    /// Start or end.
    pub kind: RoutePointKind,
    /// Location.
    pub point: GeoPoint,
}

/// Route between the map center and a selected building.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RouteState {
    /// No route.
    #[default]
    None,
    /// Waiting for the routing service.
    Pending {
        /// Token of the request.
        token: RequestToken,
        /// Start point.
        start: GeoPoint,
        /// End point.
        end: GeoPoint,
    },
    /// Route line received.
    Ready {
        /// Start point.
        start: GeoPoint,
        /// End point.
        end: GeoPoint,
        /// Line geometry as returned by the service.
        line: Geometry,
    },
}

impl RouteState {
    /// Endpoints of the route, start first. Empty when there is no route.
    pub fn points(&self) -> Vec<RoutePoint> {
        match self {
            RouteState::None => vec![],
            RouteState::Pending { start, end, .. } | RouteState::Ready { start, end, .. } => vec![
                RoutePoint {
                    kind: RoutePointKind::Start,
                    point: *start,
                },
                RoutePoint {
                    kind: RoutePointKind::End,
                    point: *end,
                },
            ],
        }
    }

    /// Route line, if received.
    pub fn line(&self) -> Option<&Geometry> {
        match self {
            RouteState::Ready { line, .. } => Some(line),
            _ => None,
        }
    }
}

/// Result of applying a routing response.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// The route is shown; the camera should recenter on the start point.
    Applied(GeoPoint),
    /// The request failed and the error message is set.
    Failed,
    /// The response belongs to an outdated request and was dropped.
    Stale,
}

/// Search box state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    /// Current text of the search box.
    pub text: String,
    /// Suggestions for the text, replaced wholesale on every response.
    pub suggestions: Vec<SearchSuggestion>,
    pending_suggestions: Option<RequestToken>,
    pending_submit: Option<RequestToken>,
}

impl SearchState {
    /// Returns true if a submitted search waits for the response.
    pub fn is_submitting(&self) -> bool {
        self.pending_submit.is_some()
    }
}

/// Visibility of the side panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Panels {
    /// Photo of the selected building.
    pub image_viewer_open: bool,
    /// List of collected coordinates.
    pub collection_panel_open: bool,
}

/// Transient state of the viewer.
#[derive(Debug, Clone)]
pub struct InteractionState {
    center: GeoPoint,
    /// Search box.
    pub search: SearchState,
    overlay: Overlay,
    route: RouteState,
    clicks: RingBuffer<LoggedClick>,
    collected: CappedBuffer<GeoPoint>,
    category: Category,
    /// Panel visibility.
    pub panels: Panels,
    error: Option<String>,
}

impl InteractionState {
    /// Creates the initial state.
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            center: config.initial_center,
            search: SearchState::default(),
            overlay: Overlay::None,
            route: RouteState::None,
            clicks: RingBuffer::new(config.click_log_capacity),
            collected: CappedBuffer::new(config.collected_capacity),
            category: Category::All,
            panels: Panels::default(),
            error: None,
        }
    }

    /// Most recent center of the viewport.
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Records a new viewport center.
    pub fn set_center(&mut self, center: GeoPoint) {
        self.center = center;
    }

    /// Current overlay.
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Selected feature, if the overlay shows one.
    pub fn selected_feature(&self) -> Option<&SelectedFeature> {
        match &self.overlay {
            Overlay::Feature(feature) => Some(feature),
            _ => None,
        }
    }

    /// Resolved reverse geocode result, if the overlay shows one.
    pub fn reverse_geocode_result(&self) -> Option<&ReverseGeocodeResult> {
        match &self.overlay {
            Overlay::ReverseGeocode(ReverseGeocode::Resolved(result)) => Some(result),
            _ => None,
        }
    }

    /// Returns true while a reverse geocode request is in flight.
    pub fn is_reverse_geocoding(&self) -> bool {
        matches!(
            self.overlay,
            Overlay::ReverseGeocode(ReverseGeocode::Pending { .. })
        )
    }

    /// Closes the overlay.
    pub fn clear_overlay(&mut self) {
        self.overlay = Overlay::None;
        self.panels.image_viewer_open = false;
    }

    /// Starts a reverse geocode of `point`: drops the route and the selection.
    pub fn begin_reverse_geocode(&mut self, token: RequestToken, point: GeoPoint) {
        self.clear_route();
        self.panels.image_viewer_open = false;
        self.overlay = Overlay::ReverseGeocode(ReverseGeocode::Pending { token, point });
    }

    /// Stores the reverse geocode result if it answers the request the state waits for.
    /// Returns false for stale responses.
    pub fn complete_reverse_geocode(
        &mut self,
        token: RequestToken,
        result: ReverseGeocodeResult,
    ) -> bool {
        match &self.overlay {
            Overlay::ReverseGeocode(ReverseGeocode::Pending { token: pending, .. })
                if *pending == token =>
            {
                self.overlay = Overlay::ReverseGeocode(ReverseGeocode::Resolved(result));
                true
            }
            _ => false,
        }
    }

    /// Selects a feature. Replaces any reverse geocode panel and drops the current route.
    pub fn select_feature(&mut self, feature: SelectedFeature) {
        self.clear_route();
        self.panels.image_viewer_open = feature.image_url.is_some();
        self.overlay = Overlay::Feature(feature);
    }

    /// Current route.
    pub fn route(&self) -> &RouteState {
        &self.route
    }

    /// Starts a route request.
    pub fn begin_route(&mut self, token: RequestToken, start: GeoPoint, end: GeoPoint) {
        self.error = None;
        self.route = RouteState::Pending { token, start, end };
    }

    /// Applies a routing response.
    pub fn complete_route(
        &mut self,
        token: RequestToken,
        result: Result<Geometry, SkylineError>,
    ) -> RouteOutcome {
        let (start, end) = match &self.route {
            RouteState::Pending {
                token: pending,
                start,
                end,
            } if *pending == token => (*start, *end),
            _ => return RouteOutcome::Stale,
        };

        match result {
            Ok(line) => {
                self.route = RouteState::Ready { start, end, line };
                RouteOutcome::Applied(start)
            }
            Err(error) => {
                log::warn!("Route request failed: {error}");
                self.route = RouteState::None;
                self.error = Some(ROUTE_ERROR.to_string());
                RouteOutcome::Failed
            }
        }
    }

    /// Drops the route and its endpoints.
    pub fn clear_route(&mut self) {
        self.route = RouteState::None;
    }

    /// Click log, oldest first.
    pub fn clicks(&self) -> &RingBuffer<LoggedClick> {
        &self.clicks
    }

    /// Records a pointer press.
    pub fn log_click(&mut self, click: LoggedClick) {
        self.clicks.push(click);
    }

    /// Collected coordinates in collection order.
    pub fn collected(&self) -> &CappedBuffer<GeoPoint> {
        &self.collected
    }

    /// Appends a coordinate to the collection and opens the collection panel. Returns false if
    /// the collection is full; the state does not change then.
    pub fn collect(&mut self, point: GeoPoint) -> bool {
        if !self.collected.push(point) {
            log::debug!("Coordinate collection is full, dropping {point:?}");
            return false;
        }

        self.panels.collection_panel_open = true;
        true
    }

    /// Removes all collected coordinates.
    pub fn clear_collected(&mut self) {
        self.collected.clear();
    }

    /// Collected coordinates as a GeoJSON collection of points.
    pub fn collected_geojson(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self
                .collected
                .iter()
                .map(|p| point_feature(*p, None))
                .collect(),
            foreign_members: None,
        }
    }

    /// Collected coordinates as `lng,lat` lines with six decimals.
    pub fn collected_text(&self) -> String {
        self.collected
            .iter()
            .map(|p| format!("{:.6},{:.6}", p.lng, p.lat))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Active building category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Changes the active building category.
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    /// Visible error message.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Hides the error message.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Updates the search text. Suggestions for older text are dropped.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search.text = text.into();
        self.search.suggestions.clear();
        self.search.pending_suggestions = None;
    }

    /// Marks a suggestion request as in flight.
    pub fn begin_suggestions(&mut self, token: RequestToken) {
        self.search.pending_suggestions = Some(token);
    }

    /// Replaces the suggestions if the response answers the latest request.
    pub fn complete_suggestions(
        &mut self,
        token: RequestToken,
        suggestions: Vec<SearchSuggestion>,
    ) -> bool {
        if self.search.pending_suggestions != Some(token) {
            return false;
        }

        self.search.pending_suggestions = None;
        self.search.suggestions = suggestions;
        true
    }

    /// Drops the suggestions.
    pub fn clear_suggestions(&mut self) {
        self.search.suggestions.clear();
        self.search.pending_suggestions = None;
    }

    /// Marks a submitted search as in flight.
    pub fn begin_submit(&mut self, token: RequestToken) {
        self.error = None;
        self.search.pending_submit = Some(token);
    }

    /// Applies the response of a submitted search. Returns the place to navigate to.
    pub fn complete_submit(
        &mut self,
        token: RequestToken,
        result: Result<Option<SearchSuggestion>, SkylineError>,
    ) -> Option<SearchSuggestion> {
        if self.search.pending_submit != Some(token) {
            return None;
        }

        self.search.pending_submit = None;
        match result {
            Ok(Some(place)) => Some(place),
            Ok(None) => {
                self.error = Some(LOCATION_NOT_FOUND.to_string());
                None
            }
            Err(error) => {
                log::warn!("Search failed: {error}");
                self.error = Some(SEARCH_ERROR.to_string());
                None
            }
        }
    }

    /// Navigating to a place starts a new interaction: the suggestions and the overlay go away.
    pub fn navigated(&mut self) {
        self.clear_suggestions();
        self.clear_overlay();
    }
}

pub(crate) fn point_feature(point: GeoPoint, properties: Option<geojson::JsonObject>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(point.into())),
        id: None,
        properties,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geojson::Value;
    use skyline_types::lnglat;

    use super::*;

    fn state() -> InteractionState {
        InteractionState::new(&ViewerConfig::default())
    }

    fn feature(image: Option<&str>) -> SelectedFeature {
        let center = lnglat!(83.3, 17.7);
        SelectedFeature {
            name: "Tower".into(),
            id: "t".into(),
            image_url: image.map(str::to_string),
            category: Some("Commercial".into()),
            center,
            extent: BoundingRect::from_point(&center),
        }
    }

    fn resolved(pincode: &str) -> ReverseGeocodeResult {
        ReverseGeocodeResult {
            pincode: pincode.into(),
            latitude: "17.720000".into(),
            longitude: "83.230000".into(),
            full_address: "Somewhere".into(),
        }
    }

    fn line() -> Geometry {
        Geometry::new(Value::LineString(vec![vec![83.21, 17.72], vec![83.25, 17.74]]))
    }

    #[test]
    fn selection_replaces_reverse_geocode() {
        let tokens = TokenSource::default();
        let mut state = state();

        let token = tokens.next();
        state.begin_reverse_geocode(token, lnglat!(83.23, 17.72));
        assert!(state.complete_reverse_geocode(token, resolved("530001")));
        assert!(state.reverse_geocode_result().is_some());

        state.select_feature(feature(Some("https://img.example.com/t.jpg")));
        assert!(state.reverse_geocode_result().is_none());
        assert!(state.panels.image_viewer_open);

        state.begin_reverse_geocode(tokens.next(), lnglat!(83.23, 17.72));
        assert!(state.selected_feature().is_none());
        assert!(state.is_reverse_geocoding());
        assert!(!state.panels.image_viewer_open);
    }

    #[test]
    fn stale_reverse_geocode_is_dropped() {
        let tokens = TokenSource::default();
        let mut state = state();

        let first = tokens.next();
        state.begin_reverse_geocode(first, lnglat!(83.23, 17.72));
        let second = tokens.next();
        state.begin_reverse_geocode(second, lnglat!(83.24, 17.73));

        assert!(!state.complete_reverse_geocode(first, resolved("old")));
        assert!(state.is_reverse_geocoding());
        assert!(state.complete_reverse_geocode(second, resolved("new")));
        assert_eq!(
            state.reverse_geocode_result().map(|r| r.pincode.as_str()),
            Some("new")
        );

        state.select_feature(feature(None));
        assert!(!state.complete_reverse_geocode(second, resolved("late")));
        assert!(state.selected_feature().is_some());
    }

    #[test]
    fn reverse_geocode_clears_route() {
        let tokens = TokenSource::default();
        let mut state = state();

        let token = tokens.next();
        state.begin_route(token, lnglat!(83.21, 17.72), lnglat!(83.25, 17.74));
        assert_eq!(
            state.complete_route(token, Ok(line())),
            RouteOutcome::Applied(lnglat!(83.21, 17.72))
        );
        assert_eq!(state.route().points().len(), 2);

        state.begin_reverse_geocode(tokens.next(), lnglat!(83.0, 17.0));
        assert_eq!(state.route(), &RouteState::None);
        assert!(state.route().points().is_empty());
    }

    #[test]
    fn route_failure_sets_error() {
        let tokens = TokenSource::default();
        let mut state = state();

        let token = tokens.next();
        state.begin_route(token, lnglat!(83.21, 17.72), lnglat!(83.25, 17.74));
        assert_eq!(
            state.complete_route(token, Err(SkylineError::Status(502))),
            RouteOutcome::Failed
        );
        assert_eq!(state.error(), Some(ROUTE_ERROR));
        assert_eq!(state.route(), &RouteState::None);

        assert_eq!(state.complete_route(token, Ok(line())), RouteOutcome::Stale);
        state.dismiss_error();
        assert_eq!(state.error(), None);
    }

    #[test]
    fn click_log_keeps_latest() {
        let mut state = state();
        for i in 0..5 {
            state.log_click(LoggedClick {
                point: lnglat!(i as f64, 0.0),
                button: MouseButton::Left,
            });
        }

        assert_eq!(state.clicks().len(), 1);
        assert_eq!(
            state.clicks().latest().map(|c| c.point),
            Some(lnglat!(4.0, 0.0))
        );
    }

    #[test]
    fn collection_is_capped() {
        let mut state = state();
        for i in 0..155 {
            assert!(state.collect(lnglat!(83.0 + i as f64 * 0.001, 17.0)));
        }

        assert!(!state.collect(lnglat!(0.0, 0.0)));
        assert_eq!(state.collected().len(), 155);
        assert!(state.panels.collection_panel_open);

        state.clear_collected();
        assert!(state.collected().is_empty());
    }

    #[test]
    fn collected_exports() {
        let mut state = state();
        state.collect(lnglat!(83.23, 17.72));
        state.collect(lnglat!(83.2412345, 17.7));

        assert_eq!(state.collected_text(), "83.230000,17.720000\n83.241235,17.700000");
        let geojson = state.collected_geojson();
        assert_eq!(geojson.features.len(), 2);
        assert_matches!(
            geojson.features[0].geometry.as_ref().map(|g| &g.value),
            Some(Value::Point(p)) if p == &vec![83.23, 17.72]
        );
    }

    #[test]
    fn submit_outcomes() {
        let tokens = TokenSource::default();
        let mut state = state();

        let token = tokens.next();
        state.begin_submit(token);
        assert!(state.search.is_submitting());
        assert_eq!(state.complete_submit(token, Ok(None)), None);
        assert_eq!(state.error(), Some(LOCATION_NOT_FOUND));

        let token = tokens.next();
        state.begin_submit(token);
        assert_eq!(state.error(), None);
        assert_eq!(state.complete_submit(token, Err(SkylineError::IO)), None);
        assert_eq!(state.error(), Some(SEARCH_ERROR));
    }

    #[test]
    fn stale_suggestions_are_dropped() {
        let tokens = TokenSource::default();
        let mut state = state();
        let suggestion = SearchSuggestion {
            name: "Visakhapatnam".into(),
            lng: 83.3,
            lat: 17.68,
            zoom: 12.0,
        };

        state.set_search_text("Viz");
        let old = tokens.next();
        state.begin_suggestions(old);
        state.set_search_text("Vizag");
        assert!(!state.complete_suggestions(old, vec![suggestion.clone()]));

        let new = tokens.next();
        state.begin_suggestions(new);
        assert!(state.complete_suggestions(new, vec![suggestion]));
        assert_eq!(state.search.suggestions.len(), 1);

        state.navigated();
        assert!(state.search.suggestions.is_empty());
    }
}
