//! Viewer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use skyline_types::GeoPoint;

use crate::color::Color;
use crate::error::SkylineError;

/// Settings of a [`MapViewer`](crate::MapViewer).
///
/// Every field has a default, so a JSON document only needs to name the values it changes:
///
/// ```
/// use skyline::ViewerConfig;
///
/// let config = ViewerConfig::from_json(r#"{"routing_url": "https://example.com/api/route"}"#)?;
/// assert_eq!(config.collected_capacity, 155);
/// # Ok::<(), skyline::error::SkylineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Base url of the Nominatim compatible geocoding API.
    pub geocoder_url: String,
    /// Url of the routing endpoint of the application backend.
    pub routing_url: String,
    /// Url of the building marker icon. Without an icon the marker layer is not shown.
    pub marker_icon_url: Option<String>,
    /// Maximum number of search suggestions requested while typing.
    pub suggestion_limit: usize,
    /// Minimum number of characters before suggestions are requested.
    pub min_query_length: usize,
    /// Quiet period after the last keystroke before suggestions are requested, in milliseconds.
    pub debounce_ms: u64,
    /// Number of pointer presses kept in the click log.
    pub click_log_capacity: usize,
    /// Maximum number of collected coordinates.
    pub collected_capacity: usize,
    /// Camera center when the map is mounted.
    pub initial_center: GeoPoint,
    /// Camera zoom when the map is mounted.
    pub initial_zoom: f64,
    /// Camera pitch in degrees when the map is mounted.
    pub initial_pitch: f64,
    /// Zoom used when flying to a selected building.
    pub selection_zoom: f64,
    /// Pitch used when flying to a selected building.
    pub selection_pitch: f64,
    /// Zoom used when the camera recenters after a route was received.
    pub route_zoom: f64,
    /// Distance in pixels within which a click hits a marker.
    pub marker_hit_tolerance: f64,
    /// Building fill when no category is active.
    pub building_color: Color,
    /// Building fill when a category is active.
    pub highlight_color: Color,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            geocoder_url: "https://nominatim.openstreetmap.org".into(),
            routing_url: "http://localhost:5000/api/route".into(),
            marker_icon_url: Some("http://localhost:5000/static/marker.png".into()),
            suggestion_limit: 5,
            min_query_length: 3,
            debounce_ms: 300,
            click_log_capacity: 1,
            collected_capacity: 155,
            initial_center: GeoPoint::new(83.2185, 17.6868),
            initial_zoom: 15.0,
            initial_pitch: 45.0,
            selection_zoom: 18.0,
            selection_pitch: 60.0,
            route_zoom: 16.0,
            marker_hit_tolerance: 16.0,
            building_color: Color::BUILDING,
            highlight_color: Color::HIGHLIGHT,
        }
    }
}

impl ViewerConfig {
    /// Parses a configuration from a JSON document. Missing fields take default values.
    pub fn from_json(json: &str) -> Result<Self, SkylineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Debounce delay of the search suggestions.
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Sets the geocoding API base url.
    pub fn with_geocoder_url(mut self, url: impl Into<String>) -> Self {
        self.geocoder_url = url.into();
        self
    }

    /// Sets the routing endpoint url.
    pub fn with_routing_url(mut self, url: impl Into<String>) -> Self {
        self.routing_url = url.into();
        self
    }

    /// Sets or removes the marker icon url.
    pub fn with_marker_icon_url(mut self, url: Option<String>) -> Self {
        self.marker_icon_url = url;
        self
    }

    /// Sets the initial camera position.
    pub fn with_initial_view(mut self, center: GeoPoint, zoom: f64) -> Self {
        self.initial_center = center;
        self.initial_zoom = zoom;
        self
    }

    /// Sets the debounce delay of search suggestions.
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }
}
