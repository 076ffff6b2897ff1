//! External collaborators of the viewer: geocoding, routing and resource loading.

use std::sync::Arc;

use crate::config::ViewerConfig;
use crate::platform::PlatformService;

mod geocoding;
mod routing;

pub use geocoding::{
    zoom_for_place_type, AddressRecord, Geocoder, GeocodingClient, NominatimGeocoder,
    PlaceRecord, ReverseGeocodeResult, ReverseRecord, SearchSuggestion, ADDRESS_ERROR,
    NO_ADDRESS, NO_PINCODE, PINCODE_ERROR,
};
pub use routing::{parse_route, HttpRouter, RouteRequest, Router, SharedRouter};

/// Everything the viewer talks to over the network.
#[derive(Clone)]
pub struct Services {
    /// Forward and reverse geocoding.
    pub geocoding: GeocodingClient,
    /// Routing endpoint.
    pub router: SharedRouter,
    /// Raw HTTP access, used to load the marker icon.
    pub platform: Arc<dyn PlatformService>,
}

impl Services {
    /// Creates services from their parts.
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        router: SharedRouter,
        platform: Arc<dyn PlatformService>,
    ) -> Self {
        Self {
            geocoding: GeocodingClient::new(geocoder),
            router,
            platform,
        }
    }

    /// Creates HTTP services configured by `config`, all sharing the given platform service.
    pub fn from_config(config: &ViewerConfig, platform: Arc<dyn PlatformService>) -> Self {
        Self::new(
            Arc::new(NominatimGeocoder::new(
                platform.clone(),
                config.geocoder_url.clone(),
            )),
            Arc::new(HttpRouter::new(platform.clone(), config.routing_url.clone())),
            platform,
        )
    }
}
