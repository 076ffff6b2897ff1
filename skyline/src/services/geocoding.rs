//! Forward and reverse geocoding against a Nominatim compatible service.

use std::sync::Arc;

use async_trait::async_trait;
use maybe_sync::{MaybeSend, MaybeSync};
use serde::{Deserialize, Serialize};
use skyline_types::GeoPoint;

use crate::error::SkylineError;
use crate::platform::PlatformService;

/// Pincode shown when the service knows no address for the point.
pub const NO_PINCODE: &str = "N/A";
/// Address shown when the service knows no address for the point.
pub const NO_ADDRESS: &str = "No Address Data Found";
/// Pincode shown when the service could not be reached.
pub const PINCODE_ERROR: &str = "Error";
/// Address shown when the service could not be reached.
pub const ADDRESS_ERROR: &str = "Error fetching address";

/// Place returned by a forward search, as sent by the service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaceRecord {
    /// Human readable name.
    pub display_name: String,
    /// Longitude as a decimal string.
    pub lon: String,
    /// Latitude as a decimal string.
    pub lat: String,
    /// Place type, e.g. `city` or `road`.
    #[serde(rename = "type", default)]
    pub place_type: String,
}

/// Address part of a reverse lookup response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AddressRecord {
    /// Postal code.
    #[serde(default)]
    pub postcode: Option<String>,
}

/// Reverse lookup response, as sent by the service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReverseRecord {
    /// Full address.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Missing when the service has no address for the point.
    #[serde(default)]
    pub address: Option<AddressRecord>,
}

/// Entry of the search suggestion list.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSuggestion {
    /// Display name.
    pub name: String,
    /// Longitude.
    pub lng: f64,
    /// Latitude.
    pub lat: f64,
    /// Zoom level fitting the place type.
    pub zoom: f64,
}

impl SearchSuggestion {
    /// Location of the place.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lng, self.lat)
    }
}

impl TryFrom<PlaceRecord> for SearchSuggestion {
    type Error = SkylineError;

    fn try_from(record: PlaceRecord) -> Result<Self, Self::Error> {
        let lng = parse_coordinate(&record.lon)?;
        let lat = parse_coordinate(&record.lat)?;
        Ok(Self {
            zoom: zoom_for_place_type(&record.place_type),
            name: record.display_name,
            lng,
            lat,
        })
    }
}

fn parse_coordinate(value: &str) -> Result<f64, SkylineError> {
    value
        .trim()
        .parse()
        .map_err(|_| SkylineError::Decoding(format!("invalid coordinate: {value}")))
}

/// Zoom level to show a place of the given type.
pub fn zoom_for_place_type(place_type: &str) -> f64 {
    match place_type {
        "country" => 5.0,
        "state" => 7.0,
        "city" => 12.0,
        "town" | "village" => 14.0,
        "suburb" | "neighbourhood" => 15.0,
        "road" | "building" | "house" => 17.0,
        _ => 14.0,
    }
}

/// Address of a clicked point, ready to be shown. Coordinates are formatted with six decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseGeocodeResult {
    /// Postal code or a sentinel.
    pub pincode: String,
    /// Latitude of the clicked point.
    pub latitude: String,
    /// Longitude of the clicked point.
    pub longitude: String,
    /// Address or a sentinel.
    pub full_address: String,
}

impl ReverseGeocodeResult {
    fn new(point: &GeoPoint, pincode: &str, full_address: &str) -> Self {
        Self {
            pincode: pincode.to_string(),
            latitude: format!("{:.6}", point.lat),
            longitude: format!("{:.6}", point.lng),
            full_address: full_address.to_string(),
        }
    }

    /// Converts a service response for the given point.
    pub fn from_record(point: &GeoPoint, record: ReverseRecord) -> Self {
        match record.address {
            None => Self::new(point, NO_PINCODE, NO_ADDRESS),
            Some(address) => Self::new(
                point,
                address.postcode.as_deref().unwrap_or(NO_PINCODE),
                record.display_name.as_deref().unwrap_or(NO_ADDRESS),
            ),
        }
    }

    /// Result shown when the lookup failed.
    pub fn error(point: &GeoPoint) -> Self {
        Self::new(point, PINCODE_ERROR, ADDRESS_ERROR)
    }
}

/// Wire level access to a geocoding service.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Geocoder: MaybeSend + MaybeSync {
    /// Finds at most `limit` places matching `query`.
    async fn search_places(&self, query: &str, limit: usize)
        -> Result<Vec<PlaceRecord>, SkylineError>;

    /// Looks up the address at `point`.
    async fn reverse(&self, point: &GeoPoint) -> Result<ReverseRecord, SkylineError>;
}

/// [`Geocoder`] talking to a Nominatim API over the platform HTTP client.
pub struct NominatimGeocoder<P: PlatformService> {
    platform_service: P,
    base_url: String,
}

impl<P: PlatformService> NominatimGeocoder<P> {
    /// Creates a new geocoder. `base_url` is the service root, without the trailing slash.
    pub fn new(platform_service: P, base_url: impl Into<String>) -> Self {
        Self {
            platform_service,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, query: &str, limit: usize) -> String {
        format!(
            "{}/search?format=json&q={}&limit={limit}",
            self.base_url,
            encode_query_component(query)
        )
    }

    fn reverse_url(&self, point: &GeoPoint) -> String {
        format!(
            "{}/reverse?format=json&lat={}&lon={}",
            self.base_url, point.lat, point.lng
        )
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<P: PlatformService> Geocoder for NominatimGeocoder<P> {
    async fn search_places(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PlaceRecord>, SkylineError> {
        let url = self.search_url(query, limit);
        log::debug!("Searching places: {url}");

        let bytes = self.platform_service.load_bytes_from_url(&url).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn reverse(&self, point: &GeoPoint) -> Result<ReverseRecord, SkylineError> {
        let url = self.reverse_url(point);
        log::debug!("Reverse geocoding: {url}");

        let bytes = self.platform_service.load_bytes_from_url(&url).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encodes a URL query component, leaving only unreserved characters as is.
fn encode_query_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => {
                encoded.push('%');
                encoded.push(HEX_DIGITS[usize::from(byte >> 4)] as char);
                encoded.push(HEX_DIGITS[usize::from(byte & 0x0F)] as char);
            }
        }
    }

    encoded
}

/// Geocoding operations as the viewer uses them: failures never leave this type, they become
/// empty lists or sentinel values.
#[derive(Clone)]
pub struct GeocodingClient {
    geocoder: Arc<dyn Geocoder>,
}

impl GeocodingClient {
    /// Creates a new client.
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    /// Places matching `query`. Empty if the request fails.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<SearchSuggestion> {
        match self.try_search(query, limit).await {
            Ok(suggestions) => suggestions,
            Err(error) => {
                log::warn!("Place search for '{query}' failed: {error}");
                vec![]
            }
        }
    }

    /// Places matching `query`. Records with unparsable coordinates are skipped.
    pub async fn try_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchSuggestion>, SkylineError> {
        let records = self.geocoder.search_places(query, limit).await?;
        Ok(records
            .into_iter()
            .filter_map(|record| match SearchSuggestion::try_from(record) {
                Ok(suggestion) => Some(suggestion),
                Err(error) => {
                    log::warn!("Skipping search result: {error}");
                    None
                }
            })
            .collect())
    }

    /// The best match for `query`, if any.
    pub async fn lookup(&self, query: &str) -> Result<Option<SearchSuggestion>, SkylineError> {
        Ok(self.try_search(query, 1).await?.into_iter().next())
    }

    /// Address at `point`, or sentinel values if it is unknown or the request fails.
    pub async fn reverse(&self, point: GeoPoint) -> ReverseGeocodeResult {
        match self.geocoder.reverse(&point).await {
            Ok(record) => ReverseGeocodeResult::from_record(&point, record),
            Err(error) => {
                log::warn!("Reverse geocoding of {point:?} failed: {error}");
                ReverseGeocodeResult::error(&point)
            }
        }
    }
}
