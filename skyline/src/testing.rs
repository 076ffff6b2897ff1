//! In-memory collaborators for tests.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use geojson::{Geometry, Value};
use parking_lot::Mutex;
use skyline_types::GeoPoint;

use crate::decoded_image::DecodedImage;
use crate::error::SkylineError;
use crate::platform::PlatformService;
use crate::services::{
    AddressRecord, Geocoder, PlaceRecord, ReverseRecord, RouteRequest, Router, Services,
};

/// Two buildings: a large square `kgh` with a photo and a point building `lib` inside it.
pub(crate) const DATASET: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature",
     "properties": {"name": "King George Hospital", "id": "kgh", "category": "Healthcare",
                    "imageURL": "https://img.example.com/kgh.jpg", "height": 30},
     "geometry": {"type": "Polygon", "coordinates": [[
        [83.0, 17.0], [83.2, 17.0], [83.2, 17.2], [83.0, 17.2], [83.0, 17.0]]]}},
    {"type": "Feature",
     "properties": {"name": "Library", "id": "lib", "category": "Educational"},
     "geometry": {"type": "Point", "coordinates": [83.15, 17.1]}}
]}"#;

#[derive(Default)]
pub(crate) struct FakeGeocoder {
    pub places: Vec<PlaceRecord>,
    pub postcode: Option<String>,
    pub fail: bool,
    pub queries: Mutex<Vec<(String, usize)>>,
    pub reversed: Mutex<Vec<GeoPoint>>,
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn search_places(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PlaceRecord>, SkylineError> {
        self.queries.lock().push((query.to_string(), limit));
        if self.fail {
            return Err(SkylineError::IO);
        }

        Ok(self.places.iter().take(limit).cloned().collect())
    }

    async fn reverse(&self, point: &GeoPoint) -> Result<ReverseRecord, SkylineError> {
        self.reversed.lock().push(*point);
        if self.fail {
            return Err(SkylineError::IO);
        }

        Ok(ReverseRecord {
            display_name: self
                .postcode
                .as_ref()
                .map(|code| format!("Beach Road, {code}")),
            address: self.postcode.as_ref().map(|code| AddressRecord {
                postcode: Some(code.clone()),
            }),
        })
    }
}

#[derive(Default)]
pub(crate) struct FakeRouter {
    pub fail: bool,
    pub requests: Mutex<Vec<RouteRequest>>,
}

#[async_trait]
impl Router for FakeRouter {
    async fn route(&self, request: RouteRequest) -> Result<Geometry, SkylineError> {
        self.requests.lock().push(request);
        if self.fail {
            return Err(SkylineError::Status(500));
        }

        Ok(Geometry::new(Value::LineString(vec![
            vec![request.start_lng, request.start_lat],
            vec![request.end_lng, request.end_lat],
        ])))
    }
}

#[derive(Default)]
pub(crate) struct FakePlatform {
    pub fail: bool,
}

#[async_trait]
impl PlatformService for FakePlatform {
    async fn load_bytes_from_url(&self, _url: &str) -> Result<Bytes, SkylineError> {
        Err(SkylineError::NotFound("no network in tests".into()))
    }

    async fn post_json(
        &self,
        _url: &str,
        _body: &serde_json::Value,
    ) -> Result<Bytes, SkylineError> {
        Err(SkylineError::NotFound("no network in tests".into()))
    }

    async fn load_image_url(&self, _url: &str) -> Result<DecodedImage, SkylineError> {
        if self.fail {
            return Err(SkylineError::Status(404));
        }

        DecodedImage::from_raw(vec![255; 16], 2, 2)
    }
}

/// Fakes behind a [`Services`] bundle, kept accessible for assertions.
#[derive(Default)]
pub(crate) struct FakeBackend {
    pub geocoder: Arc<FakeGeocoder>,
    pub router: Arc<FakeRouter>,
    pub platform: Arc<FakePlatform>,
}

impl FakeBackend {
    pub fn services(&self) -> Services {
        Services::new(
            self.geocoder.clone(),
            self.router.clone(),
            self.platform.clone(),
        )
    }
}

pub(crate) fn fake_services() -> Services {
    FakeBackend::default().services()
}

pub(crate) fn place(name: &str, lng: &str, lat: &str, place_type: &str) -> PlaceRecord {
    PlaceRecord {
        display_name: name.into(),
        lon: lng.into(),
        lat: lat.into(),
        place_type: place_type.into(),
    }
}
