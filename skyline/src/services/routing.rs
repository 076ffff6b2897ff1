//! Client of the application routing endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use geojson::{GeoJson, Geometry};
use maybe_sync::{MaybeSend, MaybeSync};
use serde::{Deserialize, Serialize};
use skyline_types::geojson::is_line;
use skyline_types::GeoPoint;

use crate::error::SkylineError;
use crate::platform::PlatformService;

/// Body of a routing request.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    /// Longitude of the start point.
    pub start_lng: f64,
    /// Latitude of the start point.
    pub start_lat: f64,
    /// Longitude of the end point.
    pub end_lng: f64,
    /// Latitude of the end point.
    pub end_lat: f64,
}

impl RouteRequest {
    /// Creates a request from `start` to `end`.
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        Self {
            start_lng: start.lng,
            start_lat: start.lat,
            end_lng: end.lng,
            end_lat: end.lat,
        }
    }
}

/// Computes routes between two points.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Router: MaybeSend + MaybeSync {
    /// Returns the line geometry of the route.
    async fn route(&self, request: RouteRequest) -> Result<Geometry, SkylineError>;
}

/// [`Router`] posting requests to an HTTP endpoint.
pub struct HttpRouter<P: PlatformService> {
    platform_service: P,
    url: String,
}

impl<P: PlatformService> HttpRouter<P> {
    /// Creates a new router for the endpoint at `url`.
    pub fn new(platform_service: P, url: impl Into<String>) -> Self {
        Self {
            platform_service,
            url: url.into(),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<P: PlatformService> Router for HttpRouter<P> {
    async fn route(&self, request: RouteRequest) -> Result<Geometry, SkylineError> {
        log::debug!("Requesting route {request:?} from {}", self.url);

        let body = serde_json::to_value(request)?;
        let bytes = self.platform_service.post_json(&self.url, &body).await?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|err| SkylineError::Decoding(format!("route response is not utf-8: {err}")))?;

        parse_route(text)
    }
}

/// Extracts the route line from a GeoJSON document. The document can be a bare geometry, a
/// feature or a feature collection, in which case the first feature is used.
pub fn parse_route(text: &str) -> Result<Geometry, SkylineError> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|err| SkylineError::Decoding(format!("invalid route response: {err}")))?;

    let geometry = match geojson {
        GeoJson::Geometry(geometry) => Some(geometry),
        GeoJson::Feature(feature) => feature.geometry,
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .next()
            .and_then(|feature| feature.geometry),
    };

    match geometry {
        Some(geometry) if is_line(&geometry) => Ok(geometry),
        Some(_) => Err(SkylineError::Decoding(
            "route geometry is not a line".to_string(),
        )),
        None => Err(SkylineError::Decoding(
            "route response has no geometry".to_string(),
        )),
    }
}

/// Shared handle to a router.
pub type SharedRouter = Arc<dyn Router>;

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bytes::Bytes;
    use geojson::Value;
    use parking_lot::Mutex;
    use skyline_types::lnglat;

    use super::*;

    #[derive(Default)]
    struct RecordingPlatform {
        posted: Mutex<Vec<(String, serde_json::Value)>>,
        response: String,
    }

    #[async_trait]
    impl PlatformService for RecordingPlatform {
        async fn load_bytes_from_url(&self, _url: &str) -> Result<Bytes, SkylineError> {
            Err(SkylineError::IO)
        }

        async fn post_json(
            &self,
            url: &str,
            body: &serde_json::Value,
        ) -> Result<Bytes, SkylineError> {
            self.posted.lock().push((url.to_string(), body.clone()));
            Ok(Bytes::copy_from_slice(self.response.as_bytes()))
        }
    }

    #[test]
    fn request_body() {
        let platform = Arc::new(RecordingPlatform {
            response: r#"{"type": "LineString", "coordinates": [[83.21, 17.72], [83.25, 17.74]]}"#
                .into(),
            ..Default::default()
        });
        let router = HttpRouter::new(platform.clone(), "http://localhost:5000/api/route");

        let request = RouteRequest::new(lnglat!(83.21, 17.72), lnglat!(83.25, 17.74));
        let line = tokio_test::block_on(router.route(request)).expect("route failed");

        assert_matches!(line.value, Value::LineString(ref points) if points.len() == 2);
        let posted = platform.posted.lock();
        assert_eq!(posted[0].0, "http://localhost:5000/api/route");
        assert_eq!(
            posted[0].1,
            serde_json::json!({
                "startLng": 83.21,
                "startLat": 17.72,
                "endLng": 83.25,
                "endLat": 17.74,
            })
        );
    }

    #[test]
    fn route_from_feature_collection() {
        let line = parse_route(
            r#"{"type": "FeatureCollection", "features": [{"type": "Feature", "properties": {},
                "geometry": {"type": "MultiLineString", "coordinates": [[[0, 0], [1, 1]]]}}]}"#,
        )
        .expect("no route");

        assert_matches!(line.value, Value::MultiLineString(_));
    }

    #[test]
    fn non_line_response_is_error() {
        assert_matches!(
            parse_route(r#"{"type": "Point", "coordinates": [0, 0]}"#),
            Err(SkylineError::Decoding(_))
        );
        assert_matches!(
            parse_route(r#"{"type": "FeatureCollection", "features": []}"#),
            Err(SkylineError::Decoding(_))
        );
        assert_matches!(parse_route("not json"), Err(SkylineError::Decoding(_)));
    }
}
