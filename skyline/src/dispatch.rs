//! Fire-and-forget execution of network requests. Every request gets a [`RequestToken`] and
//! its result comes back as a [`Completion`] through a channel drained by the viewer.

use std::sync::Arc;

use geojson::Geometry;
use skyline_types::GeoPoint;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::async_runtime;
use crate::decoded_image::DecodedImage;
use crate::error::SkylineError;
use crate::platform::PlatformService;
use crate::services::{ReverseGeocodeResult, RouteRequest, SearchSuggestion, Services};
use crate::state::{RequestToken, TokenSource};

/// Result of a finished request.
#[derive(Debug)]
pub enum Completion {
    /// Suggestions for the search text.
    Suggestions {
        /// Request token.
        token: RequestToken,
        /// Found places. Empty if the request failed.
        suggestions: Vec<SearchSuggestion>,
    },
    /// Result of a submitted search.
    Searched {
        /// Request token.
        token: RequestToken,
        /// Best match.
        result: Result<Option<SearchSuggestion>, SkylineError>,
    },
    /// Address of a clicked point.
    ReverseGeocoded {
        /// Request token.
        token: RequestToken,
        /// Address or sentinel values.
        result: ReverseGeocodeResult,
    },
    /// Route line.
    Routed {
        /// Request token.
        token: RequestToken,
        /// Line geometry.
        result: Result<Geometry, SkylineError>,
    },
    /// Marker icon.
    IconLoaded {
        /// Request token.
        token: RequestToken,
        /// Decoded image.
        result: Result<DecodedImage, SkylineError>,
    },
}

/// Starts requests and hands out their tokens.
#[derive(Clone)]
pub struct Dispatcher {
    services: Services,
    tokens: Arc<TokenSource>,
    sender: UnboundedSender<Completion>,
}

impl Dispatcher {
    /// Creates a dispatcher and the receiving end of its completion channel.
    pub fn new(services: Services) -> (Self, UnboundedReceiver<Completion>) {
        let (sender, receiver) = unbounded_channel();
        (
            Self {
                services,
                tokens: Arc::new(TokenSource::default()),
                sender,
            },
            receiver,
        )
    }

    fn spawn_with_token<F, Fut>(&self, request: F) -> RequestToken
    where
        F: FnOnce(Services, RequestToken) -> Fut,
        Fut: std::future::Future<Output = Completion> + maybe_sync::MaybeSend + 'static,
    {
        let token = self.tokens.next();
        let future = request(self.services.clone(), token);
        let sender = self.sender.clone();
        async_runtime::spawn(async move {
            if sender.send(future.await).is_err() {
                log::debug!("Viewer is gone, dropping the result of request {token:?}");
            }
        });

        token
    }

    /// Requests search suggestions for `query`.
    pub fn suggestions(&self, query: String, limit: usize) -> RequestToken {
        self.spawn_with_token(move |services, token| async move {
            let suggestions = services.geocoding.search(&query, limit).await;
            Completion::Suggestions { token, suggestions }
        })
    }

    /// Looks up the best match for a submitted search.
    pub fn search(&self, query: String) -> RequestToken {
        self.spawn_with_token(move |services, token| async move {
            let result = services.geocoding.lookup(&query).await;
            Completion::Searched { token, result }
        })
    }

    /// Requests the address at `point`.
    pub fn reverse_geocode(&self, point: GeoPoint) -> RequestToken {
        self.spawn_with_token(move |services, token| async move {
            let result = services.geocoding.reverse(point).await;
            Completion::ReverseGeocoded { token, result }
        })
    }

    /// Requests a route from `start` to `end`.
    pub fn route(&self, start: GeoPoint, end: GeoPoint) -> RequestToken {
        self.spawn_with_token(move |services, token| async move {
            let result = services.router.route(RouteRequest::new(start, end)).await;
            Completion::Routed { token, result }
        })
    }

    /// Loads the marker icon from `url`.
    pub fn load_icon(&self, url: String) -> RequestToken {
        self.spawn_with_token(move |services, token| async move {
            let result = services.platform.load_image_url(&url).await;
            Completion::IconLoaded { token, result }
        })
    }
}
