//! Provides platform specific logic and [`PlatformService`] to access it.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use maybe_sync::{MaybeSend, MaybeSync};

use crate::decoded_image::DecodedImage;
use crate::error::SkylineError;

/// Service providing HTTP access in a platform independent way.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PlatformService: MaybeSend + MaybeSync {
    /// Loads a byte array from the given url with a `GET` request.
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, SkylineError>;

    /// Sends `body` as a JSON document with a `POST` request and returns the response body.
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Bytes, SkylineError>;

    /// Loads and decodes an image from the given url.
    async fn load_image_url(&self, url: &str) -> Result<DecodedImage, SkylineError> {
        let bytes = self.load_bytes_from_url(url).await?;
        DecodedImage::decode(&bytes)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<T: PlatformService + ?Sized> PlatformService for Arc<T> {
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, SkylineError> {
        (**self).load_bytes_from_url(url).await
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Bytes, SkylineError> {
        (**self).post_json(url, body).await
    }

    async fn load_image_url(&self, url: &str) -> Result<DecodedImage, SkylineError> {
        (**self).load_image_url(url).await
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod native;

/// Default implementation of the [`PlatformService`] for the current platform.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformServiceImpl = native::NativePlatformService;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Default implementation of the [`PlatformService`] for the current platform.
#[cfg(target_arch = "wasm32")]
pub type PlatformServiceImpl = web::WebPlatformService;
