//! Platform specific stuff for native targets: HTTP over `reqwest`.

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, info};

use crate::error::SkylineError;
use crate::platform::PlatformService;

const USER_AGENT: &str = concat!("skyline/", env!("CARGO_PKG_VERSION"));

/// Platform service on top of `reqwest`.
#[derive(Debug, Clone)]
pub struct NativePlatformService {
    http_client: reqwest::Client,
}

impl NativePlatformService {
    /// Creates a new service with its own HTTP client.
    pub fn new() -> Result<Self, SkylineError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http_client })
    }

    async fn read_response(
        &self,
        url: &str,
        response: reqwest::Response,
    ) -> Result<Bytes, SkylineError> {
        let status = response.status();
        if !status.is_success() {
            info!(
                "Failed to load {url}: {}, {:?}",
                status,
                response.text().await
            );
            return Err(SkylineError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?)
    }
}

#[async_trait]
impl PlatformService for NativePlatformService {
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, SkylineError> {
        debug!("GET {url}");
        let response = self.http_client.get(url).send().await?;
        self.read_response(url, response).await
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Bytes, SkylineError> {
        debug!("POST {url}");
        let response = self
            .http_client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(body)?)
            .send()
            .await?;
        self.read_response(url, response).await
    }
}
