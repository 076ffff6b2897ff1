//! Platform specific stuff for WASM32 (web) targets.

use async_trait::async_trait;
use bytes::Bytes;
use js_sys::Uint8Array;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response, WorkerGlobalScope};

use crate::error::SkylineError;
use crate::platform::PlatformService;

/// Routes panics and `log` records to the browser console. Safe to call more than once.
pub fn init_logging(level: log::Level) {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if console_log::init_with_level(level).is_err() {
        log::debug!("Console logger is already installed");
    }
}

/// Platform service for Web target, built on the `fetch` API.
#[derive(Debug, Default, Clone)]
pub struct WebPlatformService {}

impl WebPlatformService {
    /// Creates a new service.
    pub fn new() -> Result<Self, SkylineError> {
        Ok(Self {})
    }

    async fn fetch(&self, request: Request) -> Result<Bytes, SkylineError> {
        let resp_value = if let Some(window) = web_sys::window() {
            JsFuture::from(window.fetch_with_request(&request)).await?
        } else if let Ok(global) = js_sys::global().dyn_into::<WorkerGlobalScope>() {
            JsFuture::from(global.fetch_with_request(&request)).await?
        } else {
            return Err(SkylineError::Wasm(Some(
                "Global object is not available".into(),
            )));
        };

        let resp: Response = resp_value.dyn_into()?;
        if !resp.ok() {
            return Err(SkylineError::Status(resp.status()));
        }

        let bytes_val = JsFuture::from(resp.array_buffer()?).await?;
        let array = Uint8Array::new(&bytes_val);
        Ok(array.to_vec().into())
    }
}

#[async_trait(?Send)]
impl PlatformService for WebPlatformService {
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, SkylineError> {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        let request = Request::new_with_str_and_init(url, &opts)?;
        self.fetch(request).await
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Bytes, SkylineError> {
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&wasm_bindgen::JsValue::from_str(&body.to_string()));

        let request = Request::new_with_str_and_init(url, &opts)?;
        request.headers().set("Content-Type", "application/json")?;
        self.fetch(request).await
    }
}
