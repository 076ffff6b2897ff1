//! Error types used by the crate.

use skyline_types::error::SkylineTypesError;
use thiserror::Error;

/// Skyline error type.
#[derive(Debug, Error)]
pub enum SkylineError {
    /// I/O error (network or file).
    #[error("failed to load data")]
    IO,
    /// The remote service answered with a non-success status code.
    #[error("service responded with status {0}")]
    Status(u16),
    /// Error decoding data.
    #[error("failed to decode data: {0}")]
    Decoding(String),
    /// Malformed JSON payload.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid geometry in the input data.
    #[error(transparent)]
    Geometry(#[from] SkylineTypesError),
    /// Image decoding error.
    #[error("image decode error: {0:?}")]
    ImageDecode(#[from] image::ImageError),
    /// Error interacting with WASM runtime.
    #[error("wasm error: {0:?}")]
    Wasm(Option<String>),
    /// Item not found.
    #[error("item not found: {0}")]
    NotFound(String),
    /// An item with the same id is already registered.
    #[error("item already exists: {0}")]
    Duplicate(String),
    /// The operation requires a mounted map host.
    #[error("map is not mounted")]
    NotMounted,
    /// Generic error - details are inside.
    #[error("{0}")]
    Generic(String),
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for SkylineError {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => Self::Status(status.as_u16()),
            None => Self::IO,
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for SkylineError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        SkylineError::Wasm(Some(format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<js_sys::Object> for SkylineError {
    fn from(value: js_sys::Object) -> Self {
        SkylineError::Wasm(Some(format!("Failed to cast {value:?} into target type")))
    }
}
