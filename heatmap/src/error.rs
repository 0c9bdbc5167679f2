//! Error types used by the crate.

use thiserror::Error;

/// Heatmap error type.
#[derive(Debug, Error)]
pub enum HeatmapError {
    /// Point data could not be retrieved (network failure or unsuccessful HTTP status).
    #[error("failed to load point data: {0}")]
    Fetch(String),
    /// Response body is not a JSON array of points.
    #[error("failed to decode point data: {0}")]
    Decode(#[from] serde_json::Error),
    /// Endpoint cannot be turned into a request URL.
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
    /// Display surface is missing or cannot host a map.
    #[error("display surface is not available: {0}")]
    Surface(String),
    /// The map engine rejected a view or a layer.
    #[error("map backend error: {0}")]
    Backend(String),
    /// Error interacting with WASM runtime.
    #[error("wasm error: {0:?}")]
    Wasm(Option<String>),
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for HeatmapError {
    fn from(value: reqwest::Error) -> Self {
        Self::Fetch(value.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for HeatmapError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        HeatmapError::Wasm(Some(format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<js_sys::Object> for HeatmapError {
    fn from(value: js_sys::Object) -> Self {
        HeatmapError::Wasm(Some(format!("Failed to cast {value:?} into target type")))
    }
}
