//! Sources of heat point data.

use async_trait::async_trait;

use crate::error::HeatmapError;
use crate::point::PointRecord;

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(target_arch = "wasm32")]
mod web;

/// Provides the records a heat layer is built from.
///
/// Any error returned by a source is treated as a data loading failure: the bootstrapper logs it
/// and leaves the map without a heat layer.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PointSource {
    /// Loads all records in the order they should be drawn.
    async fn load_points(&self) -> Result<Vec<PointRecord>, HeatmapError>;
}

/// Loads records with a single `GET` request to a JSON endpoint.
///
/// The endpoint may be relative. In the browser it is resolved against the page like any
/// `fetch` call. On native targets a relative endpoint needs a base URL set with
/// [`HttpPointSource::with_base_url`], otherwise loading fails with
/// [`HeatmapError::Endpoint`].
///
/// No timeout is configured and the request is never retried.
#[derive(Debug, Clone)]
pub struct HttpPointSource {
    endpoint: String,
    base_url: Option<String>,
    #[cfg(not(target_arch = "wasm32"))]
    http_client: reqwest::Client,
}

impl HttpPointSource {
    /// Creates a source for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            base_url: None,
            #[cfg(not(target_arch = "wasm32"))]
            http_client: native::default_client(),
        }
    }

    /// Sets the URL relative endpoints are resolved against.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Endpoint as given to the constructor.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Base URL, if set.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}
