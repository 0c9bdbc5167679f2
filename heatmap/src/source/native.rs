use async_trait::async_trait;
use log::info;

use super::{HttpPointSource, PointSource};
use crate::error::HeatmapError;
use crate::point::{decode_records, PointRecord};

pub(super) fn default_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("heatmap/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

impl HttpPointSource {
    /// Uses the given client for requests instead of the default one.
    pub fn with_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// Absolute URL the request is sent to.
    pub fn request_url(&self) -> Result<String, HeatmapError> {
        let endpoint = self.endpoint.trim();
        let url = match &self.base_url {
            Some(base) => reqwest::Url::parse(base).and_then(|base| base.join(endpoint)),
            None => reqwest::Url::parse(endpoint),
        };

        url.map(String::from)
            .map_err(|err| HeatmapError::Endpoint(format!("'{endpoint}': {err}")))
    }
}

#[async_trait]
impl PointSource for HttpPointSource {
    async fn load_points(&self) -> Result<Vec<PointRecord>, HeatmapError> {
        let url = self.request_url()?;
        info!("Loading heatmap data from {url}");

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HeatmapError::Fetch(format!("{url} responded with {status}")));
        }

        let body = response.bytes().await?;
        decode_records(&body)
    }
}
