use async_trait::async_trait;
use js_sys::Uint8Array;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use super::{HttpPointSource, PointSource};
use crate::error::HeatmapError;
use crate::point::{decode_records, PointRecord};

impl HttpPointSource {
    /// URL the request is sent to. Without a base URL the endpoint is passed to `fetch` as is.
    pub fn request_url(&self) -> Result<String, HeatmapError> {
        match &self.base_url {
            Some(base) => Ok(web_sys::Url::new_with_base(&self.endpoint, base)?.href()),
            None => Ok(self.endpoint.clone()),
        }
    }
}

#[async_trait(?Send)]
impl PointSource for HttpPointSource {
    async fn load_points(&self) -> Result<Vec<PointRecord>, HeatmapError> {
        let url = self.request_url()?;
        log::info!("Loading heatmap data from {url}");

        let opts = RequestInit::new();
        opts.set_method("GET");

        let request = Request::new_with_str_and_init(&url, &opts)?;
        request.headers().set("Accept", "application/json")?;

        let window = web_sys::window()
            .ok_or_else(|| HeatmapError::Wasm(Some("Global window is not available".into())))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|err| HeatmapError::Fetch(format!("{url}: {err:?}")))?;
        let resp: Response = resp_value.dyn_into()?;

        if !resp.ok() {
            return Err(HeatmapError::Fetch(format!(
                "{url} responded with {} {}",
                resp.status(),
                resp.status_text()
            )));
        }

        let bytes_val = JsFuture::from(resp.array_buffer()?).await?;
        let body = Uint8Array::new(&bytes_val).to_vec();
        decode_records(&body)
    }
}
