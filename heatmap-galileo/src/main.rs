//! Shows a heatmap of the points served by a JSON endpoint over Open Street Map tiles.
//!
//! ```sh
//! heatmap-viewer [ENDPOINT_URL]
//! ```
//!
//! The endpoint defaults to `http://127.0.0.1:5000/get-heatmap-data`.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::anyhow;
    use heatmap::{Bootstrapper, HeatmapConfig};
    use heatmap_galileo::{GalileoBackend, HeatmapApp};

    const DEFAULT_ENDPOINT_URL: &str = "http://127.0.0.1:5000/get-heatmap-data";

    let endpoint_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_string());

    let config = HeatmapConfig::default().with_endpoint(endpoint_url.as_str());
    let backend = GalileoBackend::default().with_tile_cache(".tile_cache");
    let mut bootstrapper = Bootstrapper::from_config(backend, config);
    let map = bootstrapper.create_base_map()?;

    galileo_egui::InitBuilder::new(map)
        .with_app_builder(move |egui_map_state| {
            Box::new(HeatmapApp::new(egui_map_state, bootstrapper))
        })
        .init()
        .map_err(|err| anyhow!("failed to run the map window: {err}"))
}

#[cfg(target_arch = "wasm32")]
fn main() {}
