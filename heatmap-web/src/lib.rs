//! Browser entry point: shows a heatmap inside an element of the host page.
//!
//! ```js
//! import init_module, { init } from "./pkg/heatmap_web.js";
//!
//! await init_module();
//! init("map", "/get-heatmap-data");
//! ```

#![cfg(target_arch = "wasm32")]

use heatmap::{Bootstrapper, HeatmapConfig, HeatmapError};
use heatmap_galileo::{GalileoBackend, HeatmapApp};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement};

/// Id of the canvas `galileo-egui` draws to.
const CANVAS_ID: &str = "the_canvas_id";

/// Shows a heatmap of the points served by `endpoint_url` in the element `container_id`.
///
/// A relative `endpoint_url` is resolved against the page address. The map with the base layer is
/// shown right away, the heat layer is added once the points are loaded. Loading errors are written
/// to the browser console.
#[wasm_bindgen]
pub fn init(container_id: &str, endpoint_url: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // Fails if the logger is already installed by an earlier call.
    console_log::init_with_level(log::Level::Info).ok();

    attach_canvas(container_id).map_err(to_js_error)?;

    let config = HeatmapConfig::default()
        .with_container_id(container_id)
        .with_endpoint(endpoint_url);
    let mut bootstrapper = Bootstrapper::from_config(GalileoBackend::default(), config);
    let map = bootstrapper.create_base_map().map_err(to_js_error)?;

    galileo_egui::InitBuilder::new(map)
        .with_app_builder(move |egui_map_state| {
            Box::new(HeatmapApp::new(egui_map_state, bootstrapper))
        })
        .init()
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Puts a canvas filling the container into the page, or reuses the container if it is a canvas
/// itself.
fn attach_canvas(container_id: &str) -> Result<HtmlCanvasElement, HeatmapError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| HeatmapError::Surface("document is not available".into()))?;
    let container = document.get_element_by_id(container_id).ok_or_else(|| {
        HeatmapError::Surface(format!("no element with id '{container_id}' in the page"))
    })?;

    if let Some(canvas) = container.dyn_ref::<HtmlCanvasElement>() {
        canvas.set_id(CANVAS_ID);
        return Ok(canvas.clone());
    }

    let canvas = match existing_canvas(&document) {
        Some(canvas) => canvas,
        None => create_canvas(&document)?,
    };
    container.append_child(&canvas)?;

    Ok(canvas)
}

fn existing_canvas(document: &Document) -> Option<HtmlCanvasElement> {
    document
        .get_element_by_id(CANVAS_ID)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()
}

fn create_canvas(document: &Document) -> Result<HtmlCanvasElement, HeatmapError> {
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| HeatmapError::Surface("failed to create canvas".into()))?;
    canvas.set_id(CANVAS_ID);

    let style = canvas.style();
    style.set_property("width", "100%")?;
    style.set_property("height", "100%")?;

    Ok(canvas)
}

fn to_js_error(err: HeatmapError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
