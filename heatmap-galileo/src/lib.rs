//! [`heatmap`] backend for the [`galileo`] map engine.
//!
//! [`GalileoBackend`] builds a galileo [`Map`](galileo::Map) with a raster tile layer and draws
//! heat points with [`HeatSymbol`], which colors screen cells by the accumulated weight of their
//! points. [`HeatmapApp`] shows such a map in an `egui` window or a browser canvas and adds the
//! heat layer when the points are loaded.
//!
//! ```no_run
//! use heatmap::{Bootstrapper, HeatmapConfig};
//! use heatmap_galileo::{GalileoBackend, HeatmapApp};
//!
//! let config = HeatmapConfig::default().with_endpoint("http://127.0.0.1:5000/get-heatmap-data");
//! let mut bootstrapper = Bootstrapper::from_config(GalileoBackend::default(), config);
//! let map = bootstrapper.create_base_map().expect("failed to create map");
//!
//! galileo_egui::InitBuilder::new(map)
//!     .with_app_builder(move |state| Box::new(HeatmapApp::new(state, bootstrapper)))
//!     .init()
//!     .expect("failed to initialize");
//! ```

mod app;
mod backend;
pub mod density;
pub mod symbol;

pub use app::HeatmapApp;
pub use backend::GalileoBackend;
pub use density::{HeatDensity, ZoomLevel};
pub use symbol::{heat_color, HeatFeature, HeatSymbol};
