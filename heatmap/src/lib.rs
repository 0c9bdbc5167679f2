//! Heatmap puts a heat layer of remotely served points over a tiled base map.
//!
//! # Quick start
//!
//! ```no_run
//! # use heatmap::{HeatLayerOptions, HeatPoint, HeatmapError, MapBackend, MapViewOptions, TileLayerOptions};
//! # struct MyBackend;
//! # impl MapBackend for MyBackend {
//! #     type Map = ();
//! #     fn create_map(&mut self, _: &str, _: &MapViewOptions) -> Result<(), HeatmapError> { Ok(()) }
//! #     fn add_tile_layer(&mut self, _: &mut (), _: &TileLayerOptions) -> Result<(), HeatmapError> { Ok(()) }
//! #     fn add_heat_layer(&mut self, _: &mut (), _: Vec<HeatPoint>, _: &HeatLayerOptions) -> Result<(), HeatmapError> { Ok(()) }
//! # }
//! # tokio_test::block_on(async {
//! let map = heatmap::initialize(MyBackend, "map", "http://localhost:5000/get-heatmap-data")
//!     .await
//!     .expect("map engine failed");
//! # });
//! ```
//!
//! [`initialize`] creates a map view centered over India, adds Open Street Map tiles, requests
//! the list of points from the endpoint and adds them as a heat layer. The response must be a
//! JSON array of `{"latitude": .., "longitude": .., "intensity": ..}` objects, where the
//! intensity is optional and defaults to `0.5`.
//!
//! If the points cannot be loaded, the error is written to the log and the map stays with its
//! base layer only. Errors reported by the map engine are returned.
//!
//! # Main components
//!
//! * [`MapBackend`] is implemented by the map engine. It creates the map and draws the layers.
//!   `heatmap-galileo` provides an implementation for the `galileo` engine.
//! * [`PointSource`] provides the points. [`HttpPointSource`] loads them from a JSON endpoint.
//! * [`Bootstrapper`] runs the startup sequence with a given backend, source and
//!   [`HeatmapConfig`].

pub mod backend;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod point;
pub mod source;

pub use backend::MapBackend;
pub use bootstrap::{fetch_heat_points, initialize, Bootstrapper};
pub use config::{HeatLayerOptions, HeatmapConfig, MapViewOptions, TileLayerOptions};
pub use error::HeatmapError;
pub use point::{HeatPoint, PointRecord};
pub use source::{HttpPointSource, PointSource};

#[cfg(test)]
pub(crate) mod tests;
