//! Contract between the bootstrapper and the map engine that draws the map.

use crate::config::{HeatLayerOptions, MapViewOptions, TileLayerOptions};
use crate::error::HeatmapError;
use crate::point::HeatPoint;

/// Map engine the bootstrapper draws onto.
///
/// Tile loading, projection and heat rendering are entirely up to the implementation. The
/// bootstrapper only decides what is added and in which order: the tile layer always goes first,
/// so the heat layer added later is drawn over it.
pub trait MapBackend {
    /// Handle of a created map.
    type Map;

    /// Creates a map bound to the display surface `container_id` and centered as `view` says.
    fn create_map(
        &mut self,
        container_id: &str,
        view: &MapViewOptions,
    ) -> Result<Self::Map, HeatmapError>;

    /// Adds a raster tile layer on top of the existing layers of `map`.
    fn add_tile_layer(
        &mut self,
        map: &mut Self::Map,
        tiles: &TileLayerOptions,
    ) -> Result<(), HeatmapError>;

    /// Adds a heat layer drawing `points` on top of the existing layers of `map`.
    ///
    /// `points` may be empty, in which case the layer draws nothing.
    fn add_heat_layer(
        &mut self,
        map: &mut Self::Map,
        points: Vec<HeatPoint>,
        options: &HeatLayerOptions,
    ) -> Result<(), HeatmapError>;
}
