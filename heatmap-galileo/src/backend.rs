use std::path::PathBuf;

use galileo::layer::raster_tile_layer::RasterTileLayerBuilder;
use galileo::layer::FeatureLayer;
use galileo::tile_schema::TileIndex;
use galileo::{Map, MapBuilder, TileSchema};
use galileo_types::geo::Crs;
use heatmap::{
    HeatLayerOptions, HeatPoint, HeatmapError, MapBackend, MapViewOptions, TileLayerOptions,
};
use log::debug;

use crate::density::ZoomLevel;
use crate::symbol::{HeatFeature, HeatSymbol};

/// Number of zoom levels of the default tile schema.
const WEB_LODS: u32 = 18;

/// [`MapBackend`] that builds a galileo [`Map`].
///
/// Zoom levels are resolved with the backend tile schema, which is the standard web mercator schema
/// by default. The container id is not used: galileo maps are attached to a window or a canvas by
/// the host application after they are built.
pub struct GalileoBackend {
    tile_schema: TileSchema,
    tile_cache: Option<PathBuf>,
}

impl Default for GalileoBackend {
    fn default() -> Self {
        Self::new(TileSchema::web(WEB_LODS))
    }
}

impl GalileoBackend {
    /// Creates a backend with the given tile schema.
    pub fn new(tile_schema: TileSchema) -> Self {
        Self {
            tile_schema,
            tile_cache: None,
        }
    }

    /// Stores loaded tiles in the given directory. Ignored on the web.
    pub fn with_tile_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.tile_cache = Some(path.into());
        self
    }

    /// Tile schema of the backend.
    pub fn tile_schema(&self) -> &TileSchema {
        &self.tile_schema
    }

    fn resolution(&self, zoom: u32) -> Result<f64, HeatmapError> {
        self.tile_schema.lod_resolution(zoom).ok_or_else(|| {
            HeatmapError::Backend(format!("zoom level {zoom} is not in the tile schema"))
        })
    }

    /// Zoom levels from 0 to `max_zoom` that exist in the tile schema.
    fn heat_levels(&self, max_zoom: u32) -> Vec<ZoomLevel> {
        (0..=max_zoom)
            .filter_map(|z| {
                self.tile_schema
                    .lod_resolution(z)
                    .map(|resolution| ZoomLevel { z, resolution })
            })
            .collect()
    }
}

impl MapBackend for GalileoBackend {
    type Map = Map;

    fn create_map(
        &mut self,
        container_id: &str,
        view: &MapViewOptions,
    ) -> Result<Self::Map, HeatmapError> {
        let resolution = self.resolution(view.zoom)?;
        debug!("Building map for '{container_id}' with resolution {resolution}");

        Ok(MapBuilder::default()
            .with_latlon(view.latitude, view.longitude)
            .with_resolution(resolution)
            .build())
    }

    fn add_tile_layer(
        &mut self,
        map: &mut Self::Map,
        tiles: &TileLayerOptions,
    ) -> Result<(), HeatmapError> {
        let url_options = tiles.clone();
        let mut builder = RasterTileLayerBuilder::new_rest(move |index: &TileIndex| {
            url_options.tile_url(index.z, index.x, index.y)
        })
        .with_tile_schema(self.tile_schema.clone())
        .with_attribution(
            tiles.attribution.clone(),
            tiles.attribution_url.clone().unwrap_or_default(),
        );

        if let Some(path) = &self.tile_cache {
            builder = builder.with_file_cache_checked(path);
        }

        let layer = builder
            .build()
            .map_err(|err| HeatmapError::Backend(format!("failed to create tile layer: {err}")))?;
        map.layers_mut().push(layer);

        Ok(())
    }

    fn add_heat_layer(
        &mut self,
        map: &mut Self::Map,
        points: Vec<HeatPoint>,
        options: &HeatLayerOptions,
    ) -> Result<(), HeatmapError> {
        let levels = self.heat_levels(options.max_zoom);
        if levels.is_empty() {
            return Err(HeatmapError::Backend(
                "tile schema has no zoom levels for the heat layer".into(),
            ));
        }

        let features: Vec<HeatFeature> = points
            .into_iter()
            .enumerate()
            .map(|(index, point)| HeatFeature::new(index, point))
            .collect();
        let symbol = HeatSymbol::new(options.clone(), &levels, &features);
        let lods: Vec<f64> = levels.iter().map(|level| level.resolution).collect();
        debug!(
            "Heat layer with {} points over {} zoom levels",
            features.len(),
            lods.len()
        );

        let layer = FeatureLayer::with_lods(features, symbol, Crs::WGS84, &lods);
        map.layers_mut().push(layer);

        Ok(())
    }
}
