//! Accumulation of heat points into screen cells, one grid per zoom level.
//!
//! Points are grouped into square cells of `radius / 2` pixels at every zoom level of the layer.
//! A cell is drawn once, at the position of its first point, with a weight accumulated from all
//! of its points the way overlapping translucent circles add up:
//! `1 - (1 - w1) * (1 - w2) * ...`.
//!
//! Cells are computed in web mercator meters, which is the projection of maps built by
//! [`GalileoBackend`](crate::GalileoBackend).

use std::collections::HashMap;
use std::f64::consts::FRAC_PI_4;

use galileo_types::geo::GeoPoint;
use heatmap::HeatLayerOptions;

use crate::symbol::HeatFeature;

/// Lowest weight a point with positive intensity contributes.
pub const MIN_WEIGHT: f64 = 0.05;

const EARTH_RADIUS: f64 = 6_378_137.0;
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Zoom level of the tile schema with its resolution in map units per pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLevel {
    /// Zoom level index.
    pub z: u32,
    /// Map units per pixel.
    pub resolution: f64,
}

#[derive(Debug, Clone)]
struct LevelCells {
    level: ZoomLevel,
    /// Accumulated weight for the first point of every cell, `None` for other points.
    weights: Vec<Option<f64>>,
}

/// Accumulated cell weights of a set of heat points at every zoom level.
#[derive(Debug, Clone, Default)]
pub struct HeatDensity {
    levels: Vec<LevelCells>,
}

impl HeatDensity {
    /// Accumulates `features` at each of the given zoom levels.
    ///
    /// Features are identified by [`HeatFeature::index`], which must be their position in
    /// `features`.
    pub fn new(
        features: &[HeatFeature],
        levels: &[ZoomLevel],
        options: &HeatLayerOptions,
    ) -> Self {
        let projected: Vec<(f64, f64)> = features
            .iter()
            .map(|feature| web_mercator(feature.position().lat(), feature.position().lon()))
            .collect();
        let cell_pixels = (options.radius / 2.0).max(1.0);

        let levels = levels
            .iter()
            .map(|level| {
                let attenuation = options.zoom_attenuation(f64::from(level.z));
                let cell_size = cell_pixels * level.resolution;

                let mut weights = vec![None; features.len()];
                let mut cells: HashMap<(i64, i64), usize> = HashMap::new();
                for (feature, (x, y)) in features.iter().zip(&projected) {
                    let weight = point_weight(feature.intensity(), attenuation);
                    if weight <= 0.0 || feature.index() >= weights.len() {
                        continue;
                    }

                    let key = ((x / cell_size).floor() as i64, (y / cell_size).floor() as i64);
                    let first = *cells.entry(key).or_insert(feature.index());
                    let accumulated = weights[first].unwrap_or(0.0);
                    weights[first] = Some(1.0 - (1.0 - accumulated) * (1.0 - weight));
                }

                LevelCells {
                    level: *level,
                    weights,
                }
            })
            .collect();

        Self { levels }
    }

    /// Zoom level for a render resolution, fractional between the levels of the schema.
    ///
    /// Returns `None` if there are no levels.
    pub fn zoom_for_resolution(&self, resolution: f64) -> Option<f64> {
        let level = self.nearest(resolution)?.level;
        Some(f64::from(level.z) + (level.resolution / resolution).log2())
    }

    /// Accumulated weight the feature with `index` is drawn with at `resolution`.
    ///
    /// Returns `None` if the feature is not the first point of its cell, or is not drawn at all.
    pub fn cell_weight(&self, index: usize, resolution: f64) -> Option<f64> {
        self.nearest(resolution)?
            .weights
            .get(index)
            .copied()
            .flatten()
    }

    fn nearest(&self, resolution: f64) -> Option<&LevelCells> {
        self.levels.iter().min_by(|a, b| {
            let da = (a.level.resolution / resolution).ln().abs();
            let db = (b.level.resolution / resolution).ln().abs();
            da.total_cmp(&db)
        })
    }
}

/// Contribution in `[0, 1]` of a single point with `intensity` after zoom attenuation.
///
/// Points with positive intensity never go below [`MIN_WEIGHT`]. Other points contribute nothing.
pub fn point_weight(intensity: f64, attenuation: f64) -> f64 {
    if intensity.is_nan() || intensity <= 0.0 {
        return 0.0;
    }

    (intensity * attenuation).clamp(MIN_WEIGHT, 1.0)
}

fn web_mercator(lat: f64, lon: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * (FRAC_PI_4 + lat / 2.0).tan().ln();
    (x, y)
}
