//! Heat points as galileo features and the symbol that draws them.

use galileo::layer::feature_layer::symbol::Symbol;
use galileo::layer::feature_layer::Feature;
use galileo::render::point_paint::PointPaint;
use galileo::render::render_bundle::RenderBundle;
use galileo::Color;
use galileo_types::cartesian::Point3;
use galileo_types::geo::impls::GeoPoint2d;
use galileo_types::geometry::Geom;
use galileo_types::latlon;
use heatmap::{HeatLayerOptions, HeatPoint};

use crate::density::{HeatDensity, ZoomLevel};

const HALO_OPACITY: f64 = 0.35;
const CORE_OPACITY: f64 = 0.8;

/// Color stops of the heat gradient as `(weight, [r, g, b])`.
const GRADIENT: [(f64, [u8; 3]); 5] = [
    (0.4, [0, 0, 255]),
    (0.6, [0, 255, 255]),
    (0.7, [0, 255, 0]),
    (0.8, [255, 255, 0]),
    (1.0, [255, 0, 0]),
];

/// A single heat point on the map.
#[derive(Debug, Clone)]
pub struct HeatFeature {
    index: usize,
    position: GeoPoint2d,
    intensity: f64,
}

impl HeatFeature {
    /// Creates the feature for the point at position `index` of the layer.
    pub fn new(index: usize, point: HeatPoint) -> Self {
        Self {
            index,
            position: latlon!(point.lat(), point.lon()),
            intensity: point.intensity(),
        }
    }

    /// Position of the feature in its layer.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Geographic position of the point.
    pub fn position(&self) -> &GeoPoint2d {
        &self.position
    }

    /// Weight of the point.
    pub fn intensity(&self) -> f64 {
        self.intensity
    }
}

impl Feature for HeatFeature {
    type Geom = GeoPoint2d;

    fn geometry(&self) -> &Self::Geom {
        &self.position
    }
}

/// Draws the cells of a [`HeatDensity`]: a soft halo of `radius + blur` pixels around a core of
/// `radius` pixels for every cell, colored and faded by the accumulated cell weight.
///
/// Only the first point of a cell draws anything, so a dense cluster shows as one hot spot while a
/// lone point stays faint.
#[derive(Debug, Clone)]
pub struct HeatSymbol {
    options: HeatLayerOptions,
    density: HeatDensity,
}

impl HeatSymbol {
    /// Creates a symbol drawing `features` at the given zoom levels.
    pub fn new(
        options: HeatLayerOptions,
        levels: &[ZoomLevel],
        features: &[HeatFeature],
    ) -> Self {
        let density = HeatDensity::new(features, levels, &options);
        Self { options, density }
    }

    /// Parameters of the symbol.
    pub fn options(&self) -> &HeatLayerOptions {
        &self.options
    }

    /// Accumulated cells of the layer.
    pub fn density(&self) -> &HeatDensity {
        &self.density
    }
}

impl Symbol<HeatFeature> for HeatSymbol {
    fn render(
        &self,
        feature: &HeatFeature,
        geometry: &Geom<Point3>,
        min_resolution: f64,
        bundle: &mut RenderBundle,
    ) {
        let Geom::Point(point) = geometry else {
            return;
        };
        let Some(weight) = self.density.cell_weight(feature.index, min_resolution) else {
            return;
        };

        let color = heat_color(weight);
        let radius = self.options.radius.max(0.0);
        let halo_diameter = 2.0 * (radius + self.options.blur.max(0.0));

        let halo = PointPaint::circle(
            color.with_alpha(opacity(weight * HALO_OPACITY)),
            halo_diameter as f32,
        );
        bundle.add_point(point, &halo, min_resolution);

        let core = PointPaint::circle(
            color.with_alpha(opacity(weight * CORE_OPACITY)),
            (2.0 * radius) as f32,
        );
        bundle.add_point(point, &core, min_resolution);
    }
}

/// Color of the heat gradient for a weight in `[0, 1]`: blue for the weakest points through cyan,
/// lime and yellow to red for the strongest ones.
pub fn heat_color(weight: f64) -> Color {
    let weight = weight.clamp(0.0, 1.0);

    let (first_stop, [r, g, b]) = GRADIENT[0];
    if weight <= first_stop {
        return Color::rgba(r, g, b, 255);
    }

    for stops in GRADIENT.windows(2) {
        let (from_stop, from) = stops[0];
        let (to_stop, to) = stops[1];
        if weight <= to_stop {
            let t = (weight - from_stop) / (to_stop - from_stop);
            return Color::rgba(
                lerp(from[0], to[0], t),
                lerp(from[1], to[1], t),
                lerp(from[2], to[2], t),
                255,
            );
        }
    }

    Color::RED
}

fn lerp(from: u8, to: u8, t: f64) -> u8 {
    (from as f64 + (to as f64 - from as f64) * t).round() as u8
}

fn opacity(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
