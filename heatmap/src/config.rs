//! Configuration of the map view, the base tile layer and the heat layer.
//!
//! Every type here defaults to the standard setup: a view over India at zoom 5, Open Street Map
//! tiles and a heat layer with radius 20, blur 15 and max zoom 17. Setters follow the builder
//! style, and all types can be deserialized with any subset of fields present.

use serde::{Deserialize, Serialize};

/// Identifier of the display surface the map is attached to.
pub const DEFAULT_CONTAINER_ID: &str = "map";
/// Path of the point data endpoint.
pub const DEFAULT_ENDPOINT: &str = "/get-heatmap-data";

/// Latitude of the default map center.
pub const DEFAULT_LATITUDE: f64 = 20.5937;
/// Longitude of the default map center.
pub const DEFAULT_LONGITUDE: f64 = 78.9629;
/// Default zoom level of the map.
pub const DEFAULT_ZOOM: u32 = 5;

/// Open Street Map tile URL template.
pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
/// Attribution text required by the Open Street Map tile usage policy.
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";
/// Page the Open Street Map attribution links to.
pub const OSM_COPYRIGHT_URL: &str = "https://www.openstreetmap.org/copyright";

// Beyond this many levels below `max_zoom` the heat contribution stops shrinking.
const MAX_ATTENUATION_STEPS: f64 = 12.0;

/// Initial position of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewOptions {
    /// Latitude of the center in degrees.
    pub latitude: f64,
    /// Longitude of the center in degrees.
    pub longitude: f64,
    /// Zoom level on the standard web tile schema.
    pub zoom: u32,
}

impl Default for MapViewOptions {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl MapViewOptions {
    /// Sets the center of the map.
    pub fn with_center(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Sets the zoom level.
    pub fn with_zoom(mut self, zoom: u32) -> Self {
        self.zoom = zoom;
        self
    }
}

/// Descriptor of the raster base layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayerOptions {
    /// URL template with `{s}`, `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    /// Values substituted for `{s}`.
    pub subdomains: Vec<String>,
    /// Attribution text shown over the map.
    pub attribution: String,
    /// Link attached to the attribution.
    pub attribution_url: Option<String>,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            url_template: OSM_TILE_URL.to_string(),
            subdomains: ["a", "b", "c"].map(String::from).to_vec(),
            attribution: OSM_ATTRIBUTION.to_string(),
            attribution_url: Some(OSM_COPYRIGHT_URL.to_string()),
        }
    }
}

impl TileLayerOptions {
    /// Creates a descriptor for the given template with the given attribution text.
    ///
    /// Subdomains default to `a`, `b` and `c`.
    pub fn new(url_template: impl Into<String>, attribution: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            attribution: attribution.into(),
            attribution_url: None,
            ..Default::default()
        }
    }

    /// Replaces the subdomains used for the `{s}` placeholder.
    pub fn with_subdomains<S: Into<String>>(
        mut self,
        subdomains: impl IntoIterator<Item = S>,
    ) -> Self {
        self.subdomains = subdomains.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the link attached to the attribution.
    pub fn with_attribution_url(mut self, url: impl Into<String>) -> Self {
        self.attribution_url = Some(url.into());
        self
    }

    /// Returns the URL of the tile with the given index.
    ///
    /// The subdomain is picked by `(x + y) mod subdomains count`, so neighbouring tiles are spread
    /// over different hosts. Without subdomains `{s}` is left as is.
    ///
    /// ```
    /// use heatmap::TileLayerOptions;
    ///
    /// let tiles = TileLayerOptions::default();
    /// assert_eq!(
    ///     tiles.tile_url(5, 22, 13),
    ///     "https://c.tile.openstreetmap.org/5/22/13.png"
    /// );
    /// ```
    pub fn tile_url(&self, z: u32, x: i32, y: i32) -> String {
        let mut url = self
            .url_template
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string());

        if !self.subdomains.is_empty() {
            let index = (i64::from(x) + i64::from(y)).rem_euclid(self.subdomains.len() as i64);
            url = url.replace("{s}", &self.subdomains[index as usize]);
        }

        url
    }
}

/// Rendering parameters of the heat layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatLayerOptions {
    /// Radius of a point in pixels.
    pub radius: f64,
    /// Width of the blurred edge around a point in pixels.
    pub blur: f64,
    /// Zoom level at which points are drawn with their full intensity.
    pub max_zoom: u32,
}

impl Default for HeatLayerOptions {
    fn default() -> Self {
        Self {
            radius: 20.0,
            blur: 15.0,
            max_zoom: 17,
        }
    }
}

impl HeatLayerOptions {
    /// Sets the point radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the blur width.
    pub fn with_blur(mut self, blur: f64) -> Self {
        self.blur = blur;
        self
    }

    /// Sets the zoom level of full intensity.
    pub fn with_max_zoom(mut self, max_zoom: u32) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    /// Multiplier applied to point intensities when the map is shown at `zoom`.
    ///
    /// Every zoom level below `max_zoom` halves the contribution, down to 12 levels.
    pub fn zoom_attenuation(&self, zoom: f64) -> f64 {
        let steps = (f64::from(self.max_zoom) - zoom).clamp(0.0, MAX_ATTENUATION_STEPS);
        1.0 / 2f64.powf(steps)
    }
}

/// Complete setup of a heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Identifier of the display surface.
    pub container_id: String,
    /// Point data endpoint loaded by [`Bootstrapper::from_config`](crate::Bootstrapper::from_config).
    /// May be relative, see [`HttpPointSource`](crate::HttpPointSource).
    pub endpoint: String,
    /// Initial position of the map.
    pub view: MapViewOptions,
    /// Base layer.
    pub tiles: TileLayerOptions,
    /// Heat layer.
    pub heat: HeatLayerOptions,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            view: MapViewOptions::default(),
            tiles: TileLayerOptions::default(),
            heat: HeatLayerOptions::default(),
        }
    }
}

impl HeatmapConfig {
    /// Sets the display surface identifier.
    pub fn with_container_id(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = container_id.into();
        self
    }

    /// Sets the point data endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the initial view.
    pub fn with_view(mut self, view: MapViewOptions) -> Self {
        self.view = view;
        self
    }

    /// Sets the base layer.
    pub fn with_tiles(mut self, tiles: TileLayerOptions) -> Self {
        self.tiles = tiles;
        self
    }

    /// Sets the heat layer parameters.
    pub fn with_heat(mut self, heat: HeatLayerOptions) -> Self {
        self.heat = heat;
        self
    }
}
