//! The startup sequence: map view, base tiles, point data, heat layer.

use log::{debug, error, info};

use crate::backend::MapBackend;
use crate::config::HeatmapConfig;
use crate::error::HeatmapError;
use crate::point::{to_heat_points, HeatPoint};
use crate::source::{HttpPointSource, PointSource};

/// Prefix of the log entry written when point data cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading heatmap:";

/// Runs the startup sequence of a heatmap against a [`MapBackend`].
///
/// The sequence is linear and runs once:
/// 1. create the map view,
/// 2. add the base tile layer,
/// 3. load the points,
/// 4. convert them into heat points,
/// 5. add the heat layer.
///
/// Failing to load or decode the points is logged and ends the sequence early, leaving the
/// map with the base layer only. Errors reported by the backend are returned to the caller.
///
/// [`Bootstrapper::initialize`] runs everything. Hosts that want to show the map while the data
/// is on its way can call [`Bootstrapper::create_base_map`] first, and then either
/// [`Bootstrapper::load_heat_layer`] or the pair [`fetch_heat_points`] and
/// [`Bootstrapper::add_heat_layer`].
pub struct Bootstrapper<B, S> {
    backend: B,
    source: S,
    config: HeatmapConfig,
}

impl<B: MapBackend, S: PointSource> Bootstrapper<B, S> {
    /// Creates a bootstrapper with the default configuration.
    pub fn new(backend: B, source: S) -> Self {
        Self {
            backend,
            source,
            config: HeatmapConfig::default(),
        }
    }

    /// Replaces the view, tile and heat layer settings.
    ///
    /// The points keep coming from the source given to [`Bootstrapper::new`]. Use
    /// [`Bootstrapper::from_config`] to load them from the configured endpoint.
    pub fn with_config(mut self, config: HeatmapConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &HeatmapConfig {
        &self.config
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The point source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Creates the map view and adds the base tile layer to it.
    pub fn create_base_map(&mut self) -> Result<B::Map, HeatmapError> {
        let HeatmapConfig {
            container_id,
            view,
            tiles,
            ..
        } = &self.config;

        info!(
            "Creating map in '{container_id}' at ({}, {}), zoom {}",
            view.latitude, view.longitude, view.zoom
        );
        let mut map = self.backend.create_map(container_id, view)?;
        self.backend.add_tile_layer(&mut map, tiles)?;

        Ok(map)
    }

    /// Adds a heat layer with the given points to `map`.
    pub fn add_heat_layer(
        &mut self,
        map: &mut B::Map,
        points: Vec<HeatPoint>,
    ) -> Result<(), HeatmapError> {
        debug!("Adding heat layer with {} points", points.len());
        self.backend.add_heat_layer(map, points, &self.config.heat)
    }

    /// Loads the points and adds the heat layer to `map`.
    ///
    /// Returns `Ok(false)` if the points could not be loaded. In that case the error is already
    /// logged and nothing is added to the map.
    pub async fn load_heat_layer(&mut self, map: &mut B::Map) -> Result<bool, HeatmapError> {
        match fetch_heat_points(&self.source).await {
            Some(points) => {
                self.add_heat_layer(map, points)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Runs the whole sequence and returns the created map.
    pub async fn initialize(mut self) -> Result<B::Map, HeatmapError> {
        let mut map = self.create_base_map()?;
        self.load_heat_layer(&mut map).await?;
        Ok(map)
    }
}

impl<B: MapBackend> Bootstrapper<B, HttpPointSource> {
    /// Creates a bootstrapper that loads the points from `config.endpoint`.
    pub fn from_config(backend: B, config: HeatmapConfig) -> Self {
        let source = HttpPointSource::new(config.endpoint.as_str());
        Self {
            backend,
            source,
            config,
        }
    }
}

/// Loads the points from `source` and converts them into heat points.
///
/// A loading failure is logged once with the [`LOAD_ERROR_MESSAGE`] prefix and `None` is
/// returned.
pub async fn fetch_heat_points<S: PointSource + ?Sized>(source: &S) -> Option<Vec<HeatPoint>> {
    match source.load_points().await {
        Ok(records) => Some(to_heat_points(records)),
        Err(err) => {
            error!("{LOAD_ERROR_MESSAGE} {err}");
            None
        }
    }
}

/// Shows a heatmap of the points served by `endpoint_url` in the display surface `container_id`.
///
/// Uses the default view, tiles and heat layer parameters. See [`HttpPointSource`] for how the
/// endpoint is resolved.
pub async fn initialize<B: MapBackend>(
    backend: B,
    container_id: &str,
    endpoint_url: &str,
) -> Result<B::Map, HeatmapError> {
    let config = HeatmapConfig::default()
        .with_container_id(container_id)
        .with_endpoint(endpoint_url);

    Bootstrapper::from_config(backend, config).initialize().await
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use log::Level;

    use super::*;
    use crate::config::{HeatLayerOptions, MapViewOptions, TileLayerOptions};
    use crate::tests::{capture_logs, RecordedLayer, RecordingBackend, ScriptedSource};

    fn bootstrapper(source: ScriptedSource) -> Bootstrapper<RecordingBackend, ScriptedSource> {
        Bootstrapper::new(RecordingBackend::default(), source)
    }

    fn heat_triples(layers: &[RecordedLayer]) -> Option<Vec<[f64; 3]>> {
        layers.iter().find_map(|layer| match layer {
            RecordedLayer::Heat { points, .. } => Some(points.clone()),
            RecordedLayer::Tiles(_) => None,
        })
    }

    #[test]
    fn creates_map_with_default_view_and_osm_tiles() {
        let mut bootstrapper = bootstrapper(ScriptedSource::body("[]"));

        let map = bootstrapper.create_base_map().expect("map is created");

        assert_eq!(map.container_id, "map");
        assert_eq!(map.view, MapViewOptions::default());
        assert_eq!(map.layers, vec![RecordedLayer::Tiles(TileLayerOptions::default())]);
        assert_eq!(bootstrapper.source().calls(), 0);
    }

    #[test]
    fn scenario_point_with_intensity() {
        let source =
            ScriptedSource::body(r#"[{"latitude":28.6,"longitude":77.2,"intensity":0.9}]"#);

        let map = tokio_test::block_on(bootstrapper(source).initialize()).expect("initialized");

        assert_eq!(heat_triples(&map.layers), Some(vec![[28.6, 77.2, 0.9]]));
    }

    #[test]
    fn scenario_point_without_intensity() {
        let source = ScriptedSource::body(r#"[{"latitude":19.07,"longitude":72.88}]"#);

        let map = tokio_test::block_on(bootstrapper(source).initialize()).expect("initialized");

        assert_eq!(heat_triples(&map.layers), Some(vec![[19.07, 72.88, 0.5]]));
    }

    #[test]
    fn scenario_empty_response_adds_empty_layer() {
        let (map, logs) = capture_logs(|| {
            tokio_test::block_on(bootstrapper(ScriptedSource::body("[]")).initialize())
        });

        let map = map.expect("initialized");
        assert_eq!(map.layers.len(), 2);
        assert_eq!(heat_triples(&map.layers), Some(vec![]));
        assert!(logs.iter().all(|(level, _)| *level > Level::Error));
    }

    #[test]
    fn scenario_network_error_logs_once_and_keeps_base_layer() {
        let source = ScriptedSource::fail("connection refused");

        let (map, logs) = capture_logs(|| tokio_test::block_on(bootstrapper(source).initialize()));

        let map = map.expect("initialized");
        assert_eq!(map.layers, vec![RecordedLayer::Tiles(TileLayerOptions::default())]);

        let errors: Vec<_> = logs
            .iter()
            .filter(|(level, _)| *level == Level::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].1.starts_with("Error loading heatmap:"));
        assert!(errors[0].1.contains("connection refused"));
    }

    #[test]
    fn non_json_body_logs_once_and_keeps_base_layer() {
        let source = ScriptedSource::body("<h1>500 Internal Server Error</h1>");

        let (map, logs) = capture_logs(|| tokio_test::block_on(bootstrapper(source).initialize()));

        let map = map.expect("initialized");
        assert_eq!(map.layers.len(), 1);
        assert_eq!(
            logs.iter()
                .filter(|(level, _)| *level == Level::Error)
                .count(),
            1
        );
    }

    #[test]
    fn heat_layer_goes_on_top_of_tiles() {
        let source = ScriptedSource::body(
            r#"[{"latitude":1.0,"longitude":2.0,"intensity":0.3},{"latitude":3.0,"longitude":4.0}]"#,
        );

        let map = tokio_test::block_on(bootstrapper(source).initialize()).expect("initialized");

        assert_matches!(map.layers[0], RecordedLayer::Tiles(_));
        assert_matches!(
            &map.layers[1],
            RecordedLayer::Heat { points, options }
                if points == &vec![[1.0, 2.0, 0.3], [3.0, 4.0, 0.5]]
                    && options == &HeatLayerOptions::default()
        );
    }

    #[test]
    fn fetches_exactly_once() {
        let mut bootstrapper = bootstrapper(ScriptedSource::body("[]"));

        let mut map = bootstrapper.create_base_map().expect("map is created");
        let added = tokio_test::block_on(bootstrapper.load_heat_layer(&mut map));

        assert_matches!(added, Ok(true));
        assert_eq!(bootstrapper.source().calls(), 1);
    }

    #[test]
    fn failed_load_reports_no_layer() {
        let mut bootstrapper = bootstrapper(ScriptedSource::fail("timed out"));

        let mut map = bootstrapper.create_base_map().expect("map is created");
        let (added, _) =
            capture_logs(|| tokio_test::block_on(bootstrapper.load_heat_layer(&mut map)));

        assert_matches!(added, Ok(false));
        assert_eq!(map.layers.len(), 1);
    }

    #[test]
    fn uses_configured_view_and_layers() {
        let config = HeatmapConfig::default()
            .with_container_id("crime-map")
            .with_view(MapViewOptions::default().with_center(51.5, -0.12).with_zoom(11))
            .with_heat(HeatLayerOptions::default().with_radius(10.0));
        let source = ScriptedSource::body(r#"[{"latitude":51.5,"longitude":-0.12}]"#);

        let map = tokio_test::block_on(bootstrapper(source).with_config(config).initialize())
            .expect("initialized");

        assert_eq!(map.container_id, "crime-map");
        assert_eq!(map.view.zoom, 11);
        assert_matches!(
            &map.layers[1],
            RecordedLayer::Heat { options, .. } if options.radius == 10.0
        );
    }

    #[test]
    fn backend_errors_are_returned() {
        let backend = RecordingBackend {
            reject_heat_layer: true,
        };
        let bootstrapper = Bootstrapper::new(backend, ScriptedSource::body("[]"));

        let result = tokio_test::block_on(bootstrapper.initialize());

        assert_matches!(result, Err(HeatmapError::Backend(_)));
    }

    #[test]
    fn source_follows_configured_endpoint() {
        let config: HeatmapConfig =
            serde_json::from_str(r#"{"endpoint": "http://localhost:8080/points"}"#)
                .expect("valid config");

        let bootstrapper = Bootstrapper::from_config(RecordingBackend::default(), config);

        assert_eq!(bootstrapper.source().endpoint(), "http://localhost:8080/points");
        assert_eq!(bootstrapper.config().endpoint, "http://localhost:8080/points");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn relative_endpoint_without_base_is_a_load_failure() {
        let (map, logs) = capture_logs(|| {
            tokio_test::block_on(initialize(
                RecordingBackend::default(),
                "map",
                "/get-heatmap-data",
            ))
        });

        let map = map.expect("initialized");
        assert_eq!(map.layers.len(), 1);
        assert_eq!(
            logs.iter()
                .filter(|(level, _)| *level == Level::Error)
                .count(),
            1
        );
    }
}
