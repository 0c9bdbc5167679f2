use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use async_trait::async_trait;
use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::backend::MapBackend;
use crate::config::{HeatLayerOptions, MapViewOptions, TileLayerOptions};
use crate::error::HeatmapError;
use crate::point::{decode_records, HeatPoint, PointRecord};
use crate::source::PointSource;

/// Map handle of [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingMap {
    pub container_id: String,
    pub view: MapViewOptions,
    pub layers: Vec<RecordedLayer>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedLayer {
    Tiles(TileLayerOptions),
    Heat {
        points: Vec<[f64; 3]>,
        options: HeatLayerOptions,
    },
}

/// Backend that records what was added to the map.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub reject_heat_layer: bool,
}

impl MapBackend for RecordingBackend {
    type Map = RecordingMap;

    fn create_map(
        &mut self,
        container_id: &str,
        view: &MapViewOptions,
    ) -> Result<Self::Map, HeatmapError> {
        Ok(RecordingMap {
            container_id: container_id.to_string(),
            view: view.clone(),
            layers: vec![],
        })
    }

    fn add_tile_layer(
        &mut self,
        map: &mut Self::Map,
        tiles: &TileLayerOptions,
    ) -> Result<(), HeatmapError> {
        map.layers.push(RecordedLayer::Tiles(tiles.clone()));
        Ok(())
    }

    fn add_heat_layer(
        &mut self,
        map: &mut Self::Map,
        points: Vec<HeatPoint>,
        options: &HeatLayerOptions,
    ) -> Result<(), HeatmapError> {
        if self.reject_heat_layer {
            return Err(HeatmapError::Backend("heat layers are not supported".into()));
        }

        map.layers.push(RecordedLayer::Heat {
            points: points.iter().map(HeatPoint::to_triple).collect(),
            options: options.clone(),
        });
        Ok(())
    }
}

enum Script {
    Body(&'static str),
    Fail(&'static str),
}

/// Source returning a fixed response body or a fixed network error.
pub struct ScriptedSource {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn body(body: &'static str) -> Self {
        Self {
            script: Script::Body(body),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail(message: &'static str) -> Self {
        Self {
            script: Script::Fail(message),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PointSource for ScriptedSource {
    async fn load_points(&self) -> Result<Vec<PointRecord>, HeatmapError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match self.script {
            Script::Body(body) => decode_records(body.as_bytes()),
            Script::Fail(message) => Err(HeatmapError::Fetch(message.to_string())),
        }
    }
}

thread_local! {
    static CAPTURED: RefCell<Option<Vec<(Level, String)>>> = const { RefCell::new(None) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.with(|captured| {
            if let Some(entries) = captured.borrow_mut().as_mut() {
                entries.push((record.level(), record.args().to_string()));
            }
        });
    }

    fn flush(&self) {}
}

/// Runs `f` and returns its result with the log entries it wrote on the current thread.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<(Level, String)>) {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        log::set_logger(&CaptureLogger).expect("no other logger is installed in unit tests");
        log::set_max_level(LevelFilter::Trace);
    });

    CAPTURED.with(|captured| *captured.borrow_mut() = Some(vec![]));
    let result = f();
    let entries = CAPTURED
        .with(|captured| captured.borrow_mut().take())
        .unwrap_or_default();

    (result, entries)
}
