use std::future::Future;
use std::time::Duration;

use futures::channel::oneshot;
use galileo_egui::{EguiMap, EguiMapState};
use heatmap::{fetch_heat_points, Bootstrapper, HeatPoint, PointSource};
use log::error;
use maybe_sync::{MaybeSend, MaybeSync};

use crate::backend::GalileoBackend;

/// How often the window is repainted while the points are being loaded.
const LOADING_REPAINT_INTERVAL: Duration = Duration::from_millis(200);

/// Window application showing a galileo map that gets its heat layer once the points arrive.
///
/// The points are requested once, when the application is created. Until they arrive the map
/// shows the base layers only. If they cannot be loaded, the error is logged and the map stays
/// as it is.
pub struct HeatmapApp<S> {
    map: EguiMapState,
    bootstrapper: Bootstrapper<GalileoBackend, S>,
    pending: Option<oneshot::Receiver<Option<Vec<HeatPoint>>>>,
}

impl<S> HeatmapApp<S>
where
    S: PointSource + Clone + MaybeSend + MaybeSync + 'static,
{
    /// Creates the application and starts loading the points in the background.
    ///
    /// `map` must be created with [`Bootstrapper::create_base_map`] of the given `bootstrapper`.
    pub fn new(map: EguiMapState, bootstrapper: Bootstrapper<GalileoBackend, S>) -> Self {
        let (sender, receiver) = oneshot::channel();
        let source = bootstrapper.source().clone();
        spawn(async move {
            let points = fetch_heat_points(&source).await;
            // The receiver is gone if the window was closed before the data arrived.
            let _ = sender.send(points);
        });

        Self {
            map,
            bootstrapper,
            pending: Some(receiver),
        }
    }

    /// Whether the points are still being loaded.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    fn poll_points(&mut self) {
        let Some(points) = take_loaded_points(&mut self.pending) else {
            return;
        };

        if let Err(err) = self
            .bootstrapper
            .add_heat_layer(self.map.map_mut(), points)
        {
            error!("Failed to add heat layer: {err}");
        }
        self.map.request_redraw();
    }
}

/// Returns the points once the loading task delivers them.
///
/// `pending` is cleared when the task is done: after the points are taken, after a failed load
/// (already logged by the task) and when the task is gone.
fn take_loaded_points(
    pending: &mut Option<oneshot::Receiver<Option<Vec<HeatPoint>>>>,
) -> Option<Vec<HeatPoint>> {
    let receiver = pending.as_mut()?;
    match receiver.try_recv() {
        Ok(None) => None,
        Ok(Some(points)) => {
            *pending = None;
            points
        }
        Err(oneshot::Canceled) => {
            *pending = None;
            None
        }
    }
}

impl<S> eframe::App for HeatmapApp<S>
where
    S: PointSource + Clone + MaybeSend + MaybeSync + 'static,
{
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_points();

        egui::CentralPanel::default().show(ctx, |ui| {
            EguiMap::new(&mut self.map).show_ui(ui);
        });

        if self.is_loading() {
            ctx.request_repaint_after(LOADING_REPAINT_INTERVAL);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn(future: impl Future<Output = ()> + Send + 'static) {
    tokio::spawn(future);
}

#[cfg(target_arch = "wasm32")]
fn spawn(future: impl Future<Output = ()> + 'static) {
    wasm_bindgen_futures::spawn_local(future);
}
