use std::{
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::info;

use common::{
    config::PrinterSettings,
    misc::human_duration,
    slice::{SliceLayer, SliceResult},
};

use crate::{
    contour,
    error::SliceError,
    mesh::Mesh,
    plan,
    raster::{self, DirectSurfaceFactory, Projection, SurfaceFactory, LAYER_HEIGHT, LAYER_WIDTH},
    segments,
};

/// Slices one mesh into a full layer stack. Construction validates every
/// precondition, so a `Slicer` that exists can only fail on resource
/// exhaustion or image encoding.
pub struct Slicer {
    settings: PrinterSettings,
    mesh: Mesh,
    progress: Progress,
}

/// Shared handle for checking the progress of a slicing operation from
/// another thread.
#[derive(Clone)]
pub struct Progress {
    inner: Arc<ProgressInner>,
}

struct ProgressInner {
    completed: AtomicU32,
    total: u32,

    notify: Condvar,
    last_completed: Mutex<u32>,
}

impl Slicer {
    /// Creates a new slicer, failing fast on any precondition the settings
    /// or mesh violate. No layer work happens until [`Slicer::slice`].
    pub fn new(settings: PrinterSettings, mesh: Mesh) -> Result<Self, SliceError> {
        let total = plan::layer_count(&mesh, &settings)?;

        Ok(Self {
            settings,
            mesh,
            progress: Progress::new(total),
        })
    }

    pub fn progress(&self) -> Progress {
        self.progress.clone()
    }

    /// Slices with direct in-process surface allocation.
    pub fn slice(&self) -> Result<SliceResult, SliceError> {
        self.slice_with(&DirectSurfaceFactory)
    }

    /// Runs the slicing operation. Layers are independent, so they are
    /// rasterized in parallel; the result sequence is assembled in layer
    /// order regardless of completion order.
    pub fn slice_with<F: SurfaceFactory>(&self, surfaces: &F) -> Result<SliceResult, SliceError> {
        let start = Instant::now();

        let totals = plan::estimate(&self.mesh, &self.settings)?;
        let plans = plan::plan_layers(&self.mesh, &self.settings)?;
        let projection = Projection::new(&self.settings);

        info!("slicing {} layers", plans.len());

        let layers = plans
            .into_par_iter()
            .map(|layer| {
                let segments = segments::intersect_plane(&self.mesh, layer.z, &projection);
                let contours = contour::assemble(segments);

                let mut surface = surfaces.create_surface(LAYER_WIDTH, LAYER_HEIGHT)?;
                raster::rasterize(&mut surface, &contours);
                let image = raster::encode_png(&surface)?;

                self.progress.complete_one();

                Ok(SliceLayer {
                    number: layer.number,
                    z: layer.z,
                    image,
                    exposure_time: layer.exposure_time,
                    bottom: layer.bottom,
                })
            })
            .collect::<Result<Vec<_>, SliceError>>()?;

        self.progress.finish();
        info!(
            "sliced {} layers in {}",
            layers.len(),
            human_duration(start.elapsed())
        );

        Ok(SliceResult {
            total_layers: layers.len() as u32,
            layers,
            print_time: totals.print_time,
            total_exposure_time: totals.total_exposure_time,
            total_lift_time: totals.total_lift_time,
            resin_volume: totals.resin_volume,
            cost: totals.cost,
        })
    }
}

impl Progress {
    fn new(total: u32) -> Self {
        Self {
            inner: Arc::new(ProgressInner {
                completed: AtomicU32::new(0),
                total,

                notify: Condvar::new(),
                last_completed: Mutex::new(0),
            }),
        }
    }

    fn complete_one(&self) {
        self.inner.completed.fetch_add(1, Ordering::Relaxed);
        self.inner.notify.notify_all();
    }

    fn finish(&self) {
        self.inner
            .completed
            .store(self.inner.total, Ordering::Relaxed);
        self.inner.notify.notify_all();
    }

    /// Blocks until more layers have completed, returning the current
    /// count. Wakes periodically so callers never hang on the final
    /// notification.
    pub fn wait(&self) -> u32 {
        let mut last_completed = self.inner.last_completed.lock();
        self.inner
            .notify
            .wait_for(&mut last_completed, Duration::from_millis(100));

        let current = self.inner.completed.load(Ordering::Relaxed);
        if *last_completed < current {
            *last_completed = current;
        }

        current
    }

    /// Count of layers sliced so far.
    pub fn completed(&self) -> u32 {
        self.inner.completed.load(Ordering::Relaxed)
    }

    /// Count of layers in the operation.
    pub fn total(&self) -> u32 {
        self.inner.total
    }
}
