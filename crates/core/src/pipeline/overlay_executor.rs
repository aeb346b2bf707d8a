use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::detection::domain::detection::DetectionFrame;
use crate::detection::domain::detection_source::DetectionSource;
use crate::detection::domain::face_area::{adapt_frame, scale_ratio, FaceArea, FrameError};
use crate::overlay::domain::drawing_surface::DrawingSurface;
use crate::overlay::domain::overlay_reconciler::{OverlayReconciler, ReconcilePlan};
use crate::pipeline::pipeline_logger::PipelineLogger;

/// Progress callback: receives the number of frames handled so far and
/// returns `false` to stop the run.
pub type ProgressFn = Box<dyn Fn(usize) -> bool + Send>;

/// Configuration for one executor run.
pub struct ExecutorConfig {
    /// Display width used to derive each frame's scale ratio.
    pub view_width: f64,
    pub cancelled: Arc<AtomicBool>,
    pub on_progress: Option<ProgressFn>,
}

impl ExecutorConfig {
    pub fn new(view_width: f64) -> Self {
        Self {
            view_width,
            cancelled: Arc::new(AtomicBool::new(false)),
            on_progress: None,
        }
    }

    pub fn with_progress(mut self, on_progress: ProgressFn) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Returns `false` when the callback asks to stop.
    pub(crate) fn report_progress(&self, handled: usize) -> bool {
        match self.on_progress {
            Some(ref callback) => callback(handled),
            None => true,
        }
    }
}

/// Totals for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_processed: usize,
    pub frames_rejected: usize,
    pub markers_added: usize,
    pub markers_moved: usize,
    pub markers_removed: usize,
    /// Markers still on screen when the run ended.
    pub markers_on_screen: usize,
}

impl RunSummary {
    fn record(&mut self, plan: &ReconcilePlan) {
        self.frames_processed += 1;
        self.markers_added += plan.to_add.len();
        self.markers_moved += plan.to_move.len();
        self.markers_removed += plan.to_remove.len();
    }

    pub fn frames_seen(&self) -> usize {
        self.frames_processed + self.frames_rejected
    }
}

/// Port for driving detection frames through the reconciler.
///
/// Implementations decide where detection runs; reconciliation and every
/// surface call always happen on the caller's thread.
pub trait OverlayExecutor: Send {
    fn execute(
        &self,
        source: Box<dyn DetectionSource>,
        reconciler: &mut OverlayReconciler,
        surface: &mut dyn DrawingSurface,
        config: &ExecutorConfig,
        logger: &mut dyn PipelineLogger,
    ) -> Result<RunSummary, Box<dyn std::error::Error>>;
}

/// Detection-side half of a frame: derive the ratio and map into display space.
pub(crate) fn adapt_detection_frame(
    frame: &DetectionFrame,
    view_width: f64,
) -> Result<Vec<FaceArea>, FrameError> {
    let ratio = scale_ratio(view_width, frame.image_height)?;
    adapt_frame(&frame.detections, ratio)
}

/// UI-side half of a frame: reconcile, or keep the previous markers if the
/// frame was rejected.
pub(crate) fn apply_frame(
    index: usize,
    faces: Result<Vec<FaceArea>, FrameError>,
    reconciler: &mut OverlayReconciler,
    surface: &mut dyn DrawingSurface,
    logger: &mut dyn PipelineLogger,
    summary: &mut RunSummary,
) {
    match faces {
        Ok(areas) => {
            let start = Instant::now();
            let plan = reconciler.reconcile(&areas, surface);
            logger.timing("reconcile", start.elapsed().as_secs_f64() * 1000.0);
            logger.metric("faces", areas.len() as f64);
            logger.metric("markers_added", plan.to_add.len() as f64);
            logger.metric("markers_removed", plan.to_remove.len() as f64);
            summary.record(&plan);
        }
        Err(e) => {
            log::warn!("Skipping frame {index}: {e}");
            logger.metric("frames_rejected", 1.0);
            summary.frames_rejected += 1;
        }
    }
    logger.frame(index);
}
