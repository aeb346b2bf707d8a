use std::time::Instant;

use crate::detection::domain::detection_source::DetectionSource;
use crate::overlay::domain::drawing_surface::DrawingSurface;
use crate::overlay::domain::overlay_reconciler::OverlayReconciler;
use crate::pipeline::overlay_executor::{
    adapt_detection_frame, apply_frame, ExecutorConfig, OverlayExecutor, RunSummary,
};
use crate::pipeline::pipeline_logger::PipelineLogger;

/// Pulls, adapts and reconciles every frame on the caller's thread.
#[derive(Debug, Default)]
pub struct SequentialOverlayExecutor;

impl SequentialOverlayExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl OverlayExecutor for SequentialOverlayExecutor {
    fn execute(
        &self,
        mut source: Box<dyn DetectionSource>,
        reconciler: &mut OverlayReconciler,
        surface: &mut dyn DrawingSurface,
        config: &ExecutorConfig,
        logger: &mut dyn PipelineLogger,
    ) -> Result<RunSummary, Box<dyn std::error::Error>> {
        let mut summary = RunSummary::default();

        loop {
            if config.is_cancelled() {
                break;
            }
            let Some(frame) = source.next_frame()? else {
                break;
            };

            let start = Instant::now();
            let faces = adapt_detection_frame(&frame, config.view_width);
            logger.timing("adapt", start.elapsed().as_secs_f64() * 1000.0);

            apply_frame(frame.index, faces, reconciler, surface, logger, &mut summary);

            if !config.report_progress(summary.frames_seen()) {
                log::info!("Stopped after {} frames", summary.frames_seen());
                break;
            }
        }

        summary.markers_on_screen = reconciler.len();
        Ok(summary)
    }
}
