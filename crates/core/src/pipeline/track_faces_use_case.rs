use crate::detection::domain::detection_source::DetectionSource;
use crate::overlay::domain::drawing_surface::DrawingSurface;
use crate::overlay::domain::overlay_reconciler::OverlayReconciler;
use crate::pipeline::overlay_executor::{ExecutorConfig, OverlayExecutor, RunSummary};
use crate::pipeline::pipeline_logger::PipelineLogger;

/// Drives a detection stream through the reconciler onto a surface.
///
/// The source is consumed by the first `execute`; the reconciler (and the
/// markers it holds) survives so callers can inspect the final state.
pub struct TrackFacesUseCase {
    source: Option<Box<dyn DetectionSource>>,
    reconciler: OverlayReconciler,
    executor: Box<dyn OverlayExecutor>,
    logger: Box<dyn PipelineLogger>,
    config: ExecutorConfig,
    clear_on_finish: bool,
}

impl TrackFacesUseCase {
    pub fn new(
        source: Box<dyn DetectionSource>,
        reconciler: OverlayReconciler,
        executor: Box<dyn OverlayExecutor>,
        logger: Box<dyn PipelineLogger>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            source: Some(source),
            reconciler,
            executor,
            logger,
            config,
            clear_on_finish: false,
        }
    }

    /// Remove every remaining marker from the surface once the stream ends.
    pub fn clear_on_finish(mut self, clear: bool) -> Self {
        self.clear_on_finish = clear;
        self
    }

    pub fn reconciler(&self) -> &OverlayReconciler {
        &self.reconciler
    }

    pub fn execute(
        &mut self,
        surface: &mut dyn DrawingSurface,
    ) -> Result<RunSummary, Box<dyn std::error::Error>> {
        let source = self
            .source
            .take()
            .ok_or("Detection source already consumed")?;

        let summary = self.executor.execute(
            source,
            &mut self.reconciler,
            surface,
            &self.config,
            self.logger.as_mut(),
        )?;

        if self.clear_on_finish {
            self.reconciler.clear(surface);
        }

        self.logger.info(&format!(
            "Processed {} frames ({} rejected): +{} ~{} -{} markers, {} on screen at end",
            summary.frames_processed,
            summary.frames_rejected,
            summary.markers_added,
            summary.markers_moved,
            summary.markers_removed,
            summary.markers_on_screen
        ));
        self.logger.summary();
        Ok(summary)
    }
}
