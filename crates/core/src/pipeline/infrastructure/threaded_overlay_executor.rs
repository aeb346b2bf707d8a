use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crate::detection::domain::detection_source::{DetectionSource, DetectionSourceError};
use crate::detection::domain::face_area::{FaceArea, FrameError};
use crate::overlay::domain::drawing_surface::DrawingSurface;
use crate::overlay::domain::overlay_reconciler::OverlayReconciler;
use crate::pipeline::overlay_executor::{
    adapt_detection_frame, apply_frame, ExecutorConfig, OverlayExecutor, RunSummary,
};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::constants::DETECTION_CHANNEL_CAPACITY;

/// A frame after the detection thread is done with it.
struct AdaptedFrame {
    index: usize,
    faces: Result<Vec<FaceArea>, FrameError>,
    adapt_ms: f64,
}

/// Runs detection on one dedicated worker and reconciliation on the
/// caller's thread.
///
/// Layout: `source → [detect thread: adapt] → caller [reconcile → surface]`
///
/// The channel between them is bounded, so the worker waits while the
/// previous frame is still being reconciled instead of queueing stale ones.
pub struct ThreadedOverlayExecutor {
    channel_capacity: usize,
}

impl ThreadedOverlayExecutor {
    pub fn new() -> Self {
        Self {
            channel_capacity: DETECTION_CHANNEL_CAPACITY,
        }
    }

    pub fn with_channel_capacity(channel_capacity: usize) -> Self {
        Self {
            channel_capacity: channel_capacity.max(1),
        }
    }
}

impl Default for ThreadedOverlayExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayExecutor for ThreadedOverlayExecutor {
    fn execute(
        &self,
        source: Box<dyn DetectionSource>,
        reconciler: &mut OverlayReconciler,
        surface: &mut dyn DrawingSurface,
        config: &ExecutorConfig,
        logger: &mut dyn PipelineLogger,
    ) -> Result<RunSummary, Box<dyn std::error::Error>> {
        let (adapted_tx, adapted_rx) =
            crossbeam_channel::bounded::<AdaptedFrame>(self.channel_capacity);
        let detect_handle = spawn_detector(
            source,
            adapted_tx,
            config.view_width,
            config.cancelled.clone(),
        );

        let mut summary = RunSummary::default();
        for adapted in adapted_rx.iter() {
            if config.is_cancelled() {
                break;
            }
            logger.timing("adapt", adapted.adapt_ms);
            apply_frame(
                adapted.index,
                adapted.faces,
                reconciler,
                surface,
                logger,
                &mut summary,
            );
            if !config.report_progress(summary.frames_seen()) {
                log::info!("Stopped after {} frames", summary.frames_seen());
                break;
            }
        }
        // Unblocks a worker waiting on a full channel.
        drop(adapted_rx);

        summary.markers_on_screen = reconciler.len();
        join_detector(detect_handle)?;
        Ok(summary)
    }
}

fn spawn_detector(
    mut source: Box<dyn DetectionSource>,
    adapted_tx: crossbeam_channel::Sender<AdaptedFrame>,
    view_width: f64,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<Result<(), DetectionSourceError>> {
    std::thread::spawn(move || {
        loop {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let Some(frame) = source.next_frame()? else {
                break;
            };
            let start = Instant::now();
            let faces = adapt_detection_frame(&frame, view_width);
            let adapted = AdaptedFrame {
                index: frame.index,
                faces,
                adapt_ms: start.elapsed().as_secs_f64() * 1000.0,
            };
            if adapted_tx.send(adapted).is_err() {
                break;
            }
        }
        Ok(())
    })
}

fn join_detector(
    handle: JoinHandle<Result<(), DetectionSourceError>>,
) -> Result<(), Box<dyn std::error::Error>> {
    match handle.join() {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err("Detection thread panicked".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detection::{Detection, DetectionFrame};
    use crate::detection::infrastructure::replay_detection_source::ReplayDetectionSource;
    use crate::overlay::infrastructure::recording_surface::RecordingSurface;
    use crate::pipeline::infrastructure::sequential_overlay_executor::SequentialOverlayExecutor;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::shared::geometry::Rect;
    use rstest::rstest;
    use std::sync::atomic::AtomicUsize;

    fn scripted_frames() -> Vec<DetectionFrame> {
        let tracks: Vec<Vec<(i32, f64)>> = vec![
            vec![(1, 0.0)],
            vec![(1, 4.0), (2, 100.0)],
            vec![(2, 104.0), (3, 200.0)],
            vec![],
            vec![(3, 210.0), (1, 8.0)],
        ];
        tracks
            .into_iter()
            .enumerate()
            .map(|(i, faces)| {
                DetectionFrame::new(
                    i,
                    i as f64 / 30.0,
                    720.0,
                    faces
                        .into_iter()
                        .map(|(id, x)| Detection::new(id, Rect::new(x, 50.0, 40.0, 40.0)))
                        .collect(),
                )
            })
            .collect()
    }

    fn run_with(
        executor: &dyn OverlayExecutor,
        frames: Vec<DetectionFrame>,
        config: &ExecutorConfig,
    ) -> Result<(RunSummary, RecordingSurface), Box<dyn std::error::Error>> {
        let mut reconciler = OverlayReconciler::default();
        let mut surface = RecordingSurface::new();
        let summary = executor.execute(
            Box::new(ReplayDetectionSource::new(frames)),
            &mut reconciler,
            &mut surface,
            config,
            &mut NullPipelineLogger,
        )?;
        Ok((summary, surface))
    }

    #[rstest]
    #[case(1)]
    #[case(4)]
    fn test_matches_sequential_command_stream(#[case] capacity: usize) {
        let config = ExecutorConfig::new(375.0);
        let (seq_summary, seq_surface) =
            run_with(&SequentialOverlayExecutor::new(), scripted_frames(), &config).unwrap();
        let (thr_summary, thr_surface) = run_with(
            &ThreadedOverlayExecutor::with_channel_capacity(capacity),
            scripted_frames(),
            &config,
        )
        .unwrap();

        assert_eq!(thr_summary, seq_summary);
        assert_eq!(thr_surface.commands(), seq_surface.commands());
    }

    #[test]
    fn test_summary_totals() {
        let (summary, surface) = run_with(
            &ThreadedOverlayExecutor::new(),
            scripted_frames(),
            &ExecutorConfig::new(375.0),
        )
        .unwrap();

        assert_eq!(summary.frames_processed, 5);
        // adds: 1 | 2 | 3 | - | 1,3
        assert_eq!(summary.markers_added, 5);
        // moves: - | 1 | 2 | - | -
        assert_eq!(summary.markers_moved, 2);
        // removes: - | - | 1 | 2,3 | -
        assert_eq!(summary.markers_removed, 3);
        assert_eq!(summary.markers_on_screen, 2);
        assert_eq!(surface.live_count(), 2);
    }

    #[test]
    fn test_stop_from_progress_joins_worker() {
        let frames: Vec<DetectionFrame> = (0..50)
            .map(|i| DetectionFrame::new(i, 0.0, 720.0, vec![]))
            .collect();
        let config = ExecutorConfig::new(375.0).with_progress(Box::new(|n| n < 2));

        let (summary, _) = run_with(&ThreadedOverlayExecutor::new(), frames, &config).unwrap();

        assert_eq!(summary.frames_seen(), 2);
    }

    struct CountingSource {
        pulls: Arc<AtomicUsize>,
    }

    impl DetectionSource for CountingSource {
        fn next_frame(&mut self) -> Result<Option<DetectionFrame>, DetectionSourceError> {
            self.pulls.fetch_add(1, Ordering::Relaxed);
            Ok(Some(DetectionFrame::new(0, 0.0, 720.0, vec![])))
        }
    }

    #[test]
    fn test_cancelled_worker_never_pulls_from_source() {
        let pulls = Arc::new(AtomicUsize::new(0));
        let config = ExecutorConfig::new(375.0);
        config.cancelled.store(true, Ordering::Relaxed);
        let mut reconciler = OverlayReconciler::default();
        let mut surface = RecordingSurface::new();

        let summary = ThreadedOverlayExecutor::new()
            .execute(
                Box::new(CountingSource { pulls: pulls.clone() }),
                &mut reconciler,
                &mut surface,
                &config,
                &mut NullPipelineLogger,
            )
            .unwrap();

        assert_eq!(pulls.load(Ordering::Relaxed), 0);
        assert_eq!(summary.frames_seen(), 0);
    }

    struct FailAfter {
        remaining: usize,
    }

    impl DetectionSource for FailAfter {
        fn next_frame(&mut self) -> Result<Option<DetectionFrame>, DetectionSourceError> {
            if self.remaining == 0 {
                return Err(
                    std::io::Error::new(std::io::ErrorKind::BrokenPipe, "capture stopped").into(),
                );
            }
            self.remaining -= 1;
            Ok(Some(DetectionFrame::new(0, 0.0, 720.0, vec![])))
        }
    }

    #[test]
    fn test_source_error_surfaces_after_join() {
        let mut reconciler = OverlayReconciler::default();
        let mut surface = RecordingSurface::new();
        let result = ThreadedOverlayExecutor::new().execute(
            Box::new(FailAfter { remaining: 3 }),
            &mut reconciler,
            &mut surface,
            &ExecutorConfig::new(375.0),
            &mut NullPipelineLogger,
        );
        assert!(result.unwrap_err().to_string().contains("capture stopped"));
    }
}
