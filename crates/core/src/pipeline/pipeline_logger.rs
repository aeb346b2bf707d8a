use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for overlay pipeline events.
///
/// Lets the CLI aggregate stage timings and per-frame metrics while tests
/// stay silent, without the executors knowing which one they talk to.
pub trait PipelineLogger: Send {
    /// Called once per reconciled or rejected frame.
    fn frame(&mut self, index: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a per-frame metric (faces detected, markers added, ...).
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-run report. Default: no-op.
    fn summary(&self) {}
}

/// Discards everything.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn frame(&mut self, _index: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Stat {
    count: usize,
    total: f64,
    max: f64,
}

impl Stat {
    fn push(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
        self.max = if self.count == 1 {
            value
        } else {
            self.max.max(value)
        };
    }

    fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Aggregates timings and metrics and reports through the `log` crate.
///
/// Frame progress is logged every `throttle_frames` frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    frames: usize,
    timings: BTreeMap<String, Stat>,
    metrics: BTreeMap<String, Stat>,
    start_time: Instant,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            frames: 0,
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            start_time: Instant::now(),
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// `(count, average)` for a stage, if any timing was recorded.
    pub fn timing_stats(&self, stage: &str) -> Option<(usize, f64)> {
        self.timings.get(stage).map(|s| (s.count, s.avg()))
    }

    /// `(count, average, max)` for a metric, if any value was recorded.
    pub fn metric_stats(&self, name: &str) -> Option<(usize, f64, f64)> {
        self.metrics.get(name).map(|s| (s.count, s.avg(), s.max))
    }

    /// Formatted report, or `None` when nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.frames == 0 && self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Overlay summary ({} frames, {elapsed_s:.1}s):",
            self.frames
        )];

        for (stage, stat) in &self.timings {
            lines.push(format!(
                "  {stage:12}: avg {:7.3}ms  total {:8.1}ms",
                stat.avg(),
                stat.total
            ));
        }
        for (name, stat) in &self.metrics {
            lines.push(format!(
                "  {name}: avg {:.1}  max {:.0}  total {:.0}",
                stat.avg(),
                stat.max,
                stat.total
            ));
        }
        Some(lines.join("\n"))
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(30)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn frame(&mut self, index: usize) {
        self.frames += 1;
        if self.frames % self.throttle_frames == 0 {
            log::info!("Reconciled {} frames (last index {index})", self.frames);
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.frame(0);
        logger.timing("reconcile", 0.2);
        logger.metric("faces", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_frame_counts() {
        let mut logger = StdoutPipelineLogger::new(2);
        for i in 0..5 {
            logger.frame(i);
        }
        assert_eq!(logger.frames(), 5);
    }

    #[test]
    fn test_timing_stats() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("reconcile", 1.0);
        logger.timing("reconcile", 3.0);

        let (count, avg) = logger.timing_stats("reconcile").unwrap();
        assert_eq!(count, 2);
        assert_relative_eq!(avg, 2.0);
        assert!(logger.timing_stats("adapt").is_none());
    }

    #[test]
    fn test_metric_stats_track_max() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.metric("faces", 2.0);
        logger.metric("faces", 5.0);
        logger.metric("faces", 2.0);

        let (count, avg, max) = logger.metric_stats("faces").unwrap();
        assert_eq!(count, 3);
        assert_relative_eq!(avg, 3.0);
        assert_relative_eq!(max, 5.0);
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.frame(0);
        logger.timing("adapt", 0.1);
        logger.timing("reconcile", 0.2);
        logger.metric("markers_added", 1.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Overlay summary (1 frames"));
        assert!(summary.contains("adapt"));
        assert!(summary.contains("reconcile"));
        assert!(summary.contains("markers_added: avg 1.0"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(StdoutPipelineLogger::default().summary_string().is_none());
    }

    #[test]
    fn test_throttle_never_zero() {
        let logger = StdoutPipelineLogger::new(0);
        assert_eq!(logger.throttle_frames, 1);
    }
}
