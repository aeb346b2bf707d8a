use thiserror::Error;

use crate::detection::domain::detection::DetectionFrame;
use crate::detection::domain::detection_source::{DetectionSource, DetectionSourceError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThrottleError {
    #[error("min_interval must be a non-negative number of seconds, got {0}")]
    InvalidInterval(f64),
}

/// Decorator that rate-limits an upstream source by frame timestamp.
///
/// A frame captured less than `min_interval` seconds after the last
/// accepted frame is dropped, the same way a busy capture queue discards
/// late frames. The first frame is always accepted, and so is a frame
/// whose timestamp runs backwards: that is treated as a clock reset and
/// becomes the new reference point.
pub struct ThrottledDetectionSource {
    inner: Box<dyn DetectionSource>,
    min_interval: f64,
    last_accepted: Option<f64>,
    dropped: usize,
}

impl ThrottledDetectionSource {
    pub fn new(inner: Box<dyn DetectionSource>, min_interval: f64) -> Result<Self, ThrottleError> {
        if !min_interval.is_finite() || min_interval < 0.0 {
            return Err(ThrottleError::InvalidInterval(min_interval));
        }
        Ok(Self {
            inner,
            min_interval,
            last_accepted: None,
            dropped: 0,
        })
    }

    /// Number of frames dropped so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn accepts(&self, timestamp: f64) -> bool {
        match self.last_accepted {
            None => true,
            Some(last) if timestamp < last => true,
            Some(last) => timestamp - last >= self.min_interval,
        }
    }
}

impl DetectionSource for ThrottledDetectionSource {
    fn next_frame(&mut self) -> Result<Option<DetectionFrame>, DetectionSourceError> {
        while let Some(frame) = self.inner.next_frame()? {
            if self.accepts(frame.timestamp) {
                self.last_accepted = Some(frame.timestamp);
                return Ok(Some(frame));
            }
            self.dropped += 1;
            log::debug!(
                "Dropping frame {} at {:.3}s (throttle {:.3}s)",
                frame.index,
                frame.timestamp,
                self.min_interval
            );
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::infrastructure::replay_detection_source::ReplayDetectionSource;

    fn frames_at(timestamps: &[f64]) -> Box<dyn DetectionSource> {
        Box::new(ReplayDetectionSource::new(
            timestamps
                .iter()
                .enumerate()
                .map(|(i, &t)| DetectionFrame::new(i, t, 1080.0, vec![]))
                .collect(),
        ))
    }

    fn accepted_indices(src: &mut ThrottledDetectionSource) -> Vec<usize> {
        let mut out = Vec::new();
        while let Some(frame) = src.next_frame().unwrap() {
            out.push(frame.index);
        }
        out
    }

    #[test]
    fn test_zero_interval_accepts_everything() {
        let mut src = ThrottledDetectionSource::new(frames_at(&[0.0, 0.0, 0.01]), 0.0).unwrap();
        assert_eq!(accepted_indices(&mut src), vec![0, 1, 2]);
        assert_eq!(src.dropped(), 0);
    }

    #[test]
    fn test_drops_frames_inside_interval() {
        // 8 fps capture throttled to one frame every 0.5s
        let ts: Vec<f64> = (0..10).map(|i| i as f64 * 0.125).collect();
        let mut src = ThrottledDetectionSource::new(frames_at(&ts), 0.5).unwrap();
        let accepted = accepted_indices(&mut src);
        assert_eq!(accepted, vec![0, 4, 8]);
        assert_eq!(src.dropped(), 7);
    }

    #[test]
    fn test_frame_exactly_at_interval_is_accepted() {
        let mut src = ThrottledDetectionSource::new(frames_at(&[0.0, 0.5, 1.0]), 0.5).unwrap();
        assert_eq!(accepted_indices(&mut src), vec![0, 1, 2]);
    }

    #[test]
    fn test_zero_interval_accepts_out_of_order_timestamps() {
        let mut src = ThrottledDetectionSource::new(frames_at(&[5.0, 1.0, 2.0]), 0.0).unwrap();
        assert_eq!(accepted_indices(&mut src), vec![0, 1, 2]);
        assert_eq!(src.dropped(), 0);
    }

    #[test]
    fn test_clock_reset_reanchors_throttle() {
        // Clock jumps back from 10.0 to 0.0; throttling resumes from the new origin.
        let mut src =
            ThrottledDetectionSource::new(frames_at(&[10.0, 0.0, 0.25, 0.5, 1.0]), 0.5).unwrap();
        assert_eq!(accepted_indices(&mut src), vec![0, 1, 3, 4]);
        assert_eq!(src.dropped(), 1);
    }

    #[test]
    fn test_all_trailing_frames_dropped_ends_stream() {
        let mut src = ThrottledDetectionSource::new(frames_at(&[0.0, 0.1, 0.2]), 1.0).unwrap();
        assert_eq!(accepted_indices(&mut src), vec![0]);
        assert!(src.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_invalid_interval_errors() {
        assert!(ThrottledDetectionSource::new(frames_at(&[]), -0.1).is_err());
        assert!(ThrottledDetectionSource::new(frames_at(&[]), f64::NAN).is_err());
    }
}
