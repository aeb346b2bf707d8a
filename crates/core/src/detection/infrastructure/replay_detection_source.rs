use std::collections::VecDeque;

use crate::detection::domain::detection::DetectionFrame;
use crate::detection::domain::detection_source::{DetectionSource, DetectionSourceError};

/// Replays a pre-recorded list of detection frames.
pub struct ReplayDetectionSource {
    frames: VecDeque<DetectionFrame>,
}

impl ReplayDetectionSource {
    pub fn new(frames: Vec<DetectionFrame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl DetectionSource for ReplayDetectionSource {
    fn next_frame(&mut self) -> Result<Option<DetectionFrame>, DetectionSourceError> {
        Ok(self.frames.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order_then_ends() {
        let mut src = ReplayDetectionSource::new(vec![
            DetectionFrame::new(0, 0.0, 1080.0, vec![]),
            DetectionFrame::new(1, 0.1, 1080.0, vec![]),
        ]);
        assert_eq!(src.remaining(), 2);
        assert_eq!(src.next_frame().unwrap().unwrap().index, 0);
        assert_eq!(src.next_frame().unwrap().unwrap().index, 1);
        assert!(src.next_frame().unwrap().is_none());
        assert_eq!(src.remaining(), 0);
    }

    #[test]
    fn test_empty_source() {
        let mut src = ReplayDetectionSource::new(vec![]);
        assert!(src.next_frame().unwrap().is_none());
    }
}
