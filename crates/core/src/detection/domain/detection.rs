use serde::{Deserialize, Serialize};

use crate::shared::geometry::Rect;

/// One face observation from the external detector, in sensor coordinates.
///
/// `tracking_id` stays the same across consecutive frames for as long as
/// the detector keeps tracking the same face.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub tracking_id: i32,
    pub bounds: Rect,
}

impl Detection {
    pub fn new(tracking_id: i32, bounds: Rect) -> Self {
        Self {
            tracking_id,
            bounds,
        }
    }
}

/// Everything the detector reports for one captured frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionFrame {
    #[serde(default)]
    pub index: usize,
    /// Capture time in seconds, used for throttling.
    #[serde(default)]
    pub timestamp: f64,
    /// Height of the source image; the display width divided by this gives
    /// the sensor → display scale ratio.
    pub image_height: f64,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

impl DetectionFrame {
    pub fn new(
        index: usize,
        timestamp: f64,
        image_height: f64,
        detections: Vec<Detection>,
    ) -> Self {
        Self {
            index,
            timestamp,
            image_height,
            detections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_deserialize_with_defaults() {
        let frame: DetectionFrame = serde_json::from_str(r#"{"image_height": 1080.0}"#).unwrap();
        assert_eq!(frame.index, 0);
        assert_relative_eq!(frame.timestamp, 0.0);
        assert_relative_eq!(frame.image_height, 1080.0);
        assert!(frame.detections.is_empty());
    }

    #[test]
    fn test_deserialize_detections() {
        let json = r#"{
            "index": 3,
            "timestamp": 0.1,
            "image_height": 720.0,
            "detections": [
                {"tracking_id": 7, "bounds": {"x": 1.0, "y": 2.0, "width": 30.0, "height": 40.0}}
            ]
        }"#;
        let frame: DetectionFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.index, 3);
        assert_eq!(
            frame.detections,
            vec![Detection::new(7, Rect::new(1.0, 2.0, 30.0, 40.0))]
        );
    }
}
