use thiserror::Error;

use crate::detection::domain::detection::Detection;
use crate::shared::geometry::Rect;

/// Why a frame was rejected before reconciliation.
///
/// Rejection is never fatal: the caller skips the frame and the markers from
/// the previous frame stay on screen.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("scale ratio must be a positive finite number, got {0}")]
    InvalidRatio(f64),
    #[error("source image height must be a positive finite number, got {0}")]
    InvalidImageHeight(f64),
    #[error("detection {tracking_id} has a non-finite or negative-sized bounding box")]
    InvalidBounds { tracking_id: i32 },
}

/// A detection mapped into display coordinates.
///
/// The sensor is mounted rotated 90° relative to the portrait display, so
/// the axes are swapped and then uniformly scaled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceArea {
    tracking_id: i32,
    bounds: Rect,
}

impl FaceArea {
    pub fn from_detection(detection: &Detection, ratio: f64) -> Self {
        let src = &detection.bounds;
        Self {
            tracking_id: detection.tracking_id,
            bounds: Rect::new(
                src.y * ratio,
                src.x * ratio,
                src.height * ratio,
                src.width * ratio,
            ),
        }
    }

    pub fn tracking_id(&self) -> i32 {
        self.tracking_id
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }
}

/// Sensor → display scale: display width over source image height.
pub fn scale_ratio(view_width: f64, image_height: f64) -> Result<f64, FrameError> {
    if !image_height.is_finite() || image_height <= 0.0 {
        return Err(FrameError::InvalidImageHeight(image_height));
    }
    let ratio = view_width / image_height;
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(FrameError::InvalidRatio(ratio));
    }
    Ok(ratio)
}

/// Validates a whole frame and maps every detection into display space.
///
/// One malformed detection rejects the frame, so a partially adapted frame
/// never reaches the reconciler. Rectangles are checked both before and
/// after scaling, since a finite box can overflow once multiplied.
pub fn adapt_frame(detections: &[Detection], ratio: f64) -> Result<Vec<FaceArea>, FrameError> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(FrameError::InvalidRatio(ratio));
    }
    detections
        .iter()
        .map(|d| {
            let area = FaceArea::from_detection(d, ratio);
            if d.bounds.is_well_formed() && area.bounds.is_well_formed() {
                Ok(area)
            } else {
                Err(FrameError::InvalidBounds {
                    tracking_id: d.tracking_id,
                })
            }
        })
        .collect()
}
