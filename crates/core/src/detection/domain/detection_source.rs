use thiserror::Error;

use crate::detection::domain::detection::DetectionFrame;

#[derive(Error, Debug)]
pub enum DetectionSourceError {
    #[error("failed to read detections: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed detection frame on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Inbound port: the capture/detection collaborator.
///
/// Yields one [`DetectionFrame`] per captured frame, in capture order.
/// `Ok(None)` ends the stream. `Send` so the source can be moved onto a
/// dedicated detection thread.
pub trait DetectionSource: Send {
    fn next_frame(&mut self) -> Result<Option<DetectionFrame>, DetectionSourceError>;
}
