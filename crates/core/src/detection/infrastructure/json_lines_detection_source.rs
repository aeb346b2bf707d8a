use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::detection::domain::detection::DetectionFrame;
use crate::detection::domain::detection_source::{DetectionSource, DetectionSourceError};

/// Reads detection frames recorded as JSON Lines, one frame per line.
///
/// Blank lines are skipped. Line numbers in parse errors are 1-based and
/// count blank lines, so they match what an editor shows.
pub struct JsonLinesDetectionSource {
    reader: Box<dyn BufRead + Send>,
    line_number: usize,
    buf: String,
}

impl JsonLinesDetectionSource {
    pub fn new(reader: Box<dyn BufRead + Send>) -> Self {
        Self {
            reader,
            line_number: 0,
            buf: String::new(),
        }
    }

    pub fn open(path: &Path) -> Result<Self, DetectionSourceError> {
        let file = File::open(path)?;
        Ok(Self::new(Box::new(BufReader::new(file))))
    }
}

impl DetectionSource for JsonLinesDetectionSource {
    fn next_frame(&mut self) -> Result<Option<DetectionFrame>, DetectionSourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            return serde_json::from_str(line)
                .map(Some)
                .map_err(|source| DetectionSourceError::Parse {
                    line: self.line_number,
                    source,
                });
        }
    }
}
