use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::color::Rgba;
use crate::shared::constants::{DEFAULT_VIEW_WIDTH, MOVE_ANIMATION_DURATION};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for one overlay session.
///
/// Every field has a default, so a config file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Display width in points; divided by the source image height to get
    /// the sensor → display scale ratio.
    pub view_width: f64,
    pub marker_color: Rgba,
    /// Seconds a marker takes to glide to its new position.
    pub move_duration: f64,
    /// Minimum seconds between accepted detection frames. `0` disables throttling.
    pub min_frame_interval: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            view_width: DEFAULT_VIEW_WIDTH,
            marker_color: Rgba::default(),
            move_duration: MOVE_ANIMATION_DURATION,
            min_frame_interval: 0.0,
        }
    }
}

impl OverlayConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: OverlayConfig =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.view_width.is_finite() || self.view_width <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "view_width must be a positive number, got {}",
                self.view_width
            )));
        }
        if !self.move_duration.is_finite() || self.move_duration < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "move_duration must be a non-negative number, got {}",
                self.move_duration
            )));
        }
        if !self.min_frame_interval.is_finite() || self.min_frame_interval < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_frame_interval must be a non-negative number, got {}",
                self.min_frame_interval
            )));
        }
        if !self.marker_color.is_valid() {
            return Err(ConfigError::Invalid(
                "marker_color components must be within 0.0-1.0".into(),
            ));
        }
        Ok(())
    }
}
