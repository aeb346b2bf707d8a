use serde::{Deserialize, Serialize};

use crate::shared::constants::DEFAULT_MARKER_RGBA;

/// Straight-alpha RGBA colour with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_valid(&self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }
}

impl Default for Rgba {
    fn default() -> Self {
        let [r, g, b, a] = DEFAULT_MARKER_RGBA;
        Self::new(r, g, b, a)
    }
}
