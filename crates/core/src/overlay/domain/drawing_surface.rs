use serde::{Deserialize, Serialize};

use crate::shared::color::Rgba;
use crate::shared::geometry::Point;

/// Handle to a drawable owned by a [`DrawingSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawableId(pub u64);

/// Filled circle, positioned by its centre.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircleShape {
    pub radius: f64,
    pub fill: Rgba,
}

/// Timing curve for position animations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
}

/// Outbound port: whatever renders the overlay.
///
/// Calls arrive from a single thread (the one that owns the UI), so
/// implementations need not be `Send` or synchronized.
pub trait DrawingSurface {
    /// Attaches a new circle centred at `position`.
    fn add_drawable(&mut self, shape: &CircleShape, position: Point) -> DrawableId;

    /// Moves a drawable from `from` to `to` over `duration` seconds.
    ///
    /// The animation is cosmetic: the drawable's resting position is `to`
    /// as soon as this returns.
    fn animate_drawable_position(
        &mut self,
        drawable: DrawableId,
        from: Point,
        to: Point,
        duration: f64,
        easing: Easing,
    );

    fn remove_drawable(&mut self, drawable: DrawableId);
}
