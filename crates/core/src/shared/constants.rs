/// Duration of the linear move animation between two marker positions, in seconds.
pub const MOVE_ANIMATION_DURATION: f64 = 0.3;

/// Portrait display width (points) used when no view width is configured.
pub const DEFAULT_VIEW_WIDTH: f64 = 375.0;

/// Marker fill: translucent red.
pub const DEFAULT_MARKER_RGBA: [f32; 4] = [0.78, 0.13, 0.16, 0.5];

/// Capacity of the detection → UI channel. One in flight, so the worker
/// blocks while the previous frame is still being reconciled.
pub const DETECTION_CHANNEL_CAPACITY: usize = 1;
