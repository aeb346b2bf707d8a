pub mod color;
pub mod constants;
pub mod geometry;
pub mod overlay_config;
