pub mod json_lines_surface;
pub mod recording_surface;
