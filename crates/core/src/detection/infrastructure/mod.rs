pub mod json_lines_detection_source;
pub mod replay_detection_source;
pub mod throttled_detection_source;
