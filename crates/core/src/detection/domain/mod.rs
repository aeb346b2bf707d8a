pub mod detection;
pub mod detection_source;
pub mod face_area;
