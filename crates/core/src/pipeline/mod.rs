pub mod infrastructure;
pub mod overlay_executor;
pub mod pipeline_logger;
pub mod track_faces_use_case;
