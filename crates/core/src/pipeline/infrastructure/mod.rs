pub mod sequential_overlay_executor;
pub mod threaded_overlay_executor;
