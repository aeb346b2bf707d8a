pub mod drawing_surface;
pub mod marker;
pub mod overlay_reconciler;
