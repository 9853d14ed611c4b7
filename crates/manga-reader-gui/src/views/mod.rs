pub mod viewer;

pub use viewer::{paint_overlay, paint_pages, paint_selection, paint_status};
