pub mod availability;
pub mod geometry;

pub use availability::{is_working_day, working_window, WorkingWindow};
pub use geometry::{block_geometry, fits_window, BlockGeometry, GridDimensions};
