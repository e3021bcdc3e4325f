//! Raster primitives
//!
//! Points and strokes as captured, boolean ink rasters, and the conversions
//! that turn strokes or decoded images into rasters.

pub mod draw;
pub mod types;

pub use draw::{ink_mask, rasterize_strokes, shrink_to_max_side};
pub use types::{BinaryRaster, Point2D, Silhouette, StrokeInput};
