//! Shape detection stages
//!
//! This module turns raw ink into the canonical silhouette, extracts its
//! boundary, and counts the corners of its simplified outline.

mod contour;
pub mod corners;
pub mod edges;
pub mod normalize;

pub use contour::polygon_area;
pub use corners::{corner_penalty, PolygonCornerCounter};
pub use edges::{ContourExtractor, EdgeSet};
pub use normalize::RasterNormalizer;
