//! Moment-based shape description and comparison

pub mod moments;
pub mod structure;

pub use moments::{MomentAnalyzer, MomentTable, MomentVector};
pub use structure::{compare_shapes, log_hu_distance, match_shapes_i1, StructureComparator};
