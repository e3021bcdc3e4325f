//! Detail scores against cached template artifacts
//!
//! Coverage measures how much of the submission's boundary lands on the
//! dilated template. Chamfer similarity measures how far the two
//! boundaries are from each other in the worse direction.

pub mod chamfer;
pub mod coverage;

pub use chamfer::{ChamferScorer, DistanceMap};
pub use coverage::{dilate, CoverageScorer, DilatedMask};

/// Clamp a score into `[0, 1]`; NaN becomes 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
