//! Reference values for drawing evaluation
//!
//! Defaults used by [`EvaluatorConfig`](crate::EvaluatorConfig). They reproduce
//! the tuning of the whiteboard drawing exercises the scorer was built for.

/// Silhouette normalization parameters
pub mod normalization {
    /// Side of the square canonical raster both shapes are resampled to
    pub const CANONICAL_SIZE: u32 = 300;

    /// Crop margin around the primary contour, as a fraction of its larger side
    pub const MARGIN_RATIO: f64 = 0.04;

    /// Smallest crop margin in pixels
    pub const MIN_MARGIN_PX: u32 = 2;

    /// Raw rasters larger than this (on either side) are shrunk before contouring
    pub const ANALYSIS_MAX_SIDE: u32 = 512;

    /// Resampled pixels at or above this gray level count as inside the shape
    pub const RESAMPLE_THRESHOLD: u8 = 128;

    /// Upper bound on either side of the canvas strokes are rasterized onto
    pub const MAX_STROKE_CANVAS_SIDE: u32 = 4096;
}

/// Ink detection on decoded images
pub mod ink {
    /// Pixels must be more opaque than this (0.0-1.0) to count as ink
    pub const ALPHA_THRESHOLD: f32 = 0.5;

    /// A pixel is background-colored when every channel is at or above this (0.0-1.0)
    pub const BRIGHTNESS_THRESHOLD: f32 = 0.9;
}

/// Score composition
pub mod scoring {
    /// Drawings shorter than this (raster units) score zero
    pub const MINIMUM_BRUSH_LENGTH: f64 = 50.0;

    /// Radius of the circular structuring element used to dilate the template
    pub const DILATION_RADIUS: u32 = 3;

    /// Share of the total given to Hu-moment structure similarity
    pub const STRUCTURE_WEIGHT: f64 = 0.8;

    /// Share of the total given to coverage and Chamfer detail
    pub const DETAIL_WEIGHT: f64 = 0.2;

    /// Coverage share within the detail budget
    pub const COVERAGE_WEIGHT: f64 = 0.5;

    /// Chamfer share within the detail budget
    pub const CHAMFER_WEIGHT: f64 = 0.5;

    /// Exponential decay applied to the strict Chamfer distance (per pixel)
    pub const CHAMFER_DECAY: f64 = 0.1;

    /// Exponential decay applied to the average log-Hu distance
    pub const STRUCTURE_DECAY: f64 = 0.5;

    /// Decay for the matchShapes-I1 distance over silhouette moments
    pub const STRICT_STRUCTURE_DECAY: f64 = 8.0;

    /// Polygon approximation tolerance as a fraction of contour perimeter
    pub const CORNER_EPSILON_RATIO: f64 = 0.06;

    /// Penalty multipliers indexed by absolute corner-count difference
    pub const CORNER_PENALTY_STEPS: [f64; 4] = [1.0, 0.7, 0.4, 0.2];
}

/// Moment analysis thresholds
pub mod moments {
    /// Hu components at or below this magnitude are ignored by log-Hu comparison
    pub const LOG_HU_EPSILON: f64 = 1e-10;

    /// Hu components at or below this magnitude are ignored by matchShapes-I1
    pub const MATCH_SHAPES_EPSILON: f64 = 1e-5;

    /// Zeroth central moment below which a point set is treated as degenerate
    pub const MIN_MASS: f64 = 1e-12;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        assert!((scoring::STRUCTURE_WEIGHT + scoring::DETAIL_WEIGHT - 1.0).abs() < 1e-12);
        assert!((scoring::COVERAGE_WEIGHT + scoring::CHAMFER_WEIGHT - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_canonical_size_range() {
        assert!(normalization::CANONICAL_SIZE >= 256 && normalization::CANONICAL_SIZE <= 512);
        assert!(normalization::ANALYSIS_MAX_SIDE >= normalization::CANONICAL_SIZE);
    }

    #[test]
    fn test_corner_steps_decrease() {
        let steps = scoring::CORNER_PENALTY_STEPS;
        assert!(steps.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(steps[0], 1.0);
    }
}
