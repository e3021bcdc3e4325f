//! # Sketch Judge
//!
//! A Rust crate for scoring freehand sketches against reference shapes.
//!
//! This library measures how well a drawing reproduces a template by:
//! - Normalizing both shapes to filled, cropped, fixed-size silhouettes
//! - Comparing Hu-moment structure in log space
//! - Measuring boundary coverage against a dilated template
//! - Measuring bidirectional Chamfer distance between boundaries
//! - Penalizing corner-count mismatches of the simplified outlines
//!
//! ## Example
//!
//! ```rust,no_run
//! use sketch_judge::{Evaluator, EvaluatorConfig, Point2D, StrokeInput, Template};
//! use std::path::Path;
//!
//! let config = EvaluatorConfig::default();
//! let template = Template::from_image_file(Path::new("square.png"), &config)?;
//! let evaluator = Evaluator::new(config)?;
//!
//! let stroke: StrokeInput = vec![
//!     Point2D::new(10.0, 10.0),
//!     Point2D::new(90.0, 10.0),
//!     Point2D::new(90.0, 90.0),
//!     Point2D::new(10.0, 90.0),
//!     Point2D::new(10.0, 10.0),
//! ]
//! .into();
//!
//! let result = evaluator.evaluate(&stroke, &template);
//! println!("Score: {}%", result.score_percent());
//! # Ok::<(), sketch_judge::EvaluationError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod evaluator;
pub mod image_loader;
pub mod raster;
pub mod scoring;
pub mod shape;
pub mod template;

pub use config::{
    CoverageDenominator, EdgeMode, EvaluatorConfig, NormalizationConfig, ScoringConfig,
    StructureMetric,
};
pub use error::{EvaluationError, Result};
pub use evaluator::{Drawing, Evaluator};
pub use raster::{BinaryRaster, Point2D, Silhouette, StrokeInput};
pub use template::{ShapeFeatures, Template};

/// Complete evaluation result
///
/// Every score lies in `[0, 1]`; `brush_length` is in raster units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Hu-moment structural similarity
    pub structure_score: f64,
    /// Share of submission edges on the dilated template
    pub coverage_score: f64,
    /// Bidirectional Chamfer similarity
    pub chamfer_score: f64,
    /// Corner-count mismatch multiplier (reported even when not applied)
    pub corner_penalty: f64,
    /// Total path length of the drawing
    pub brush_length: f64,
    /// Final weighted score
    pub total_score: f64,
    /// Corners of the drawing's simplified outline
    pub user_corners: usize,
    /// Corners of the template's simplified outline
    pub template_corners: usize,
}

impl ScoreBreakdown {
    /// All-zero result for degenerate drawings
    pub fn zero(brush_length: f64, template_corners: usize) -> Self {
        Self {
            brush_length,
            template_corners,
            ..Self::default()
        }
    }

    /// Total score as a rounded percentage (0-100)
    pub fn score_percent(&self) -> u8 {
        (self.total_score.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// Score a drawing image against a template image
///
/// Both files are binarized with the configured ink thresholds; the
/// drawing is then evaluated as a raster.
///
/// # Errors
///
/// Returns `EvaluationError` if:
/// - The configuration is invalid
/// - Either image cannot be loaded
/// - The template image holds no detectable shape
pub fn evaluate_image_pair(
    template_path: &Path,
    drawing_path: &Path,
    config: &EvaluatorConfig,
) -> Result<ScoreBreakdown> {
    let evaluator = Evaluator::new(config.clone())?;

    let template_raster = image_loader::load_ink_raster(template_path, &config.normalization)?;
    let template = evaluator.prepare_template(&template_raster)?;

    let drawing = image_loader::load_ink_raster(drawing_path, &config.normalization)?;
    Ok(evaluator.evaluate(&drawing, &template))
}
