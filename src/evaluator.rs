//! Drawing evaluation pipeline
//!
//! Implements the scoring of a drawing against a prepared template:
//! - Gate on total brush length
//! - Normalize to a canonical silhouette and extract its boundary
//! - Compare Hu-moment structure
//! - Measure coverage and Chamfer detail against cached template artifacts
//! - Apply the optional corner-count penalty and combine
//!
//! Every degenerate submission resolves to a zero [`ScoreBreakdown`];
//! evaluation itself never fails.

use crate::config::EvaluatorConfig;
use crate::constants::normalization::MAX_STROKE_CANVAS_SIDE;
use crate::detection::{corner_penalty, PolygonCornerCounter, RasterNormalizer};
use crate::error::{EvaluationError, Result};
use crate::raster::{BinaryRaster, Silhouette, StrokeInput};
use crate::scoring::{clamp_unit, ChamferScorer, CoverageScorer, DistanceMap};
use crate::shape::StructureComparator;
use crate::template::{ShapeFeatures, Template};
use crate::ScoreBreakdown;

/// A submission: captured strokes or an already-rasterized drawing
#[derive(Debug, Clone, Copy)]
pub enum Drawing<'a> {
    /// Time-ordered stroke points
    Strokes(&'a StrokeInput),
    /// Binarized ink raster
    Raster(&'a BinaryRaster),
}

impl Drawing<'_> {
    /// Path length used by the gate.
    ///
    /// Strokes sum their segment lengths; a raster counts one unit of path
    /// per inked pixel.
    pub fn brush_length(&self) -> f64 {
        match self {
            Drawing::Strokes(stroke) => stroke.brush_length(),
            Drawing::Raster(raster) => raster.count_ink() as f64,
        }
    }
}

impl<'a> From<&'a StrokeInput> for Drawing<'a> {
    fn from(stroke: &'a StrokeInput) -> Self {
        Drawing::Strokes(stroke)
    }
}

impl<'a> From<&'a BinaryRaster> for Drawing<'a> {
    fn from(raster: &'a BinaryRaster) -> Self {
        Drawing::Raster(raster)
    }
}

/// Scores drawings against templates
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: EvaluatorConfig,
    normalizer: RasterNormalizer,
    structure: StructureComparator,
    corners: PolygonCornerCounter,
    coverage: CoverageScorer,
    chamfer: ChamferScorer,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::build(EvaluatorConfig::default())
    }
}

impl Evaluator {
    /// Create an evaluator from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `EvaluationError::InvalidParameter` when any setting is out
    /// of range.
    pub fn new(config: EvaluatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EvaluatorConfig) -> Self {
        let scoring = &config.scoring;
        Self {
            normalizer: RasterNormalizer::from_config(&config.normalization),
            structure: StructureComparator::from_config(scoring),
            corners: PolygonCornerCounter::with_epsilon_ratio(scoring.corner_epsilon_ratio),
            coverage: CoverageScorer::with_denominator(
                scoring.dilation_radius,
                scoring.coverage_denominator,
            ),
            chamfer: ChamferScorer::new(scoring.chamfer_decay_constant),
            config,
        }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Build the cached template artifacts from a raw ink raster
    ///
    /// # Errors
    ///
    /// Returns `EvaluationError::EmptyTemplate` when the raster yields no
    /// contour or no boundary.
    pub fn prepare_template(&self, raster: &BinaryRaster) -> Result<Template> {
        let silhouette = self.normalizer.normalize(raster);
        self.build_template(silhouette, raster.dimensions())
    }

    /// Build a template from reference strokes on a `width` x `height` canvas
    pub fn prepare_template_from_strokes(
        &self,
        stroke: &StrokeInput,
        width: u32,
        height: u32,
    ) -> Result<Template> {
        let silhouette = self.normalizer.normalize_strokes(stroke, width, height);
        self.build_template(silhouette, (width, height))
    }

    fn build_template(&self, silhouette: Silhouette, source: (u32, u32)) -> Result<Template> {
        if silhouette.is_empty() {
            return Err(EvaluationError::EmptyTemplate {
                reason: "no enclosed contour found in reference".into(),
            });
        }

        let metric = self.structure.metric();
        let features = ShapeFeatures::extract(silhouette, &self.corners, metric);
        if features.edges.is_empty() {
            return Err(EvaluationError::EmptyTemplate {
                reason: "reference silhouette has no boundary".into(),
            });
        }

        let dilated_mask = self.coverage.build_mask(&features.silhouette, &features.edges);
        let distance_map = DistanceMap::from_edges(&features.edges);

        tracing::info!(
            edges = features.edges.len(),
            corners = features.corner_count,
            mask_area = dilated_mask.area(),
            "prepared template"
        );

        Ok(Template {
            features,
            dilated_mask,
            distance_map,
            source_width: source.0,
            source_height: source.1,
        })
    }

    /// Score a drawing against a template
    ///
    /// # Arguments
    ///
    /// * `drawing` - A `&StrokeInput` or `&BinaryRaster` (or a [`Drawing`])
    /// * `template` - Template prepared with the same canonical size
    ///
    /// # Returns
    ///
    /// The full breakdown; degenerate drawings score zero
    pub fn evaluate<'a>(
        &self,
        drawing: impl Into<Drawing<'a>>,
        template: &Template,
    ) -> ScoreBreakdown {
        let drawing = drawing.into();
        let scoring = &self.config.scoring;
        let template_corners = template.features.corner_count;

        // Step 1: Brush-length gate
        let brush_length = drawing.brush_length();
        if brush_length.is_nan() || brush_length < scoring.minimum_brush_length {
            tracing::debug!(brush_length, "drawing below minimum brush length");
            return ScoreBreakdown::zero(brush_length, template_corners);
        }

        // Step 2: Normalize the submission
        let silhouette = match drawing {
            Drawing::Strokes(stroke) => {
                let (width, height) = stroke_canvas(stroke, template);
                self.normalizer.normalize_strokes(stroke, width, height)
            }
            Drawing::Raster(raster) => self.normalizer.normalize(raster),
        };
        if silhouette.dimensions() != template.features.silhouette.dimensions() {
            tracing::warn!(
                submission = ?silhouette.dimensions(),
                template = ?template.features.silhouette.dimensions(),
                "canonical size differs from template"
            );
            return ScoreBreakdown::zero(brush_length, template_corners);
        }
        if silhouette.is_empty() {
            tracing::debug!("submission has no contour");
            return ScoreBreakdown::zero(brush_length, template_corners);
        }

        // Step 3: Boundary and features
        let metric = self.structure.metric();
        let submission = ShapeFeatures::extract(silhouette, &self.corners, metric);
        if submission.edges.is_empty() {
            tracing::debug!("submission silhouette has no boundary");
            return ScoreBreakdown::zero(brush_length, template_corners);
        }

        // Step 4: Structure
        let structure_score = self.structure.compare(
            &template.features.moments_for(metric),
            &submission.moments_for(metric),
        );

        // Step 5: Detail
        let coverage_score = self.coverage.score(&submission.edges, &template.dilated_mask);
        let chamfer_score = self.chamfer.score_with_map(
            &submission.edges,
            &template.features.edges,
            &template.distance_map,
        );

        // Step 6: Corner penalty
        let penalty = corner_penalty(submission.corner_count, template_corners);

        // Step 7: Combine
        let detail = scoring.coverage_weight * coverage_score + scoring.chamfer_weight * chamfer_score;
        let raw = scoring.structure_weight * structure_score + scoring.detail_weight * detail;
        let total_score = if scoring.enable_corner_penalty {
            clamp_unit(raw * penalty)
        } else {
            clamp_unit(raw)
        };

        tracing::debug!(
            structure_score,
            coverage_score,
            chamfer_score,
            corner_penalty = penalty,
            total_score,
            "evaluated drawing"
        );

        ScoreBreakdown {
            structure_score,
            coverage_score,
            chamfer_score,
            corner_penalty: penalty,
            brush_length,
            total_score,
            user_corners: submission.corner_count,
            template_corners,
        }
    }
}

/// Canvas covering the template's source area and the strokes' extent
fn stroke_canvas(stroke: &StrokeInput, template: &Template) -> (u32, u32) {
    let (mut width, mut height) = template.source_dimensions();
    if let Some((max_x, max_y)) = stroke.max_extent() {
        let reach = |v: f64| {
            if v <= 0.0 {
                0
            } else {
                (v.ceil() as u64 + 1).min(u64::from(MAX_STROKE_CANVAS_SIDE)) as u32
            }
        };
        width = width.max(reach(max_x));
        height = height.max(reach(max_y));
    }
    (
        width.clamp(1, MAX_STROKE_CANVAS_SIDE),
        height.clamp(1, MAX_STROKE_CANVAS_SIDE),
    )
}
