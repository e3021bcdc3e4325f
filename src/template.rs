//! Reference templates and per-shape features
//!
//! A [`Template`] is built once per exercise and never mutated afterwards;
//! the evaluator only reads it. Submission features are recomputed on every
//! call through the same [`ShapeFeatures::extract`] path.

use std::path::Path;

use crate::config::{EvaluatorConfig, StructureMetric};
use crate::detection::{ContourExtractor, EdgeSet, PolygonCornerCounter};
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::image_loader::load_ink_raster;
use crate::raster::{BinaryRaster, Silhouette, StrokeInput};
use crate::scoring::{DilatedMask, DistanceMap};
use crate::shape::{MomentAnalyzer, MomentVector};

/// Everything measured on one normalized silhouette
#[derive(Debug, Clone)]
pub struct ShapeFeatures {
    /// Filled canonical silhouette
    pub silhouette: Silhouette,
    /// Boundary pixels of the silhouette
    pub edges: EdgeSet,
    /// Hu invariants for `metric`: boundary points for log-Hu, filled area for I1
    pub moments: MomentVector,
    /// Metric the moments were computed for
    pub metric: StructureMetric,
    /// Vertex count of the simplified outline
    pub corner_count: usize,
}

impl ShapeFeatures {
    /// Measure a normalized silhouette for the given structure metric
    pub fn extract(
        silhouette: Silhouette,
        corner_counter: &PolygonCornerCounter,
        metric: StructureMetric,
    ) -> Self {
        let edges = ContourExtractor::new().extract(&silhouette);
        let moments = moment_source(&silhouette, &edges, metric);
        let corner_count = corner_counter.count(&silhouette);

        Self {
            silhouette,
            edges,
            moments,
            metric,
            corner_count,
        }
    }

    /// Moment vector compared by `metric`, recomputed if extracted for another one
    pub fn moments_for(&self, metric: StructureMetric) -> MomentVector {
        if metric == self.metric {
            self.moments
        } else {
            moment_source(&self.silhouette, &self.edges, metric)
        }
    }
}

fn moment_source(silhouette: &Silhouette, edges: &EdgeSet, metric: StructureMetric) -> MomentVector {
    let analyzer = MomentAnalyzer::new();
    match metric {
        StructureMetric::LogHu => analyzer.hu_moments(edges.points()),
        StructureMetric::MatchShapesI1 => analyzer.hu_moments(&silhouette.area_points()),
    }
}

/// Immutable reference shape with cached comparison artifacts
#[derive(Debug, Clone)]
pub struct Template {
    pub(crate) features: ShapeFeatures,
    pub(crate) dilated_mask: DilatedMask,
    pub(crate) distance_map: DistanceMap,
    pub(crate) source_width: u32,
    pub(crate) source_height: u32,
}

impl Template {
    /// Build a template from a raw ink raster
    ///
    /// # Errors
    ///
    /// Returns `EvaluationError::InvalidParameter` for an unusable
    /// configuration and `EvaluationError::EmptyTemplate` when the raster
    /// holds no detectable shape.
    pub fn from_raster(raster: &BinaryRaster, config: &EvaluatorConfig) -> Result<Self> {
        Evaluator::new(config.clone())?.prepare_template(raster)
    }

    /// Build a template from reference strokes on a `width` x `height` canvas
    pub fn from_strokes(
        stroke: &StrokeInput,
        width: u32,
        height: u32,
        config: &EvaluatorConfig,
    ) -> Result<Self> {
        Evaluator::new(config.clone())?.prepare_template_from_strokes(stroke, width, height)
    }

    /// Build a template from an image asset
    pub fn from_image_file(path: &Path, config: &EvaluatorConfig) -> Result<Self> {
        let raster = load_ink_raster(path, &config.normalization)?;
        Self::from_raster(&raster, config)
    }

    pub fn features(&self) -> &ShapeFeatures {
        &self.features
    }

    pub fn silhouette(&self) -> &Silhouette {
        &self.features.silhouette
    }

    pub fn edges(&self) -> &EdgeSet {
        &self.features.edges
    }

    /// Hu invariants for the metric the template was prepared with
    pub fn moments(&self) -> &MomentVector {
        &self.features.moments
    }

    pub fn corner_count(&self) -> usize {
        self.features.corner_count
    }

    pub fn dilated_mask(&self) -> &DilatedMask {
        &self.dilated_mask
    }

    pub fn distance_map(&self) -> &DistanceMap {
        &self.distance_map
    }

    /// Size of the raster or canvas the template was drawn on
    pub fn source_dimensions(&self) -> (u32, u32) {
        (self.source_width, self.source_height)
    }

    /// Side of the template's canonical silhouette
    pub fn canonical_size(&self) -> u32 {
        self.features.silhouette.dimensions().0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvaluationError;
    use crate::raster::Point2D;

    fn triangle() -> StrokeInput {
        vec![
            Point2D::new(20.0, 180.0),
            Point2D::new(100.0, 20.0),
            Point2D::new(180.0, 180.0),
            Point2D::new(20.0, 180.0),
        ]
        .into()
    }

    #[test]
    fn test_template_from_strokes() {
        let template = Template::from_strokes(&triangle(), 200, 200, &EvaluatorConfig::default()).unwrap();
        assert_eq!(template.canonical_size(), 300);
        assert_eq!(template.source_dimensions(), (200, 200));
        assert!(!template.edges().is_empty());
        assert!(!template.moments().is_zero());
        assert_eq!(template.corner_count(), 3);
        assert_eq!(template.dilated_mask().seed_edge_count(), template.edges().len());
        assert!(template.distance_map().has_edges());
    }

    #[test]
    fn test_blank_template_is_rejected() {
        let result = Template::from_raster(&BinaryRaster::new(100, 100), &EvaluatorConfig::default());
        assert!(matches!(result, Err(EvaluationError::EmptyTemplate { .. })));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = EvaluatorConfig::default();
        config.scoring.dilation_radius = 100_000;
        let result = Template::from_strokes(&triangle(), 200, 200, &config);
        assert!(matches!(result, Err(EvaluationError::InvalidParameter { .. })));
    }

    #[test]
    fn test_metric_selects_moment_source() {
        let default = Template::from_strokes(&triangle(), 200, 200, &EvaluatorConfig::default()).unwrap();
        let strict =
            Template::from_strokes(&triangle(), 200, 200, &EvaluatorConfig::strict_silhouette()).unwrap();

        assert_eq!(default.features().metric, StructureMetric::LogHu);
        assert_eq!(strict.features().metric, StructureMetric::MatchShapesI1);
        assert_ne!(default.moments(), strict.moments());

        // Moments for the other metric are derived on demand
        let features = default.features();
        assert_eq!(features.moments_for(StructureMetric::LogHu), *default.moments());
        assert_eq!(features.moments_for(StructureMetric::MatchShapesI1), *strict.moments());
    }
}
