//! Configuration structures for the drawing evaluator.
//!
//! All tunable parameters of the scorer live here, grouped into the
//! normalization stage and the scoring stage.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use sketch_judge::EvaluatorConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = EvaluatorConfig::from_json_file(Path::new("judge.json"))?;
//!
//! // Or use the reference tuning
//! let config = EvaluatorConfig::default();
//! # Ok::<(), sketch_judge::EvaluationError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`NormalizationConfig`]: canonical raster size, crop margin, ink detection
//! - [`ScoringConfig`]: brush-length gate, weights, decay constants, corner penalty

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{ink, normalization, scoring};
use crate::error::{EvaluationError, Result};

/// Complete evaluator configuration.
///
/// Serializable to/from JSON so that an exercise's tuning can be versioned
/// next to its template assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EvaluatorConfig {
    /// Silhouette normalization parameters
    #[serde(default)]
    pub normalization: NormalizationConfig,

    /// Score composition parameters
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Which pixels become the edge set of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EdgeMode {
    /// Fill the primary contour and take the silhouette's boundary
    #[default]
    FilledSilhouette,
    /// Keep the ink as drawn; stroke pixels themselves become edges
    RawInk,
}

/// How Hu-moment vectors are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StructureMetric {
    /// Average `|log10|a| - log10|b||` over edge-point moments
    #[default]
    LogHu,
    /// matchShapes I1 distance over silhouette area moments
    MatchShapesI1,
}

/// What the coverage overlap is divided by, besides the submission's edge count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CoverageDenominator {
    /// Edge points of the template boundary the mask was grown from
    #[default]
    TemplateEdges,
    /// Pixel count of the dilated template mask
    DilatedArea,
}

/// Normalization parameters.
///
/// Controls how raw ink is turned into the canonical silhouette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Side of the square canonical raster in pixels
    pub canonical_size: u32,

    /// Crop margin as a fraction of the primary contour's larger side
    pub margin_ratio: f64,

    /// Smallest crop margin in pixels
    pub min_margin_px: u32,

    /// Larger rasters are shrunk to this side before contouring
    pub analysis_max_side: u32,

    /// Filled silhouette (reference) or raw ink edges (legacy)
    pub edge_mode: EdgeMode,

    /// Minimum opacity (0.0-1.0) for an image pixel to be ink
    pub ink_alpha_threshold: f32,

    /// Pixels with every channel at or above this (0.0-1.0) are background
    pub ink_brightness_threshold: f32,
}

/// Scoring parameters.
///
/// Weights, decay constants and the degenerate-input gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Drawings with a shorter path length (raster units) score zero
    pub minimum_brush_length: f64,

    /// Template dilation radius in pixels
    pub dilation_radius: u32,

    /// Weight of the structure score in the raw total
    pub structure_weight: f64,

    /// Weight of the detail score in the raw total
    pub detail_weight: f64,

    /// Weight of coverage within the detail score
    pub coverage_weight: f64,

    /// Weight of Chamfer similarity within the detail score
    pub chamfer_weight: f64,

    /// Template-side count in the coverage denominator
    pub coverage_denominator: CoverageDenominator,

    /// Decay `c` in `exp(-c * distance)` for Chamfer similarity
    pub chamfer_decay_constant: f64,

    /// Decay `k` in `exp(-k * distance)` for structure similarity
    pub structure_decay_constant: f64,

    /// Hu-moment comparison flavour
    pub structure_metric: StructureMetric,

    /// Multiply the total by the corner-count penalty
    pub enable_corner_penalty: bool,

    /// Polygon approximation tolerance as a fraction of perimeter
    pub corner_epsilon_ratio: f64,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            canonical_size: normalization::CANONICAL_SIZE,
            margin_ratio: normalization::MARGIN_RATIO,
            min_margin_px: normalization::MIN_MARGIN_PX,
            analysis_max_side: normalization::ANALYSIS_MAX_SIDE,
            edge_mode: EdgeMode::FilledSilhouette,
            ink_alpha_threshold: ink::ALPHA_THRESHOLD,
            ink_brightness_threshold: ink::BRIGHTNESS_THRESHOLD,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            minimum_brush_length: scoring::MINIMUM_BRUSH_LENGTH,
            dilation_radius: scoring::DILATION_RADIUS,
            structure_weight: scoring::STRUCTURE_WEIGHT,
            detail_weight: scoring::DETAIL_WEIGHT,
            coverage_weight: scoring::COVERAGE_WEIGHT,
            chamfer_weight: scoring::CHAMFER_WEIGHT,
            coverage_denominator: CoverageDenominator::TemplateEdges,
            chamfer_decay_constant: scoring::CHAMFER_DECAY,
            structure_decay_constant: scoring::STRUCTURE_DECAY,
            structure_metric: StructureMetric::LogHu,
            enable_corner_penalty: true,
            corner_epsilon_ratio: scoring::CORNER_EPSILON_RATIO,
        }
    }
}

impl EvaluatorConfig {
    /// Stricter tuning: matchShapes-I1 over filled silhouettes with a steep decay
    pub fn strict_silhouette() -> Self {
        Self {
            normalization: NormalizationConfig::default(),
            scoring: ScoringConfig {
                structure_metric: StructureMetric::MatchShapesI1,
                structure_decay_constant: scoring::STRICT_STRUCTURE_DECAY,
                enable_corner_penalty: true,
                ..ScoringConfig::default()
            },
        }
    }

    /// Check every parameter for a usable value
    pub fn validate(&self) -> Result<()> {
        let n = &self.normalization;
        if !(8..=4096).contains(&n.canonical_size) {
            return Err(EvaluationError::invalid_parameter("canonical_size", n.canonical_size));
        }
        if n.analysis_max_side < 8 {
            return Err(EvaluationError::invalid_parameter(
                "analysis_max_side",
                n.analysis_max_side,
            ));
        }
        check_range("margin_ratio", n.margin_ratio, 0.0, 0.5)?;
        check_range("ink_alpha_threshold", f64::from(n.ink_alpha_threshold), 0.0, 1.0)?;
        check_range(
            "ink_brightness_threshold",
            f64::from(n.ink_brightness_threshold),
            0.0,
            1.0,
        )?;

        let s = &self.scoring;
        if !s.minimum_brush_length.is_finite() || s.minimum_brush_length < 0.0 {
            return Err(EvaluationError::invalid_parameter(
                "minimum_brush_length",
                s.minimum_brush_length,
            ));
        }
        if s.dilation_radius > n.canonical_size {
            return Err(EvaluationError::invalid_parameter("dilation_radius", s.dilation_radius));
        }
        check_range("structure_weight", s.structure_weight, 0.0, 1.0)?;
        check_range("detail_weight", s.detail_weight, 0.0, 1.0)?;
        check_range("coverage_weight", s.coverage_weight, 0.0, 1.0)?;
        check_range("chamfer_weight", s.chamfer_weight, 0.0, 1.0)?;
        check_range("chamfer_decay_constant", s.chamfer_decay_constant, 0.0, f64::MAX)?;
        check_range("structure_decay_constant", s.structure_decay_constant, 0.0, f64::MAX)?;
        check_range("corner_epsilon_ratio", s.corner_epsilon_ratio, f64::MIN_POSITIVE, 1.0)?;

        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EvaluationError::config_file(format!("cannot read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            EvaluationError::config_file(format!("cannot parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| EvaluationError::config_file("cannot serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            EvaluationError::config_file(format!("cannot write {}", path.display()), e)
        })?;
        Ok(())
    }
}

fn check_range(parameter: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(EvaluationError::invalid_parameter(parameter, value))
    }
}
