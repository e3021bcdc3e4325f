//! Structural similarity from Hu-moment vectors
//!
//! Hu invariants span many orders of magnitude, so both metrics compare
//! them in log space. The resulting distance `d` maps to a similarity
//! through `exp(-k * d)`.

use crate::config::{ScoringConfig, StructureMetric};
use crate::constants::{moments, scoring};
use crate::scoring::clamp_unit;
use crate::shape::moments::MomentVector;

/// Compares two Hu-moment vectors into a similarity in `[0, 1]`
#[derive(Debug, Clone)]
pub struct StructureComparator {
    metric: StructureMetric,
    decay: f64,
}

impl Default for StructureComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureComparator {
    /// Log-Hu metric with the reference decay constant
    pub fn new() -> Self {
        Self {
            metric: StructureMetric::LogHu,
            decay: scoring::STRUCTURE_DECAY,
        }
    }

    pub fn with_params(metric: StructureMetric, decay: f64) -> Self {
        Self { metric, decay }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::with_params(config.structure_metric, config.structure_decay_constant)
    }

    pub fn metric(&self) -> StructureMetric {
        self.metric
    }

    /// Similarity of two moment vectors.
    ///
    /// Returns 0 when no component pair is usable by the configured metric.
    pub fn compare(&self, template: &MomentVector, submission: &MomentVector) -> f64 {
        let distance = match self.metric {
            StructureMetric::LogHu => log_hu_distance(template, submission),
            StructureMetric::MatchShapesI1 => match_shapes_i1(template, submission),
        };
        match distance {
            Some(d) => clamp_unit((-self.decay * d).exp()),
            None => 0.0,
        }
    }
}

/// Reference structure similarity: log-Hu metric with `k = 0.5`
pub fn compare_shapes(template: &MomentVector, submission: &MomentVector) -> f64 {
    StructureComparator::new().compare(template, submission)
}

/// Mean `|log10|a_i| - log10|b_i||` over components where both magnitudes
/// exceed the log-Hu epsilon; `None` when no component qualifies
pub fn log_hu_distance(a: &MomentVector, b: &MomentVector) -> Option<f64> {
    let (sum, count) = a
        .values()
        .iter()
        .zip(b.values())
        .filter(|(x, y)| x.abs() > moments::LOG_HU_EPSILON && y.abs() > moments::LOG_HU_EPSILON)
        .fold((0.0, 0usize), |(sum, count), (x, y)| {
            (sum + (x.abs().log10() - y.abs().log10()).abs(), count + 1)
        });

    (count > 0).then(|| sum / count as f64)
}

/// matchShapes I1 distance: `sum |1/m_a - 1/m_b|` with
/// `m = sign(h) * log10|h|`, over components where both magnitudes exceed
/// the matchShapes epsilon; `None` when no component qualifies
pub fn match_shapes_i1(a: &MomentVector, b: &MomentVector) -> Option<f64> {
    let signed_log = |h: f64| h.signum() * h.abs().log10();

    let mut distance = 0.0;
    let mut used = 0usize;
    for (&ha, &hb) in a.values().iter().zip(b.values()) {
        if ha.abs() <= moments::MATCH_SHAPES_EPSILON || hb.abs() <= moments::MATCH_SHAPES_EPSILON {
            continue;
        }
        let (ma, mb) = (signed_log(ha), signed_log(hb));
        if ma == 0.0 || mb == 0.0 {
            continue;
        }
        distance += (1.0 / ma - 1.0 / mb).abs();
        used += 1;
    }

    (used > 0).then_some(distance)
}
