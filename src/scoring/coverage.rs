//! Coverage of the template by the submission's boundary

use crate::config::CoverageDenominator;
use crate::detection::EdgeSet;
use crate::raster::{BinaryRaster, Silhouette};

use super::clamp_unit;

/// Grow the inked region by a circular structuring element.
///
/// A pixel becomes inked when some inked pixel lies within `radius`
/// (`dx^2 + dy^2 <= radius^2`). Radius 0 returns a copy.
pub fn dilate(raster: &BinaryRaster, radius: u32) -> BinaryRaster {
    if radius == 0 {
        return raster.clone();
    }

    let r = i64::from(radius);
    let offsets: Vec<(i64, i64)> = (-r..=r)
        .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
        .filter(|(dx, dy)| dx * dx + dy * dy <= r * r)
        .collect();

    let (width, height) = raster.dimensions();
    let mut grown = BinaryRaster::new(width, height);
    for (x, y) in raster.ink_pixels() {
        for &(dx, dy) in &offsets {
            let nx = i64::from(x) + dx;
            let ny = i64::from(y) + dy;
            if nx >= 0 && ny >= 0 {
                grown.set(nx as u32, ny as u32, true);
            }
        }
    }
    grown
}

/// Dilated template silhouette, cached on the template
#[derive(Debug, Clone, PartialEq)]
pub struct DilatedMask {
    mask: BinaryRaster,
    seed_edges: usize,
}

impl DilatedMask {
    /// Whether `(x, y)` falls inside the dilated template
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.mask.get(x, y)
    }

    /// Number of pixels in the dilated mask
    pub fn area(&self) -> usize {
        self.mask.count_ink()
    }

    /// Edge-point count of the template boundary the mask was grown from
    pub fn seed_edge_count(&self) -> usize {
        self.seed_edges
    }

    pub fn as_raster(&self) -> &BinaryRaster {
        &self.mask
    }
}

/// Scores the overlap of a submission's edges with the dilated template
#[derive(Debug, Clone)]
pub struct CoverageScorer {
    dilation_radius: u32,
    denominator: CoverageDenominator,
}

impl CoverageScorer {
    pub fn new(dilation_radius: u32) -> Self {
        Self::with_denominator(dilation_radius, CoverageDenominator::default())
    }

    pub fn with_denominator(dilation_radius: u32, denominator: CoverageDenominator) -> Self {
        Self {
            dilation_radius,
            denominator,
        }
    }

    /// Dilate a template silhouette and remember its boundary size
    pub fn build_mask(&self, silhouette: &Silhouette, edges: &EdgeSet) -> DilatedMask {
        DilatedMask {
            mask: dilate(silhouette.as_raster(), self.dilation_radius),
            seed_edges: edges.len(),
        }
    }

    /// Share of submission edge points inside the mask.
    ///
    /// The denominator is the larger of the submission's edge-point count
    /// and the template-side count (edge points by default, dilated pixels
    /// with [`CoverageDenominator::DilatedArea`]), so an overly dense
    /// submission cannot score high by sheer volume. Returns 0 when both
    /// are empty.
    pub fn score(&self, submission: &EdgeSet, mask: &DilatedMask) -> f64 {
        let overlap = submission
            .pixels()
            .filter(|&(x, y)| mask.contains(x, y))
            .count();
        let template_side = match self.denominator {
            CoverageDenominator::TemplateEdges => mask.seed_edges,
            CoverageDenominator::DilatedArea => mask.area(),
        };
        let denominator = submission.len().max(template_side);
        if denominator == 0 {
            return 0.0;
        }
        clamp_unit(overlap as f64 / denominator as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::ContourExtractor;

    fn block(size: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> Silhouette {
        Silhouette::from_raster(BinaryRaster::from_fn(size, size, |x, y| {
            (x0..=x1).contains(&x) && (y0..=y1).contains(&y)
        }))
    }

    #[test]
    fn test_dilate_single_pixel_is_disc() {
        let mut raster = BinaryRaster::new(11, 11);
        raster.set(5, 5, true);
        let grown = dilate(&raster, 3);
        // Lattice points with dx^2 + dy^2 <= 9
        assert_eq!(grown.count_ink(), 29);
        assert!(grown.get(8, 5));
        assert!(!grown.get(8, 8));
    }

    #[test]
    fn test_dilate_clips_at_border() {
        let mut raster = BinaryRaster::new(4, 4);
        raster.set(0, 0, true);
        let grown = dilate(&raster, 1);
        assert_eq!(grown.count_ink(), 3);
        assert_eq!(dilate(&raster, 0), raster);
    }

    #[test]
    fn test_self_coverage_is_full() {
        let template = block(60, 10, 10, 49, 39);
        let edges = ContourExtractor::new().extract(&template);
        let scorer = CoverageScorer::new(3);
        let mask = scorer.build_mask(&template, &edges);

        assert_eq!(mask.seed_edge_count(), edges.len());
        assert!(mask.area() > template.as_raster().count_ink());
        assert_eq!(scorer.score(&edges, &mask), 1.0);
    }

    #[test]
    fn test_dilated_area_denominator() {
        let template = block(60, 10, 10, 49, 39);
        let edges = ContourExtractor::new().extract(&template);
        let scorer = CoverageScorer::with_denominator(3, CoverageDenominator::DilatedArea);
        let mask = scorer.build_mask(&template, &edges);

        let score = scorer.score(&edges, &mask);
        assert_eq!(score, edges.len() as f64 / mask.area() as f64);
        assert!(score < 0.2, "score {}", score);
    }

    #[test]
    fn test_disjoint_shapes_have_zero_coverage() {
        let template = block(80, 5, 5, 20, 20);
        let drawn = block(80, 50, 50, 70, 70);
        let extractor = ContourExtractor::new();
        let scorer = CoverageScorer::new(3);
        let mask = scorer.build_mask(&template, &extractor.extract(&template));

        assert_eq!(scorer.score(&extractor.extract(&drawn), &mask), 0.0);
    }

    #[test]
    fn test_partial_overlap_is_bounded() {
        let template = block(80, 10, 10, 60, 60);
        let drawn = block(80, 30, 30, 75, 75);
        let extractor = ContourExtractor::new();
        let scorer = CoverageScorer::new(3);
        let mask = scorer.build_mask(&template, &extractor.extract(&template));

        let score = scorer.score(&extractor.extract(&drawn), &mask);
        assert!(score > 0.0 && score < 1.0, "score {}", score);
    }

    #[test]
    fn test_empty_inputs() {
        let scorer = CoverageScorer::new(3);
        let empty = Silhouette::empty(20);
        let edges = ContourExtractor::new().extract(&empty);
        let mask = scorer.build_mask(&empty, &edges);
        assert_eq!(scorer.score(&edges, &mask), 0.0);
    }
}
