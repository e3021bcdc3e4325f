//! Geometric moments and Hu invariants of point sets
//!
//! Provides the moment pipeline used for shape comparison:
//! - Raw geometric moments `m_pq` up to third order
//! - Central moments `mu_pq` about the centroid
//! - Scale-normalized central moments `eta_pq`
//! - The seven Hu invariants
//!
//! Every point carries unit weight. `h1..h6` are invariant to translation,
//! uniform scale and rotation; `h7` flips sign under reflection.

use serde::{Deserialize, Serialize};

use crate::constants::moments::MIN_MASS;
use crate::raster::Point2D;

/// Moments indexed by order: `table.get(p, q)` for `p + q <= 3`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MomentTable([[f64; 4]; 4]);

impl MomentTable {
    /// Moment of order `(p, q)`; entries with `p + q > 3` are always zero
    pub fn get(&self, p: usize, q: usize) -> f64 {
        if p + q > 3 {
            return 0.0;
        }
        self.0[p][q]
    }

    fn set(&mut self, p: usize, q: usize, value: f64) {
        self.0[p][q] = value;
    }
}

/// The seven Hu invariant moments `h1..h7`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MomentVector(pub [f64; 7]);

impl MomentVector {
    /// Vector returned for degenerate point sets
    pub const ZERO: MomentVector = MomentVector([0.0; 7]);

    pub fn values(&self) -> &[f64; 7] {
        &self.0
    }

    /// True when every component is exactly zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&h| h == 0.0)
    }
}

/// Computes moments and Hu invariants of unit-weight point sets
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentAnalyzer;

impl MomentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Raw geometric moments `m_pq = sum(x^p * y^q)` for `p + q <= 3`
    pub fn raw_moments(&self, points: &[Point2D]) -> MomentTable {
        accumulate(points, 0.0, 0.0)
    }

    /// Central moments `mu_pq` about the centroid `(m10/m00, m01/m00)`.
    ///
    /// An empty point set yields an all-zero table.
    pub fn central_moments(&self, points: &[Point2D]) -> MomentTable {
        let raw = self.raw_moments(points);
        let m00 = raw.get(0, 0);
        if m00 < MIN_MASS {
            return MomentTable::default();
        }
        let cx = raw.get(1, 0) / m00;
        let cy = raw.get(0, 1) / m00;
        accumulate(points, cx, cy)
    }

    /// Normalized central moments `eta_pq = mu_pq / mu00^((p+q)/2 + 1)`.
    ///
    /// Only orders `2 <= p + q <= 3` are filled; all entries are zero when
    /// `mu00` is negligible.
    pub fn normalized_moments(&self, central: &MomentTable) -> MomentTable {
        let mut eta = MomentTable::default();
        let mu00 = central.get(0, 0);
        if mu00 < MIN_MASS {
            return eta;
        }
        for p in 0..=3 {
            for q in 0..=(3 - p) {
                let order = p + q;
                if order < 2 {
                    continue;
                }
                let gamma = order as f64 / 2.0 + 1.0;
                eta.set(p, q, central.get(p, q) / mu00.powf(gamma));
            }
        }
        eta
    }

    /// The classical Hu invariants of a normalized moment table
    pub fn hu_from_normalized(&self, eta: &MomentTable) -> MomentVector {
        let n20 = eta.get(2, 0);
        let n02 = eta.get(0, 2);
        let n11 = eta.get(1, 1);
        let n30 = eta.get(3, 0);
        let n03 = eta.get(0, 3);
        let n21 = eta.get(2, 1);
        let n12 = eta.get(1, 2);

        let a = n30 + n12;
        let b = n21 + n03;
        let c = n30 - 3.0 * n12;
        let d = 3.0 * n21 - n03;

        let h1 = n20 + n02;
        let h2 = (n20 - n02).powi(2) + 4.0 * n11.powi(2);
        let h3 = c.powi(2) + d.powi(2);
        let h4 = a.powi(2) + b.powi(2);
        let h5 = c * a * (a.powi(2) - 3.0 * b.powi(2)) + d * b * (3.0 * a.powi(2) - b.powi(2));
        let h6 = (n20 - n02) * (a.powi(2) - b.powi(2)) + 4.0 * n11 * a * b;
        let h7 = d * a * (a.powi(2) - 3.0 * b.powi(2)) - c * b * (3.0 * a.powi(2) - b.powi(2));

        MomentVector([h1, h2, h3, h4, h5, h6, h7])
    }

    /// Hu invariants of a point set.
    ///
    /// # Arguments
    ///
    /// * `points` - Edge or area pixels, each with unit weight
    ///
    /// # Returns
    ///
    /// The seven invariants, or [`MomentVector::ZERO`] for fewer than three
    /// points, negligible mass, or any non-finite intermediate value
    pub fn hu_moments(&self, points: &[Point2D]) -> MomentVector {
        if points.len() < 3 {
            return MomentVector::ZERO;
        }
        let central = self.central_moments(points);
        if central.get(0, 0) < MIN_MASS {
            return MomentVector::ZERO;
        }
        let hu = self.hu_from_normalized(&self.normalized_moments(&central));
        if hu.0.iter().all(|h| h.is_finite()) {
            hu
        } else {
            MomentVector::ZERO
        }
    }
}

fn accumulate(points: &[Point2D], cx: f64, cy: f64) -> MomentTable {
    let mut table = MomentTable::default();
    for point in points {
        let x = point.x - cx;
        let y = point.y - cy;
        let xs = [1.0, x, x * x, x * x * x];
        let ys = [1.0, y, y * y, y * y * y];
        for p in 0..=3 {
            for q in 0..=(3 - p) {
                table.0[p][q] += xs[p] * ys[q];
            }
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn circle(cx: f64, cy: f64, r: f64, n: usize) -> Vec<Point2D> {
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64 * std::f64::consts::TAU;
                Point2D::new(cx + r * t.cos(), cy + r * t.sin())
            })
            .collect()
    }

    fn l_shape() -> Vec<Point2D> {
        let mut pts = Vec::new();
        for i in 0..20 {
            pts.push(Point2D::new(0.0, i as f64));
        }
        for i in 1..12 {
            pts.push(Point2D::new(i as f64, 0.0));
        }
        pts.push(Point2D::new(3.0, 7.0));
        pts
    }

    #[test]
    fn test_raw_moments_of_known_points() {
        let analyzer = MomentAnalyzer::new();
        let pts = [Point2D::new(1.0, 2.0), Point2D::new(3.0, 4.0)];
        let m = analyzer.raw_moments(&pts);
        assert_eq!(m.get(0, 0), 2.0);
        assert_eq!(m.get(1, 0), 4.0);
        assert_eq!(m.get(0, 1), 6.0);
        assert_eq!(m.get(1, 1), 2.0 + 12.0);
        assert_eq!(m.get(3, 0), 1.0 + 27.0);
        assert_eq!(m.get(2, 2), 0.0);
    }

    #[test]
    fn test_central_moments_are_centered() {
        let analyzer = MomentAnalyzer::new();
        let mu = analyzer.central_moments(&l_shape());
        assert_relative_eq!(mu.get(1, 0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(mu.get(0, 1), 0.0, epsilon = 1e-9);
        assert_eq!(mu.get(0, 0), 32.0);
    }

    #[test]
    fn test_normalized_moments_scale_invariant_for_areas() {
        let analyzer = MomentAnalyzer::new();
        let rect = |w: u32, h: u32| -> Vec<Point2D> {
            (0..h)
                .flat_map(|y| (0..w).map(move |x| Point2D::new(f64::from(x), f64::from(y))))
                .collect()
        };

        let eta_a = analyzer.normalized_moments(&analyzer.central_moments(&rect(10, 20)));
        let eta_b = analyzer.normalized_moments(&analyzer.central_moments(&rect(30, 60)));
        assert_relative_eq!(eta_a.get(2, 0), eta_b.get(2, 0), max_relative = 0.02);
        assert_relative_eq!(eta_a.get(0, 2), eta_b.get(0, 2), max_relative = 0.02);
        assert!(eta_a.get(1, 0) == 0.0 && eta_a.get(0, 0) == 0.0);
    }

    #[test]
    fn test_hu_translation_invariant() {
        let analyzer = MomentAnalyzer::new();
        let base = l_shape();
        let moved: Vec<Point2D> = base.iter().map(|p| Point2D::new(p.x + 40.0, p.y - 13.0)).collect();

        let a = analyzer.hu_moments(&base);
        let b = analyzer.hu_moments(&moved);
        for i in 0..7 {
            assert_relative_eq!(a.0[i], b.0[i], epsilon = 1e-12, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_hu_rotation_invariant_except_reflection() {
        let analyzer = MomentAnalyzer::new();
        let base = l_shape();
        // Quarter turn: (x, y) -> (-y, x)
        let rotated: Vec<Point2D> = base.iter().map(|p| Point2D::new(-p.y, p.x)).collect();
        // Mirror: (x, y) -> (-x, y)
        let mirrored: Vec<Point2D> = base.iter().map(|p| Point2D::new(-p.x, p.y)).collect();

        let a = analyzer.hu_moments(&base);
        let r = analyzer.hu_moments(&rotated);
        let m = analyzer.hu_moments(&mirrored);

        for i in 0..7 {
            assert_relative_eq!(a.0[i], r.0[i], epsilon = 1e-15, max_relative = 1e-6);
        }
        for i in 0..6 {
            assert_relative_eq!(a.0[i], m.0[i], epsilon = 1e-15, max_relative = 1e-6);
        }
        assert!(a.0[6].abs() > 1e-15);
        assert_relative_eq!(a.0[6], -m.0[6], epsilon = 1e-15, max_relative = 1e-6);
    }

    #[test]
    fn test_circle_invariants() {
        let analyzer = MomentAnalyzer::new();
        let hu = analyzer.hu_moments(&circle(50.0, 50.0, 30.0, 64));
        // Ring of n unit points: mu20 = mu02 = n r^2 / 2 and mu00 = n
        assert_relative_eq!(hu.0[0], 30.0 * 30.0 / 64.0, max_relative = 1e-9);
        assert!(hu.0[1].abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs_give_zero() {
        let analyzer = MomentAnalyzer::new();
        assert!(analyzer.hu_moments(&[]).is_zero());
        assert!(analyzer
            .hu_moments(&[Point2D::new(0.0, 0.0), Point2D::new(100.0, 0.0)])
            .is_zero());
        assert!(analyzer.central_moments(&[]).get(0, 0) == 0.0);
        assert!(analyzer.normalized_moments(&MomentTable::default()).get(2, 0) == 0.0);

        let same = [Point2D::new(5.0, 5.0); 4];
        assert!(analyzer.hu_moments(&same).is_zero());
    }
}
