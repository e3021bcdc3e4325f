//! Polygon corner counting and the corner-mismatch penalty
//!
//! The primary contour of a silhouette is simplified with Douglas-Peucker
//! at a tolerance proportional to its perimeter; the number of remaining
//! vertices is the corner count.

use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;

use super::contour::{dedup_closed, primary_contour};
use crate::constants::scoring;
use crate::raster::Silhouette;

/// Corner counter for filled silhouettes
#[derive(Debug, Clone)]
pub struct PolygonCornerCounter {
    epsilon_ratio: f64,
}

impl Default for PolygonCornerCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl PolygonCornerCounter {
    /// Create a counter with the reference tolerance (6% of perimeter)
    pub fn new() -> Self {
        Self {
            epsilon_ratio: scoring::CORNER_EPSILON_RATIO,
        }
    }

    /// Create a counter with a custom tolerance ratio
    pub fn with_epsilon_ratio(epsilon_ratio: f64) -> Self {
        Self { epsilon_ratio }
    }

    /// Vertex count of the simplified primary contour (0 for an empty silhouette)
    pub fn count(&self, silhouette: &Silhouette) -> usize {
        let Some(contour) = primary_contour(silhouette.as_raster()) else {
            return 0;
        };
        let ring = dedup_closed(&contour);
        if ring.len() < 3 {
            return ring.len();
        }

        let epsilon = self.epsilon_ratio * arc_length(&ring, true);
        if epsilon.is_nan() || epsilon <= 0.0 {
            return ring.len();
        }

        dedup_closed(&simplify_closed(&ring, epsilon)).len()
    }
}

/// Douglas-Peucker over a closed ring.
///
/// The ring is split at the vertex farthest from its start and each half
/// is simplified as an open chain, so the closing segment is never
/// mistaken for a corner.
fn simplify_closed(ring: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let start = ring[0];
    let far = ring
        .iter()
        .enumerate()
        .fold((0, 0i64), |(best, best_d), (i, p)| {
            let dx = i64::from(p.x - start.x);
            let dy = i64::from(p.y - start.y);
            let d = dx * dx + dy * dy;
            if d > best_d {
                (i, d)
            } else {
                (best, best_d)
            }
        })
        .0;
    if far == 0 {
        return vec![start];
    }

    let mut back_half: Vec<Point<i32>> = ring[far..].to_vec();
    back_half.push(start);

    let mut vertices = approximate_polygon_dp(&ring[..=far], epsilon, false);
    vertices.pop();
    let mut rest = approximate_polygon_dp(&back_half, epsilon, false);
    rest.pop();
    vertices.append(&mut rest);
    vertices
}

/// Discrete penalty for a corner-count mismatch.
///
/// 1.0 for equal counts, then 0.7, 0.4 and 0.2 for differences of one,
/// two and three; 0.0 beyond that.
pub fn corner_penalty(user_corners: usize, template_corners: usize) -> f64 {
    scoring::CORNER_PENALTY_STEPS
        .get(user_corners.abs_diff(template_corners))
        .copied()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BinaryRaster;

    fn silhouette(size: u32, inside: impl Fn(i64, i64) -> bool) -> Silhouette {
        Silhouette::from_raster(BinaryRaster::from_fn(size, size, |x, y| {
            inside(i64::from(x), i64::from(y))
        }))
    }

    #[test]
    fn test_square_has_four_corners() {
        let square = silhouette(100, |x, y| (20..=80).contains(&x) && (20..=80).contains(&y));
        assert_eq!(PolygonCornerCounter::new().count(&square), 4);
    }

    #[test]
    fn test_triangle_has_three_corners() {
        let triangle = silhouette(100, |x, y| x >= 10 && y >= 10 && x + y <= 90);
        assert_eq!(PolygonCornerCounter::new().count(&triangle), 3);
    }

    #[test]
    fn test_empty_silhouette_has_no_corners() {
        assert_eq!(PolygonCornerCounter::new().count(&Silhouette::empty(50)), 0);
    }

    #[test]
    fn test_corner_penalty_steps() {
        assert_eq!(corner_penalty(4, 4), 1.0);
        assert_eq!(corner_penalty(4, 5), 0.7);
        assert_eq!(corner_penalty(5, 3), 0.4);
        assert_eq!(corner_penalty(0, 3), 0.2);
        assert_eq!(corner_penalty(8, 4), 0.0);
        assert_eq!(corner_penalty(0, 40), 0.0);
    }

    #[test]
    fn test_corner_penalty_monotonic() {
        let n = 4;
        let penalties: Vec<f64> = (0..=5).map(|d| corner_penalty(n, n + d)).collect();
        assert!(penalties.windows(2).all(|w| w[0] >= w[1]));
        assert!(penalties[..5].windows(2).all(|w| w[0] > w[1]));
    }
}
