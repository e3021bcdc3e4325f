//! Boundary extraction from filled silhouettes

use crate::raster::{BinaryRaster, Point2D, Silhouette};

/// Boundary pixels of a silhouette, in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSet {
    width: u32,
    height: u32,
    points: Vec<Point2D>,
}

impl EdgeSet {
    /// Dimensions of the raster the edges were taken from
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Edge pixels as integer coordinates
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.points.iter().map(|p| (p.x as u32, p.y as u32))
    }

    /// Raster with only the edge pixels inked
    pub fn to_raster(&self) -> BinaryRaster {
        let mut raster = BinaryRaster::new(self.width, self.height);
        for (x, y) in self.pixels() {
            raster.set(x, y, true);
        }
        raster
    }
}

/// Extracts the 8-connected boundary of a silhouette.
///
/// A filled pixel is an edge when any of its 8 neighbours is unfilled;
/// neighbours outside the raster count as unfilled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContourExtractor;

impl ContourExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Single 3x3-window pass over the silhouette
    pub fn extract(&self, silhouette: &Silhouette) -> EdgeSet {
        let raster = silhouette.as_raster();
        let (width, height) = raster.dimensions();

        let points = raster
            .ink_pixels()
            .filter(|&(x, y)| has_background_neighbour(raster, x, y))
            .map(|(x, y)| Point2D::new(f64::from(x), f64::from(y)))
            .collect();

        EdgeSet { width, height, points }
    }
}

fn has_background_neighbour(raster: &BinaryRaster, x: u32, y: u32) -> bool {
    let (x, y) = (i64::from(x), i64::from(y));
    for dy in -1..=1 {
        for dx in -1..=1 {
            if (dx != 0 || dy != 0) && !raster.get_signed(x + dx, y + dy) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(size: u32, from: u32, to: u32) -> Silhouette {
        Silhouette::from_raster(BinaryRaster::from_fn(size, size, |x, y| {
            (from..=to).contains(&x) && (from..=to).contains(&y)
        }))
    }

    #[test]
    fn test_square_boundary() {
        let edges = ContourExtractor::new().extract(&block(20, 5, 14));
        // 10x10 block: perimeter ring of 4*10 - 4 pixels
        assert_eq!(edges.len(), 36);
        assert_eq!(edges.dimensions(), (20, 20));
        assert!(edges.pixels().all(|(x, y)| x == 5 || x == 14 || y == 5 || y == 14));
    }

    #[test]
    fn test_raster_border_counts_as_background() {
        let full = Silhouette::from_raster(BinaryRaster::from_fn(6, 6, |_, _| true));
        let edges = ContourExtractor::new().extract(&full);
        assert_eq!(edges.len(), 20);
    }

    #[test]
    fn test_single_pixel_is_its_own_edge() {
        let edges = ContourExtractor::new().extract(&block(9, 4, 4));
        assert_eq!(edges.points(), &[Point2D::new(4.0, 4.0)]);
    }

    #[test]
    fn test_empty_silhouette_has_no_edges() {
        let edges = ContourExtractor::new().extract(&Silhouette::empty(32));
        assert!(edges.is_empty());
        assert!(edges.to_raster().is_blank());
    }

    #[test]
    fn test_diagonal_neighbour_makes_edge() {
        // Plus sign: the centre touches background only diagonally
        let plus = Silhouette::from_raster(BinaryRaster::from_fn(5, 5, |x, y| x == 2 || y == 2));
        let edges = ContourExtractor::new().extract(&plus);
        assert!(edges.pixels().any(|p| p == (2, 2)));
        assert_eq!(edges.len(), plus.as_raster().count_ink());
    }
}
