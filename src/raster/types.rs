//! Point, stroke and binary raster types shared by every stage

use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

/// A real-valued raster coordinate (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Time-ordered points captured from a pointing device.
///
/// Consecutive points are joined into line segments; no sample rate or
/// de-duplication is assumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeInput {
    points: Vec<Point2D>,
}

impl StrokeInput {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: Point2D) {
        self.points.push(point);
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

    /// Total path length: sum of distances between consecutive points.
    ///
    /// Segments with a non-finite endpoint contribute nothing.
    pub fn brush_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(&pair[1]))
            .filter(|d| d.is_finite())
            .sum()
    }

    /// Largest finite x and y reached by the stroke, if any
    pub fn max_extent(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .fold(None, |acc, p| match acc {
                None => Some((p.x, p.y)),
                Some((mx, my)) => Some((mx.max(p.x), my.max(p.y))),
            })
    }
}

impl From<Vec<Point2D>> for StrokeInput {
    fn from(points: Vec<Point2D>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point2D> for StrokeInput {
    fn from_iter<I: IntoIterator<Item = Point2D>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Fixed-size grid of "ink present" flags, row-major, origin top-left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRaster {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl BinaryRaster {
    /// All-background raster
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width as usize * height as usize],
        }
    }

    /// Build a raster by evaluating `f(x, y)` at every pixel
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self { width, height, pixels }
    }

    /// Threshold a grayscale image: values at or above `threshold` are ink
    pub fn from_gray(image: &GrayImage, threshold: u8) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.pixels().map(|p| p[0] >= threshold).collect(),
        }
    }

    /// Grayscale copy with ink at 255 and background at 0
    pub fn to_gray(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.get(x, y) { 255 } else { 0 }])
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Ink flag at `(x, y)`; pixels outside the raster are background
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.pixels[self.index(x, y)]
    }

    /// Signed lookup used by neighbourhood scans
    pub fn get_signed(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && self.get(x as u32, y as u32)
    }

    /// Set a pixel; writes outside the raster are ignored
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.pixels[idx] = value;
        }
    }

    /// Number of inked pixels
    pub fn count_ink(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    /// True when no pixel is inked
    pub fn is_blank(&self) -> bool {
        !self.pixels.iter().any(|&p| p)
    }

    /// Coordinates of inked pixels in row-major order
    pub fn ink_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width.max(1);
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, &p)| p)
            .map(move |(i, _)| ((i as u32) % width, (i as u32) / width))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// A raster whose ink is the filled interior of a shape.
///
/// Produced by [`RasterNormalizer`](crate::detection::RasterNormalizer) at the
/// canonical size; an all-background silhouette means "no shape".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Silhouette {
    raster: BinaryRaster,
}

impl Silhouette {
    pub fn from_raster(raster: BinaryRaster) -> Self {
        Self { raster }
    }

    /// All-background square silhouette
    pub fn empty(size: u32) -> Self {
        Self::from_raster(BinaryRaster::new(size, size))
    }

    pub fn as_raster(&self) -> &BinaryRaster {
        &self.raster
    }

    pub fn into_raster(self) -> BinaryRaster {
        self.raster
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    /// True when the silhouette holds no shape
    pub fn is_empty(&self) -> bool {
        self.raster.is_blank()
    }

    /// Filled pixels as unit-weight points
    pub fn area_points(&self) -> Vec<Point2D> {
        self.raster
            .ink_pixels()
            .map(|(x, y)| Point2D::new(f64::from(x), f64::from(y)))
            .collect()
    }
}
