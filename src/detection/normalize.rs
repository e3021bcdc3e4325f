//! Canonical silhouette normalization
//!
//! Turns raw ink (a raster or rasterized strokes) into a filled, cropped
//! silhouette resampled to a fixed square size, so that both sides of a
//! comparison are measured on the same grid regardless of where and how
//! large the shape was drawn.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use super::contour::{bounding_box, dedup_closed, polygon_area, primary_contour};
use crate::config::{EdgeMode, NormalizationConfig};
use crate::constants::normalization;
use crate::raster::{
    rasterize_strokes, shrink_to_max_side, BinaryRaster, Point2D, Silhouette, StrokeInput,
};

/// Raster normalizer producing canonical silhouettes
#[derive(Debug, Clone)]
pub struct RasterNormalizer {
    canonical_size: u32,
    margin_ratio: f64,
    min_margin_px: u32,
    analysis_max_side: u32,
    edge_mode: EdgeMode,
}

impl Default for RasterNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterNormalizer {
    /// Create a normalizer with the reference parameters
    pub fn new() -> Self {
        Self::from_config(&NormalizationConfig::default())
    }

    /// Create a normalizer from configuration
    pub fn from_config(config: &NormalizationConfig) -> Self {
        Self {
            canonical_size: config.canonical_size,
            margin_ratio: config.margin_ratio,
            min_margin_px: config.min_margin_px,
            analysis_max_side: config.analysis_max_side,
            edge_mode: config.edge_mode,
        }
    }

    /// Side of the square silhouettes this normalizer produces
    pub fn canonical_size(&self) -> u32 {
        self.canonical_size
    }

    /// Rasterize strokes on a `width` x `height` canvas, then normalize
    ///
    /// The canvas is framed with a background border wide enough for the
    /// crop margin, so strokes reaching its edges are cropped exactly like
    /// the same strokes drawn further inside.
    pub fn normalize_strokes(&self, stroke: &StrokeInput, width: u32, height: u32) -> Silhouette {
        let frame = self.margin_for(width.max(height)) + 1;
        let offset = f64::from(frame);
        let shifted: StrokeInput = stroke
            .points()
            .iter()
            .map(|p| Point2D::new(p.x + offset, p.y + offset))
            .collect();
        self.normalize(&rasterize_strokes(
            &shifted,
            width.saturating_add(2 * frame),
            height.saturating_add(2 * frame),
        ))
    }

    /// Normalize a raw ink raster.
    ///
    /// Returns an all-background silhouette of the canonical size when the
    /// raster holds no contour.
    pub fn normalize(&self, raw: &BinaryRaster) -> Silhouette {
        // Step 1: Bound the analysis resolution
        let raster = shrink_to_max_side(raw, self.analysis_max_side);
        let (width, height) = raster.dimensions();

        // Step 2: Primary external contour
        let Some(contour) = primary_contour(&raster) else {
            tracing::debug!("no contour in raster, returning empty silhouette");
            return Silhouette::empty(self.canonical_size);
        };

        let Some((x0, y0, x1, y1)) = bounding_box(&contour) else {
            return Silhouette::empty(self.canonical_size);
        };

        // Step 3: Solid shape (or the raw ink in legacy mode)
        let shape = match self.edge_mode {
            EdgeMode::FilledSilhouette => {
                if polygon_area(&contour) == 0.0 {
                    tracing::debug!(points = contour.len(), "primary contour encloses no area");
                    return Silhouette::empty(self.canonical_size);
                }
                fill_contour(&contour, width, height)
            }
            EdgeMode::RawInk => {
                if x0 == x1 && y0 == y1 {
                    tracing::debug!("primary contour is a single pixel");
                    return Silhouette::empty(self.canonical_size);
                }
                raster.to_gray()
            }
        };

        // Step 4: Bounding box plus margin, clamped to the raster
        let box_w = (x1 - x0 + 1) as u32;
        let box_h = (y1 - y0 + 1) as u32;
        let margin = self.margin_for(box_w.max(box_h));

        let crop_x = (x0 as u32).saturating_sub(margin);
        let crop_y = (y0 as u32).saturating_sub(margin);
        let crop_w = (box_w + 2 * margin).min(width - crop_x);
        let crop_h = (box_h + 2 * margin).min(height - crop_y);

        // Step 5: Crop and resample to the canonical square
        let cropped = imageops::crop_imm(&shape, crop_x, crop_y, crop_w, crop_h).to_image();
        let resized = imageops::resize(
            &cropped,
            self.canonical_size,
            self.canonical_size,
            FilterType::Triangle,
        );

        Silhouette::from_raster(BinaryRaster::from_gray(
            &resized,
            normalization::RESAMPLE_THRESHOLD,
        ))
    }

    fn margin_for(&self, longest_side: u32) -> u32 {
        let scaled = (f64::from(longest_side) * self.margin_ratio) as u32;
        scaled.max(self.min_margin_px)
    }
}

/// Paint the interior and boundary of a contour onto a blank canvas
fn fill_contour(contour: &[Point<i32>], width: u32, height: u32) -> GrayImage {
    let mut canvas = GrayImage::new(width, height);
    let polygon = dedup_closed(contour);

    if polygon.len() >= 3 {
        draw_polygon_mut(&mut canvas, &polygon, Luma([255u8]));
    }
    for p in contour {
        if p.x >= 0 && p.y >= 0 && (p.x as u32) < width && (p.y as u32) < height {
            canvas.put_pixel(p.x as u32, p.y as u32, Luma([255u8]));
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_outline(x0: f64, y0: f64, side: f64) -> StrokeInput {
        vec![
            Point2D::new(x0, y0),
            Point2D::new(x0 + side, y0),
            Point2D::new(x0 + side, y0 + side),
            Point2D::new(x0, y0 + side),
            Point2D::new(x0, y0),
        ]
        .into()
    }

    #[test]
    fn test_empty_raster_gives_empty_silhouette() {
        let normalizer = RasterNormalizer::new();
        let silhouette = normalizer.normalize(&BinaryRaster::new(120, 80));
        assert!(silhouette.is_empty());
        assert_eq!(silhouette.dimensions(), (300, 300));
    }

    #[test]
    fn test_outline_is_filled() {
        let normalizer = RasterNormalizer::new();
        let silhouette = normalizer.normalize_strokes(&square_outline(20.0, 30.0, 60.0), 200, 150);
        assert_eq!(silhouette.dimensions(), (300, 300));
        assert!(silhouette.as_raster().get(150, 150), "interior must be filled");
        // Margin keeps the corners as background
        assert!(!silhouette.as_raster().get(0, 0));
        assert!(silhouette.as_raster().count_ink() > 300 * 300 / 2);
    }

    #[test]
    fn test_position_and_scale_are_normalized() {
        let normalizer = RasterNormalizer::new();
        let small = normalizer.normalize_strokes(&square_outline(10.0, 10.0, 40.0), 300, 300);
        let large = normalizer.normalize_strokes(&square_outline(100.0, 60.0, 160.0), 300, 300);

        let a = small.as_raster().count_ink() as f64;
        let b = large.as_raster().count_ink() as f64;
        assert!((a - b).abs() / a.max(b) < 0.1, "areas {} vs {}", a, b);
    }

    #[test]
    fn test_raw_ink_mode_keeps_outline() {
        let config = NormalizationConfig {
            edge_mode: EdgeMode::RawInk,
            ..NormalizationConfig::default()
        };
        let normalizer = RasterNormalizer::from_config(&config);
        let silhouette = normalizer.normalize_strokes(&square_outline(20.0, 20.0, 100.0), 200, 200);
        assert!(!silhouette.is_empty());
        assert!(!silhouette.as_raster().get(150, 150), "interior stays empty");
    }

    #[test]
    fn test_single_pixel_gives_empty_silhouette() {
        let mut raster = BinaryRaster::new(50, 50);
        raster.set(0, 0, true);
        let silhouette = RasterNormalizer::new().normalize(&raster);
        assert_eq!(silhouette.dimensions(), (300, 300));
        assert!(silhouette.is_empty());

        let raw = RasterNormalizer::from_config(&NormalizationConfig {
            edge_mode: EdgeMode::RawInk,
            ..NormalizationConfig::default()
        });
        assert!(raw.normalize(&raster).is_empty());
    }

    #[test]
    fn test_zero_area_line_needs_raw_ink_mode() {
        let line: StrokeInput = vec![Point2D::new(0.0, 50.0), Point2D::new(100.0, 50.0)].into();
        assert!(RasterNormalizer::new().normalize_strokes(&line, 101, 101).is_empty());

        let raw = RasterNormalizer::from_config(&NormalizationConfig {
            edge_mode: EdgeMode::RawInk,
            ..NormalizationConfig::default()
        });
        let silhouette = raw.normalize_strokes(&line, 101, 101);
        assert!(!silhouette.is_empty());
        assert!(silhouette.as_raster().get(150, 150));
    }

    #[test]
    fn test_outline_touching_canvas_borders() {
        // Strokes from the origin to the far edge of a tight canvas
        let normalizer = RasterNormalizer::new();
        let tight = normalizer.normalize_strokes(&square_outline(0.0, 0.0, 100.0), 101, 101);
        let inset = normalizer.normalize_strokes(&square_outline(5.0, 5.0, 100.0), 106, 106);

        assert!(!tight.is_empty());
        assert!(tight.as_raster().get(150, 150));
        assert_eq!(tight, inset);
    }

    #[test]
    fn test_raster_ink_reaching_image_edges() {
        // Filled blob cut off by the left and right image borders
        let raster = BinaryRaster::from_fn(120, 80, |_, y| (20..=60).contains(&y));
        let silhouette = RasterNormalizer::new().normalize(&raster);
        assert!(!silhouette.is_empty());
        assert!(silhouette.as_raster().get(150, 150));
    }

    #[test]
    fn test_custom_canonical_size() {
        let config = NormalizationConfig {
            canonical_size: 64,
            ..NormalizationConfig::default()
        };
        let normalizer = RasterNormalizer::from_config(&config);
        assert_eq!(normalizer.canonical_size(), 64);
        let silhouette = normalizer.normalize_strokes(&square_outline(5.0, 5.0, 30.0), 50, 50);
        assert_eq!(silhouette.dimensions(), (64, 64));
    }
}
