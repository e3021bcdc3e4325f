//! Turning captured input into binary rasters
//!
//! Strokes are drawn as connected line segments, decoded images are
//! binarized by opacity and brightness, and oversized rasters are shrunk
//! before contour analysis.

use std::borrow::Cow;

use image::{GrayImage, Luma, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;

use super::types::{BinaryRaster, Point2D, StrokeInput};
use crate::constants::normalization;

/// Draw consecutive stroke points as 1-pixel line segments.
///
/// Segments with a non-finite endpoint are skipped; parts of segments
/// falling outside the canvas are clipped. Fewer than two points yield an
/// all-background raster.
pub fn rasterize_strokes(stroke: &StrokeInput, width: u32, height: u32) -> BinaryRaster {
    let mut canvas = GrayImage::new(width, height);

    for pair in stroke.points().windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
            continue;
        }
        draw_line_segment_mut(&mut canvas, clamp_to_reach(a), clamp_to_reach(b), Luma([255u8]));
    }

    BinaryRaster::from_gray(&canvas, 1)
}

/// Far off-canvas coordinates are pulled in so line iteration stays bounded
fn clamp_to_reach(point: Point2D) -> (f32, f32) {
    let reach = f64::from(normalization::MAX_STROKE_CANVAS_SIDE) * 2.0;
    (
        point.x.clamp(-reach, reach) as f32,
        point.y.clamp(-reach, reach) as f32,
    )
}

/// Binarize a decoded image.
///
/// A pixel is ink when it is more opaque than `alpha_threshold` and at least
/// one color channel is darker than `brightness_threshold` (both 0.0-1.0).
pub fn ink_mask(image: &RgbaImage, alpha_threshold: f32, brightness_threshold: f32) -> BinaryRaster {
    BinaryRaster::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = f32::from(a) / 255.0;
        let darkest = f32::from(r.min(g).min(b)) / 255.0;
        alpha > alpha_threshold && darkest < brightness_threshold
    })
}

/// Shrink a raster so that its larger side is at most `max_side`.
///
/// Aspect ratio is preserved. A destination pixel is inked when any source
/// pixel in its footprint is inked, so 1-pixel strokes stay connected.
pub fn shrink_to_max_side(raster: &BinaryRaster, max_side: u32) -> Cow<'_, BinaryRaster> {
    let (width, height) = raster.dimensions();
    let longest = width.max(height);
    if longest <= max_side || max_side == 0 {
        return Cow::Borrowed(raster);
    }

    let scale = f64::from(max_side) / f64::from(longest);
    let new_width = ((f64::from(width) * scale).round() as u32).clamp(1, max_side);
    let new_height = ((f64::from(height) * scale).round() as u32).clamp(1, max_side);

    let mut shrunk = BinaryRaster::new(new_width, new_height);
    for (x, y) in raster.ink_pixels() {
        let dx = (u64::from(x) * u64::from(new_width) / u64::from(width)) as u32;
        let dy = (u64::from(y) * u64::from(new_height) / u64::from(height)) as u32;
        shrunk.set(dx, dy, true);
    }

    tracing::debug!(
        from = ?(width, height),
        to = ?(new_width, new_height),
        "shrunk raster for analysis"
    );
    Cow::Owned(shrunk)
}
