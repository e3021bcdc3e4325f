//! Outer contour search shared by normalization and corner counting

use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::point::Point;

use crate::raster::BinaryRaster;

/// Outermost contours of the inked regions (holes and nested shapes excluded)
///
/// Border following needs background around the ink, so the raster is traced
/// inside a one-pixel frame and the points are shifted back afterwards.
pub(crate) fn outer_contours(raster: &BinaryRaster) -> Vec<Contour<i32>> {
    if raster.is_blank() {
        return Vec::new();
    }
    find_contours::<i32>(&framed_gray(raster))
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|mut c| {
            for p in c.points.iter_mut() {
                p.x -= 1;
                p.y -= 1;
            }
            c
        })
        .collect()
}

fn framed_gray(raster: &BinaryRaster) -> GrayImage {
    let (width, height) = raster.dimensions();
    let mut framed = GrayImage::new(width + 2, height + 2);
    for (x, y) in raster.ink_pixels() {
        framed.put_pixel(x + 1, y + 1, Luma([255u8]));
    }
    framed
}

/// Contour of the largest inked region.
///
/// Regions are ranked by enclosed area; ties (e.g. open strokes whose
/// traced border encloses nothing) go to the longer contour. Callers decide
/// whether a zero-area winner counts as a shape.
pub(crate) fn primary_contour(raster: &BinaryRaster) -> Option<Vec<Point<i32>>> {
    outer_contours(raster)
        .into_iter()
        .filter(|c| !c.points.is_empty())
        .map(|c| (polygon_area(&c.points), c.points))
        .max_by(|(area_a, pts_a), (area_b, pts_b)| {
            area_a
                .total_cmp(area_b)
                .then(pts_a.len().cmp(&pts_b.len()))
        })
        .map(|(_, points)| points)
}

/// Absolute shoelace area of a closed polygon
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y))
        .sum();
    (twice as f64).abs() / 2.0
}

/// Inclusive bounding box `(min_x, min_y, max_x, max_y)` of a point list
pub(crate) fn bounding_box(points: &[Point<i32>]) -> Option<(i32, i32, i32, i32)> {
    let first = points.first()?;
    Some(points.iter().fold(
        (first.x, first.y, first.x, first.y),
        |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
    ))
}

/// Drop consecutive repeats and a closing point equal to the first
pub(crate) fn dedup_closed(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let mut out: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    out
}
