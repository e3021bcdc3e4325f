//! Bidirectional Chamfer similarity between boundary sets
//!
//! Nearest-edge distances come from an exact Euclidean distance transform
//! (Felzenszwalb and Huttenlocher, two separable 1D passes), so every
//! lookup is O(1) and the result equals an all-pairs search.

use crate::detection::EdgeSet;

use super::clamp_unit;

/// Squared distance standing in for "no edge reachable yet"
const FAR: f64 = 1e20;

/// Euclidean distance from every pixel to the nearest edge pixel
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMap {
    width: u32,
    height: u32,
    distances: Vec<f64>,
    seeded: bool,
}

impl DistanceMap {
    /// Distance transform of an edge set over its raster dimensions
    pub fn from_edges(edges: &EdgeSet) -> Self {
        let (width, height) = edges.dimensions();
        let (w, h) = (width as usize, height as usize);

        let mut grid = vec![FAR; w * h];
        for (x, y) in edges.pixels() {
            if (x as usize) < w && (y as usize) < h {
                grid[y as usize * w + x as usize] = 0.0;
            }
        }

        let longest = w.max(h);
        let mut line = vec![0.0; longest];
        let mut out = vec![0.0; longest];
        let mut hull = vec![0usize; longest];
        let mut bounds = vec![0.0; longest + 1];

        // Columns
        for x in 0..w {
            for y in 0..h {
                line[y] = grid[y * w + x];
            }
            squared_distance_1d(&line[..h], &mut out[..h], &mut hull, &mut bounds);
            for y in 0..h {
                grid[y * w + x] = out[y];
            }
        }

        // Rows
        for y in 0..h {
            let row = &mut grid[y * w..(y + 1) * w];
            line[..w].copy_from_slice(row);
            squared_distance_1d(&line[..w], &mut out[..w], &mut hull, &mut bounds);
            row.copy_from_slice(&out[..w]);
        }

        Self {
            width,
            height,
            distances: grid.into_iter().map(f64::sqrt).collect(),
            seeded: !edges.is_empty(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// False when the map was built from an empty edge set
    pub fn has_edges(&self) -> bool {
        self.seeded
    }

    /// Distance to the nearest edge; infinite outside the map or when
    /// there are no edges
    pub fn distance_at(&self, x: u32, y: u32) -> f64 {
        if !self.seeded || x >= self.width || y >= self.height {
            return f64::INFINITY;
        }
        self.distances[y as usize * self.width as usize + x as usize]
    }

    /// Mean nearest-edge distance over the points of `edges`.
    ///
    /// `None` when either side is empty.
    pub fn mean_distance(&self, edges: &EdgeSet) -> Option<f64> {
        if !self.seeded || edges.is_empty() {
            return None;
        }
        let total: f64 = edges.pixels().map(|(x, y)| self.distance_at(x, y)).sum();
        Some(total / edges.len() as f64)
    }
}

/// Lower envelope of parabolas rooted at `(q, f[q])`
fn squared_distance_1d(f: &[f64], d: &mut [f64], hull: &mut [usize], bounds: &mut [f64]) {
    let n = f.len();
    if n == 0 {
        return;
    }
    let intersection = |q: usize, p: usize| -> f64 {
        let (qf, pf) = (q as f64, p as f64);
        ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * qf - 2.0 * pf)
    };

    let mut k = 0usize;
    hull[0] = 0;
    bounds[0] = f64::NEG_INFINITY;
    bounds[1] = f64::INFINITY;

    for q in 1..n {
        let mut s = intersection(q, hull[k]);
        while k > 0 && s <= bounds[k] {
            k -= 1;
            s = intersection(q, hull[k]);
        }
        k += 1;
        hull[k] = q;
        bounds[k] = s;
        bounds[k + 1] = f64::INFINITY;
    }

    k = 0;
    for (q, slot) in d.iter_mut().enumerate().take(n) {
        while bounds[k + 1] < q as f64 {
            k += 1;
        }
        let offset = q as f64 - hull[k] as f64;
        *slot = offset * offset + f[hull[k]];
    }
}

/// Chamfer similarity `exp(-c * max(avg_ab, avg_ba))`
#[derive(Debug, Clone)]
pub struct ChamferScorer {
    decay: f64,
}

impl ChamferScorer {
    pub fn new(decay: f64) -> Self {
        Self { decay }
    }

    /// Symmetric Chamfer distance: the worse of the two directed means.
    ///
    /// `None` when either edge set is empty or the rasters differ in size.
    pub fn distance(
        &self,
        submission: &EdgeSet,
        template: &EdgeSet,
        template_map: &DistanceMap,
    ) -> Option<f64> {
        if submission.dimensions() != template.dimensions()
            || template_map.dimensions() != template.dimensions()
        {
            tracing::warn!(
                submission = ?submission.dimensions(),
                template = ?template.dimensions(),
                "edge sets have different dimensions"
            );
            return None;
        }
        let submission_map = DistanceMap::from_edges(submission);

        let to_template = template_map.mean_distance(submission)?;
        let to_submission = submission_map.mean_distance(template)?;
        Some(to_template.max(to_submission))
    }

    /// Similarity in `[0, 1]` using a precomputed template distance map
    pub fn score_with_map(
        &self,
        submission: &EdgeSet,
        template: &EdgeSet,
        template_map: &DistanceMap,
    ) -> f64 {
        match self.distance(submission, template, template_map) {
            Some(d) => clamp_unit((-self.decay * d).exp()),
            None => 0.0,
        }
    }

    /// Similarity in `[0, 1]`, building the template map on the fly
    pub fn score(&self, submission: &EdgeSet, template: &EdgeSet) -> f64 {
        self.score_with_map(submission, template, &DistanceMap::from_edges(template))
    }
}
