use std::collections::HashMap;

use crate::bounds::BoundingBox;

/// A uniform grid over the bounding box answering nearest-site queries.
///
/// Sites are bucketed once; a query visits bins in order of their minimal
/// possible distance and stops as soon as no unvisited bin can beat the best
/// candidate found so far.
pub(crate) struct SiteGrid {
    res_x: usize,
    res_y: usize,
    scale_x: f64,
    scale_y: f64,
    limit_x: f64,
    limit_y: f64,
    min: [f64; 2],
    bins: Vec<Vec<usize>>,
    /// Bin offsets sorted by the squared lower bound of their distance.
    search_order: Vec<(isize, isize, f64)>,
}

impl SiteGrid {
    /// Buckets `positions[i]` for every `i` in `active`, using about one site per bin.
    pub fn new(bounds: &BoundingBox, positions: &[[f64; 2]], active: &[usize]) -> Self {
        let per_axis = (active.len() as f64).sqrt().ceil().max(1.0) as usize;
        let mut grid = Self::with_resolution(per_axis, per_axis, bounds);
        for &i in active {
            let bin = grid.bin_index(positions[i]);
            grid.bins[bin].push(i);
        }
        grid
    }

    fn with_resolution(nx: usize, ny: usize, bounds: &BoundingBox) -> Self {
        let sx = nx as f64 / bounds.width();
        let sy = ny as f64 / bounds.height();
        let cell_x = 1.0 / sx;
        let cell_y = 1.0 / sy;

        let gap = |d: isize, cell: f64| {
            if d == 0 { 0.0 } else { (d.unsigned_abs() - 1) as f64 * cell }
        };

        let rx = nx as isize;
        let ry = ny as isize;
        let mut search_order = Vec::with_capacity(((2 * rx + 1) * (2 * ry + 1)) as usize);
        for dy in -ry..=ry {
            for dx in -rx..=rx {
                let mx = gap(dx, cell_x);
                let my = gap(dy, cell_y);
                search_order.push((dx, dy, mx * mx + my * my));
            }
        }
        search_order.sort_unstable_by(|a, b| a.2.total_cmp(&b.2));

        Self {
            res_x: nx,
            res_y: ny,
            scale_x: sx,
            scale_y: sy,
            limit_x: nx as f64 - 1e-5,
            limit_y: ny as f64 - 1e-5,
            min: bounds.min,
            bins: vec![Vec::new(); nx * ny],
            search_order,
        }
    }

    fn bin_coords(&self, p: [f64; 2]) -> (usize, usize) {
        let ix = ((p[0] - self.min[0]) * self.scale_x).clamp(0.0, self.limit_x) as usize;
        let iy = ((p[1] - self.min[1]) * self.scale_y).clamp(0.0, self.limit_y) as usize;
        (ix, iy)
    }

    fn bin_index(&self, p: [f64; 2]) -> usize {
        let (ix, iy) = self.bin_coords(p);
        ix + iy * self.res_x
    }

    /// Index of the site closest to `p`. Ties go to the lower index.
    pub fn nearest(&self, positions: &[[f64; 2]], p: [f64; 2]) -> Option<usize> {
        let (ix, iy) = self.bin_coords(p);
        let mut best: Option<(usize, f64)> = None;

        for &(dx, dy, min_d2) in &self.search_order {
            if let Some((_, best_d2)) = best {
                if min_d2 > best_d2 {
                    break;
                }
            }

            let bx = ix as isize + dx;
            let by = iy as isize + dy;
            if bx < 0 || by < 0 || bx >= self.res_x as isize || by >= self.res_y as isize {
                continue;
            }

            for &j in &self.bins[bx as usize + by as usize * self.res_x] {
                let ddx = positions[j][0] - p[0];
                let ddy = positions[j][1] - p[1];
                let d2 = ddx * ddx + ddy * ddy;
                let better = match best {
                    None => true,
                    Some((k, best_d2)) => d2 < best_d2 || (d2 == best_d2 && j < k),
                };
                if better {
                    best = Some((j, d2));
                }
            }
        }

        best.map(|(j, _)| j)
    }
}

/// Hashes points into square buckets of side `tolerance`, so that points
/// within `tolerance` of each other are found without a scan.
pub(crate) struct ToleranceBuckets {
    origin: [f64; 2],
    tolerance: f64,
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl ToleranceBuckets {
    pub fn new(bounds: &BoundingBox) -> Self {
        Self {
            origin: bounds.min,
            tolerance: bounds.tolerance(),
            buckets: HashMap::new(),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn key(&self, p: [f64; 2]) -> (i64, i64) {
        (
            ((p[0] - self.origin[0]) / self.tolerance).floor() as i64,
            ((p[1] - self.origin[1]) / self.tolerance).floor() as i64,
        )
    }

    pub fn insert(&mut self, id: usize, p: [f64; 2]) {
        let key = self.key(p);
        self.buckets.entry(key).or_default().push(id);
    }

    /// Lowest id whose point, given by `point_of`, is within `tolerance` of `p`
    /// on both axes.
    pub fn find(&self, p: [f64; 2], point_of: impl Fn(usize) -> [f64; 2]) -> Option<usize> {
        let (kx, ky) = self.key(p);
        let mut found: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = self.buckets.get(&(kx.saturating_add(dx), ky.saturating_add(dy))) else {
                    continue;
                };
                for &id in bucket {
                    let q = point_of(id);
                    let close = (q[0] - p[0]).abs() <= self.tolerance && (q[1] - p[1]).abs() <= self.tolerance;
                    if close && found.is_none_or(|f| id < f) {
                        found = Some(id);
                    }
                }
            }
        }
        found
    }
}
