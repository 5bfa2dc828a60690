use crate::bounds::BoundingBox;
use crate::point::EPSILON;

/// Scratch buffers reused between clips.
#[derive(Default, Clone)]
pub(crate) struct CellScratch {
    vertices: Vec<f64>,
    neighbors: Vec<Option<usize>>,
    dists: Vec<f64>,
}

/// A closed convex cell, built by cutting the bounding box with half-planes.
///
/// Independent of the sweep: relaxation uses it to get closed cells for
/// centroids, and tests use it as a brute-force reference.
#[derive(Clone, Debug)]
pub(crate) struct CellPolygon {
    // Larger side of the box the cell was cut from.
    scale: f64,
    // Flat array of vertices [x, y, x, y, ...], counter-clockwise.
    vertices: Vec<f64>,
    // Site across each edge; edge i starts at vertex i. `None` for box sides.
    edge_neighbors: Vec<Option<usize>>,
}

impl CellPolygon {
    pub fn new(bounds: &BoundingBox) -> Self {
        let vertices = vec![
            bounds.min[0], bounds.min[1], // bottom-left
            bounds.max[0], bounds.min[1], // bottom-right
            bounds.max[0], bounds.max[1], // top-right
            bounds.min[0], bounds.max[1], // top-left
        ];
        Self {
            scale: bounds.width().max(bounds.height()),
            vertices,
            edge_neighbors: vec![None; 4],
        }
    }

    /// The cell of `site` restricted to the bisectors with `candidates`.
    ///
    /// Exact whenever `candidates` contains every Voronoi neighbour of the site.
    pub fn build(
        site: usize,
        positions: &[[f64; 2]],
        candidates: impl IntoIterator<Item = usize>,
        bounds: &BoundingBox,
        scratch: &mut CellScratch,
    ) -> Self {
        let mut cell = Self::new(bounds);
        let g = positions[site];
        for other in candidates {
            if other == site {
                continue;
            }
            let n = positions[other];
            let mid = [(g[0] + n[0]) * 0.5, (g[1] + n[1]) * 0.5];
            let normal = [n[0] - g[0], n[1] - g[1]];
            cell.clip(&mid, &normal, other, scratch);
            if cell.is_empty() {
                break;
            }
        }
        cell
    }

    pub fn len(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex(&self, i: usize) -> [f64; 2] {
        [self.vertices[i * 2], self.vertices[i * 2 + 1]]
    }

    #[cfg(test)]
    pub fn edge_neighbors(&self) -> &[Option<usize>] {
        &self.edge_neighbors
    }

    pub fn area(&self) -> f64 {
        let n = self.len();
        if n < 3 {
            return 0.0;
        }

        let mut area = 0.0;
        for i in 0..n {
            let [xi, yi] = self.vertex(i);
            let [xj, yj] = self.vertex((i + 1) % n);
            area += xi * yj - xj * yi;
        }
        (area * 0.5).abs()
    }

    /// Area centroid. `None` for collapsed cells.
    pub fn centroid(&self) -> Option<[f64; 2]> {
        let n = self.len();
        if n < 3 {
            return None;
        }

        let mut cx = 0.0;
        let mut cy = 0.0;
        let mut area = 0.0;
        for i in 0..n {
            let [xi, yi] = self.vertex(i);
            let [xj, yj] = self.vertex((i + 1) % n);
            let cross = xi * yj - xj * yi;
            area += cross;
            cx += (xi + xj) * cross;
            cy += (yi + yj) * cross;
        }

        if area.abs() <= EPSILON * self.scale * self.scale {
            return None;
        }

        let factor = 1.0 / (3.0 * area);
        Some([cx * factor, cy * factor])
    }

    /// Keeps the part of the cell where `(v - point) · normal <= 0`.
    ///
    /// Returns whether the cell changed.
    pub fn clip(&mut self, point: &[f64; 2], normal: &[f64; 2], neighbor: usize, scratch: &mut CellScratch) -> bool {
        let [px, py] = *point;
        let [nx, ny] = *normal;

        let num_verts = self.len();
        if num_verts < 3 {
            return false;
        }
        // `d` below is a distance scaled by the length of `normal`.
        let eps = EPSILON * self.scale * (nx * nx + ny * ny).sqrt();

        scratch.dists.clear();
        let mut all_inside = true;
        let mut all_outside = true;
        for i in 0..num_verts {
            let [vx, vy] = self.vertex(i);
            let d = (vx - px) * nx + (vy - py) * ny;
            scratch.dists.push(d);
            if d > eps {
                all_inside = false;
            } else if d < -eps {
                all_outside = false;
            }
        }

        if all_inside {
            return false;
        }
        if all_outside {
            self.vertices.clear();
            self.edge_neighbors.clear();
            return true;
        }

        scratch.vertices.clear();
        scratch.neighbors.clear();

        for i in 0..num_verts {
            let j = (i + 1) % num_verts;
            let d_i = scratch.dists[i];
            let d_j = scratch.dists[j];
            let edge_neighbor = self.edge_neighbors[i];
            let [xi, yi] = self.vertex(i);
            let [xj, yj] = self.vertex(j);

            if d_i <= eps {
                scratch.vertices.extend_from_slice(&[xi, yi]);
                scratch.neighbors.push(edge_neighbor);

                if d_j > eps {
                    // Leaving: the edge is cut, the clipping line follows.
                    let t = d_i / (d_i - d_j);
                    scratch.vertices.extend_from_slice(&[xi + t * (xj - xi), yi + t * (yj - yi)]);
                    scratch.neighbors.push(Some(neighbor));
                }
            } else if d_j <= eps {
                // Entering: the rest of the edge survives.
                let t = d_i / (d_i - d_j);
                scratch.vertices.extend_from_slice(&[xi + t * (xj - xi), yi + t * (yj - yi)]);
                scratch.neighbors.push(edge_neighbor);
            }
        }

        std::mem::swap(&mut self.vertices, &mut scratch.vertices);
        std::mem::swap(&mut self.edge_neighbors, &mut scratch.neighbors);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_cell() {
        let bounds = BoundingBox::new([0.0, 0.0], [1.0, 1.0]);
        let cell = CellPolygon::new(&bounds);
        assert!((cell.area() - 1.0).abs() < 1e-12);
        let c = cell.centroid().unwrap();
        assert!((c[0] - 0.5).abs() < 1e-12);
        assert!((c[1] - 0.5).abs() < 1e-12);
        assert!(cell.edge_neighbors().iter().all(Option::is_none));
    }

    #[test]
    fn test_clip_half() {
        let bounds = BoundingBox::new([0.0, 0.0], [1.0, 1.0]);
        let mut cell = CellPolygon::new(&bounds);
        let mut scratch = CellScratch::default();

        // Keeps x <= 0.5.
        assert!(cell.clip(&[0.5, 0.5], &[1.0, 0.0], 10, &mut scratch));
        assert_eq!(cell.len(), 4);
        assert!((cell.area() - 0.5).abs() < 1e-12);
        assert!((cell.centroid().unwrap()[0] - 0.25).abs() < 1e-12);
        assert_eq!(cell.edge_neighbors().iter().filter(|n| **n == Some(10)).count(), 1);

        // A line beyond the cell changes nothing.
        assert!(!cell.clip(&[0.8, 0.5], &[1.0, 0.0], 11, &mut scratch));
    }

    #[test]
    fn test_build_from_sites() {
        let bounds = BoundingBox::new([0.0, 0.0], [100.0, 100.0]);
        let positions = [[25.0, 25.0], [75.0, 25.0], [25.0, 75.0], [75.0, 75.0]];
        let mut scratch = CellScratch::default();
        let cell = CellPolygon::build(0, &positions, 0..4, &bounds, &mut scratch);
        assert!((cell.area() - 2500.0).abs() < 1e-9);
        let c = cell.centroid().unwrap();
        assert!((c[0] - 25.0).abs() < 1e-9);
        assert!((c[1] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_tiny_box() {
        let bounds = BoundingBox::new([0.0, 0.0], [1e-5, 1e-5]);
        let positions = [[2.5e-6, 2.5e-6], [7.5e-6, 2.5e-6], [2.5e-6, 7.5e-6], [7.5e-6, 7.5e-6], [5e-6, 5e-6]];
        let mut scratch = CellScratch::default();
        let total: f64 = (0..positions.len())
            .map(|i| CellPolygon::build(i, &positions, 0..positions.len(), &bounds, &mut scratch).area())
            .sum();
        assert!((total - 1e-10).abs() < 1e-22);
        let center = CellPolygon::build(4, &positions, 0..positions.len(), &bounds, &mut scratch);
        assert!((center.area() - 1.25e-11).abs() < 1e-22);
        assert!(center.centroid().is_some());
    }
}
