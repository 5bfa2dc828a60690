//! Turns the raw sweep output into the final, bounded edge list.

use std::collections::HashMap;

use tracing::trace;

use crate::bounds::BoundingBox;
use crate::edge::Edge;
use crate::grid::{SiteGrid, ToleranceBuckets};
use crate::point::Point;
use crate::sweep::RawEdge;

/// Whether the sides of the bounding box are emitted as edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BorderEdgeGeneration {
    /// Only edges between two cells. Cells touching the box stay open.
    #[default]
    DoNotMakeBorderEdges,
    /// Also emit the box sides, split at every vertex on them, so that every
    /// cell is closed.
    MakeBorderEdges,
}

/// Deduplicates vertices so that every occurrence of one is bit-identical.
struct VertexPool<'a> {
    bounds: &'a BoundingBox,
    points: Vec<Point>,
    buckets: ToleranceBuckets,
}

impl<'a> VertexPool<'a> {
    fn new(bounds: &'a BoundingBox) -> Self {
        Self {
            bounds,
            points: Vec::new(),
            buckets: ToleranceBuckets::new(bounds),
        }
    }

    fn intern(&mut self, p: [f64; 2]) -> usize {
        let [x, y] = self.bounds.snap(p);
        if let Some(id) = self.buckets.find([x, y], |id| self.points[id].coords()) {
            return id;
        }

        let id = self.points.len();
        self.points
            .push(Point::with_border(x, y, self.bounds.border_location(x, y)));
        self.buckets.insert(id, [x, y]);
        id
    }
}

/// A clipped piece of a bisector, endpoints as vertex ids.
#[derive(Clone, Copy, Debug)]
struct Segment {
    a: usize,
    b: usize,
    sites: [usize; 2],
}

fn clip_raw(raw: &RawEdge, bounds: &BoundingBox) -> Option<([f64; 2], [f64; 2])> {
    let [dx, dy] = raw.direction;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return None;
    }
    let param = |p: [f64; 2]| ((p[0] - raw.anchor[0]) * dx + (p[1] - raw.anchor[1]) * dy) / len_sq;

    let mut t0 = raw.start.map_or(f64::NEG_INFINITY, param);
    let mut t1 = raw.end.map_or(f64::INFINITY, param);
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }

    let (t0, t1) = bounds.clip_line(raw.anchor, raw.direction, t0, t1)?;
    if !t0.is_finite() || !t1.is_finite() {
        return None;
    }
    let at = |t: f64| [raw.anchor[0] + t * dx, raw.anchor[1] + t * dy];
    Some((at(t0), at(t1)))
}

/// Collapses pieces of the same bisector that share an endpoint.
fn merge_collinear(segments: Vec<Segment>) -> Vec<Segment> {
    let mut by_pair: HashMap<[usize; 2], Vec<usize>> = HashMap::new();
    for (i, s) in segments.iter().enumerate() {
        let mut key = s.sites;
        key.sort_unstable();
        by_pair.entry(key).or_default().push(i);
    }

    let mut alive = vec![true; segments.len()];
    let mut segments = segments;
    for group in by_pair.values().filter(|g| g.len() > 1) {
        let mut changed = true;
        while changed {
            changed = false;
            'outer: for (k, &i) in group.iter().enumerate() {
                if !alive[i] {
                    continue;
                }
                for &j in &group[k + 1..] {
                    if !alive[j] {
                        continue;
                    }
                    let (si, sj) = (segments[i], segments[j]);
                    let same = (si.a == sj.a && si.b == sj.b) || (si.a == sj.b && si.b == sj.a);
                    let joined = if same {
                        Some((si.a, si.b))
                    } else if si.b == sj.a {
                        Some((si.a, sj.b))
                    } else if si.b == sj.b {
                        Some((si.a, sj.a))
                    } else if si.a == sj.a {
                        Some((si.b, sj.b))
                    } else if si.a == sj.b {
                        Some((sj.a, si.b))
                    } else {
                        None
                    };
                    if let Some((a, b)) = joined {
                        segments[i].a = a;
                        segments[i].b = b;
                        alive[j] = false;
                        changed = true;
                        break 'outer;
                    }
                }
            }
        }
    }

    segments
        .into_iter()
        .zip(alive)
        .filter_map(|(s, keep)| keep.then_some(s))
        .collect()
}

/// Clips the sweep output to `bounds` and orients every edge.
///
/// In [`BorderEdgeGeneration::MakeBorderEdges`] mode the box sides follow the
/// internal edges, counter-clockwise from the bottom-left corner.
pub(crate) fn clip_edges(
    raw: &[RawEdge],
    positions: &[[f64; 2]],
    active: &[usize],
    bounds: &BoundingBox,
    mode: BorderEdgeGeneration,
) -> Vec<Edge> {
    let mut pool = VertexPool::new(bounds);
    let mut segments = Vec::with_capacity(raw.len());

    for edge in raw {
        let Some((p0, p1)) = clip_raw(edge, bounds) else {
            continue;
        };
        let a = pool.intern(p0);
        let b = pool.intern(p1);
        if a == b || pool.points[a].distance(&pool.points[b]) < bounds.tolerance() {
            continue;
        }
        segments.push(Segment { a, b, sites: edge.sites });
    }
    let clipped = segments.len();
    let segments = merge_collinear(segments);
    trace!(raw = raw.len(), clipped, merged = segments.len(), "clipped edges");

    let mut edges: Vec<Edge> = segments
        .iter()
        .map(|s| {
            let start = pool.points[s.a];
            let end = pool.points[s.b];
            let [u, v] = s.sites;
            let site = positions[u];
            let cross = (end.x - start.x) * (site[1] - start.y) - (end.y - start.y) * (site[0] - start.x);
            let (left, right) = if cross > 0.0 { (u, v) } else { (v, u) };
            Edge::new(start, end, Some(left), Some(right))
        })
        .collect();

    if mode == BorderEdgeGeneration::MakeBorderEdges && !active.is_empty() {
        let mut on_border: Vec<usize> = segments
            .iter()
            .flat_map(|s| [s.a, s.b])
            .filter(|&id| pool.points[id].border.is_on_border())
            .collect();
        for corner in bounds.corners() {
            on_border.push(pool.intern(corner.coords()));
        }
        on_border.sort_unstable_by(|&i, &j| {
            bounds
                .perimeter_position(&pool.points[i])
                .total_cmp(&bounds.perimeter_position(&pool.points[j]))
        });
        on_border.dedup();

        let grid = SiteGrid::new(bounds, positions, active);
        let n = on_border.len();
        for k in 0..n {
            let start = pool.points[on_border[k]];
            let end = pool.points[on_border[(k + 1) % n]];
            let mid = [(start.x + end.x) * 0.5, (start.y + end.y) * 0.5];
            let owner = grid.nearest(positions, mid);
            edges.push(Edge::new(start, end, owner, None));
        }
    }

    edges
}
