//! Fortune's sweep.
//!
//! The builder consumes site and circle events in order and records the
//! breakpoints traced by the beach line as half-edges. A half-edge knows the
//! line it lies on (`anchor + t * direction`) and the vertex where it stops, if
//! any. Unbounded pieces are left to the clipper.

use tracing::{trace, warn};

use crate::beach_line::{ArcId, BeachLine};
use crate::event_queue::{Event, EventQueue};
use crate::point::approx_eq;
use crate::predicates::{circumcenter, collinear, distance, parabola_y, turns_left};

/// A breakpoint trajectory.
#[derive(Clone, Debug)]
struct HalfEdge {
    /// Sites of the arcs to the left and to the right of the breakpoint.
    sites: [usize; 2],
    anchor: [f64; 2],
    /// Direction the breakpoint moves in as the sweep advances.
    direction: [f64; 2],
    /// Vertex the breakpoint started from, `None` for pieces born on an arc.
    origin: Option<[f64; 2]>,
    /// Vertex where the breakpoint vanished.
    end: Option<[f64; 2]>,
    /// The half-edge traced by the opposite breakpoint of the same split.
    twin: Option<usize>,
    /// Set when a later site showed the breakpoint never traced anything.
    retired: bool,
}

impl HalfEdge {
    fn new(sites: [usize; 2], anchor: [f64; 2], direction: [f64; 2]) -> Self {
        Self {
            sites,
            anchor,
            direction,
            origin: None,
            end: None,
            twin: None,
            retired: false,
        }
    }

    /// A half-edge starting at the Voronoi vertex `origin`.
    fn from_vertex(sites: [usize; 2], origin: [f64; 2], direction: [f64; 2]) -> Self {
        Self {
            origin: Some(origin),
            ..Self::new(sites, origin, direction)
        }
    }
}

/// A Voronoi edge before clipping: the part of the line `anchor + t * direction`
/// running from `start` to `end`, either of which may be unbounded.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RawEdge {
    pub sites: [usize; 2],
    pub anchor: [f64; 2],
    pub direction: [f64; 2],
    pub start: Option<[f64; 2]>,
    pub end: Option<[f64; 2]>,
}

/// Direction of the breakpoint between the arc of `left` and the arc of `right`.
#[inline]
fn breakpoint_direction(left: [f64; 2], right: [f64; 2]) -> [f64; 2] {
    [left[1] - right[1], right[0] - left[0]]
}

/// Owns all state of one sweep.
pub(crate) struct Builder<'a> {
    sites: &'a [[f64; 2]],
    queue: EventQueue,
    beach: BeachLine,
    half_edges: Vec<HalfEdge>,
    sweep_y: f64,
    tolerance: f64,
}

impl<'a> Builder<'a> {
    /// Prepares a sweep over `sites[i]` for every `i` in `active`. Heights
    /// closer than `tolerance` count as equal.
    pub fn new(sites: &'a [[f64; 2]], active: &[usize], tolerance: f64) -> Self {
        let mut queue = EventQueue::with_capacity(active.len() * 3);
        for &site in active {
            let [x, y] = sites[site];
            queue.insert(Event::Site { site, x, y });
        }
        Self {
            sites,
            queue,
            beach: BeachLine::with_capacity(active.len() * 2),
            half_edges: Vec::with_capacity(active.len() * 3),
            sweep_y: f64::NEG_INFINITY,
            tolerance,
        }
    }

    /// Runs the sweep to completion.
    pub fn run(mut self) -> Vec<RawEdge> {
        trace!(events = self.queue.len(), "sweep started");
        while let Some(event) = self.queue.pop_next() {
            match event {
                Event::Site { site, y, .. } => {
                    self.sweep_y = y;
                    trace!(site, y, "site event");
                    self.handle_site(site);
                }
                Event::Circle { arc, center, y } => {
                    self.sweep_y = y;
                    trace!(arc, x = center[0], y = center[1], "circle event");
                    self.handle_circle(arc, center);
                }
            }
        }
        debug_assert!(self.queue.is_empty());
        trace!(
            arcs = self.beach.len(),
            half_edges = self.half_edges.len(),
            "sweep finished"
        );
        self.finish()
    }

    fn push_half_edge(&mut self, edge: HalfEdge) -> usize {
        self.half_edges.push(edge);
        self.half_edges.len() - 1
    }

    fn handle_site(&mut self, site: usize) {
        let p = self.sites[site];
        if self.beach.is_empty() {
            self.beach.insert_root(site);
            return;
        }

        let Some(arc) = self.beach.find_arc_above(p[0], self.sites, p[1], self.tolerance) else {
            return;
        };
        let above_site = self.beach.arc(arc).site;
        let q = self.sites[above_site];

        if approx_eq(q[1], p[1], self.tolerance) {
            self.insert_flat(arc, site);
            return;
        }

        self.remove_circle_event(arc);

        let start = [p[0], parabola_y(q, p[1], p[0])];
        let direction = breakpoint_direction(q, p);
        let left_edge = self.push_half_edge(HalfEdge {
            twin: Some(self.half_edges.len() + 1),
            ..HalfEdge::new([above_site, site], start, direction)
        });
        let right_edge = self.push_half_edge(HalfEdge {
            twin: Some(left_edge),
            ..HalfEdge::new([site, above_site], start, [-direction[0], -direction[1]])
        });

        // The split arc keeps its left half; a copy takes the right half.
        let outer_right_edge = self.beach.arc(arc).right_edge;
        let middle = self.beach.insert_after(arc, site);
        let right = self.beach.insert_after(middle, above_site);

        self.beach.arc_mut(arc).right_edge = Some(left_edge);
        {
            let m = self.beach.arc_mut(middle);
            m.left_edge = Some(left_edge);
            m.right_edge = Some(right_edge);
        }
        {
            let r = self.beach.arc_mut(right);
            r.left_edge = Some(right_edge);
            r.right_edge = outer_right_edge;
        }

        self.check_circle(arc);
        self.check_circle(right);
    }

    /// Inserts a site lying on the same horizontal line as the arc above it.
    ///
    /// The new arc is still a vertical ray, so nothing is split: it goes next
    /// to the old one, on the side of its site. If another arc already follows
    /// on that side, the breakpoint between the two stops at the Voronoi vertex
    /// of the three sites, or vanishes if they are collinear.
    fn insert_flat(&mut self, arc: ArcId, site: usize) {
        let p = self.sites[site];
        let above_site = self.beach.arc(arc).site;
        let after = p[0] > self.sites[above_site][0];

        self.remove_circle_event(arc);
        let (left, right) = if after {
            (Some(arc), self.beach.arc(arc).next)
        } else {
            (self.beach.arc(arc).prev, Some(arc))
        };

        let mut vertex = None;
        if let (Some(l), Some(r)) = (left, right) {
            self.remove_circle_event(if after { r } else { l });
            let left_site = self.beach.arc(l).site;
            let right_site = self.beach.arc(r).site;
            let (a, c) = (self.sites[left_site], self.sites[right_site]);
            vertex = if collinear(a, p, c) { None } else { circumcenter(a, p, c) };
            warn!(site, left_site, right_site, ?vertex, "flat insertion between two arcs");

            if let Some(between) = self.beach.arc(l).right_edge {
                match vertex {
                    Some(v) => self.half_edges[between].end = Some(v),
                    None => self.half_edges[between].retired = true,
                }
            }
        }

        let new_arc = if after {
            self.beach.insert_after(arc, site)
        } else {
            self.beach.insert_before(arc, site)
        };

        let left_edge = left.map(|l| self.flat_bisector([self.beach.arc(l).site, site], vertex));
        let right_edge = right.map(|r| self.flat_bisector([site, self.beach.arc(r).site], vertex));

        if let Some(l) = left {
            self.beach.arc_mut(l).right_edge = left_edge;
        }
        if let Some(r) = right {
            self.beach.arc_mut(r).left_edge = right_edge;
        }
        let a = self.beach.arc_mut(new_arc);
        a.left_edge = left_edge;
        a.right_edge = right_edge;

        for id in [left, Some(new_arc), right].into_iter().flatten() {
            self.check_circle(id);
        }
    }

    /// Bisector of a flat insertion, starting at `vertex` if there is one.
    fn flat_bisector(&mut self, sites: [usize; 2], vertex: Option<[f64; 2]>) -> usize {
        let (a, b) = (self.sites[sites[0]], self.sites[sites[1]]);
        let direction = breakpoint_direction(a, b);
        self.push_half_edge(match vertex {
            Some(v) => HalfEdge::from_vertex(sites, v, direction),
            None => HalfEdge::new(sites, [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5], direction),
        })
    }

    fn handle_circle(&mut self, arc: ArcId, vertex: [f64; 2]) {
        self.beach.arc_mut(arc).circle_event = None;

        let (Some(prev), Some(next)) = (self.beach.arc(arc).prev, self.beach.arc(arc).next) else {
            return;
        };

        for edge in [self.beach.arc(arc).left_edge, self.beach.arc(arc).right_edge]
            .into_iter()
            .flatten()
        {
            self.half_edges[edge].end = Some(vertex);
        }

        self.remove_circle_event(prev);
        self.remove_circle_event(next);
        self.beach.remove(arc);

        let left_site = self.beach.arc(prev).site;
        let right_site = self.beach.arc(next).site;
        let edge = self.push_half_edge(HalfEdge::from_vertex(
            [left_site, right_site],
            vertex,
            breakpoint_direction(self.sites[left_site], self.sites[right_site]),
        ));
        self.beach.arc_mut(prev).right_edge = Some(edge);
        self.beach.arc_mut(next).left_edge = Some(edge);

        self.check_circle(prev);
        self.check_circle(next);
    }

    /// Schedules the collapse of `arc` if its neighbours converge over it.
    fn check_circle(&mut self, arc: ArcId) {
        let (Some(prev), Some(next)) = (self.beach.arc(arc).prev, self.beach.arc(arc).next) else {
            return;
        };
        let left_site = self.beach.arc(prev).site;
        let right_site = self.beach.arc(next).site;
        if left_site == right_site {
            return;
        }

        let a = self.sites[left_site];
        let b = self.sites[self.beach.arc(arc).site];
        let c = self.sites[right_site];
        if !turns_left(a, b, c) {
            return;
        }
        let Some(center) = circumcenter(a, b, c) else {
            return;
        };

        let y = center[1] + distance(center, b);
        if y < self.sweep_y - self.tolerance {
            return;
        }

        let id = self.queue.insert(Event::Circle { arc, center, y });
        self.beach.arc_mut(arc).circle_event = Some(id);
    }

    fn remove_circle_event(&mut self, arc: ArcId) {
        if let Some(id) = self.beach.arc_mut(arc).circle_event.take() {
            self.queue.remove_if_present(id);
        }
    }

    /// Joins twin half-edges into full edges.
    fn finish(self) -> Vec<RawEdge> {
        // The piece traced by a single half-edge, from where it was born.
        let alone = |edge: &HalfEdge| RawEdge {
            sites: edge.sites,
            anchor: edge.anchor,
            direction: edge.direction,
            start: edge.origin.or(edge.twin.map(|_| edge.anchor)),
            end: edge.end,
        };

        let mut out = Vec::with_capacity(self.half_edges.len());
        for (i, edge) in self.half_edges.iter().enumerate() {
            match edge.twin {
                Some(twin) if twin < i => {}
                Some(twin) => {
                    let other = &self.half_edges[twin];
                    match (edge.retired, other.retired) {
                        (false, false) => out.push(RawEdge {
                            sites: edge.sites,
                            anchor: edge.anchor,
                            direction: other.direction,
                            start: edge.end,
                            end: other.end,
                        }),
                        (false, true) => out.push(alone(edge)),
                        (true, false) => out.push(alone(other)),
                        (true, true) => {}
                    }
                }
                None if edge.retired => {}
                None => out.push(alone(edge)),
            }
        }
        out
    }
}
