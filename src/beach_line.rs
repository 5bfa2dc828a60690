use rand::prelude::*;
use rand::rngs::StdRng;

use crate::event_queue::EventId;
use crate::predicates::breakpoint_x;

pub(crate) type ArcId = usize;

const PRIORITY_SEED: u64 = 0x5eed_a4c5;

/// One parabolic arc of the beach line.
#[derive(Clone, Debug)]
pub(crate) struct Arc {
    /// Index of the site this arc belongs to.
    pub site: usize,
    /// In-order neighbours.
    pub prev: Option<ArcId>,
    pub next: Option<ArcId>,
    /// Half-edges traced by the breakpoints with `prev` and `next`.
    pub left_edge: Option<usize>,
    pub right_edge: Option<usize>,
    /// Pending circle event in which this arc disappears.
    pub circle_event: Option<EventId>,
    parent: Option<ArcId>,
    left: Option<ArcId>,
    right: Option<ArcId>,
    priority: u32,
}

/// Ordered sequence of arcs, stored in an arena and indexed by a treap.
///
/// The tree has no explicit keys: its in-order traversal is the left-to-right
/// order of the arcs, and descent compares against breakpoints evaluated at the
/// current sweep position.
pub(crate) struct BeachLine {
    arcs: Vec<Arc>,
    root: Option<ArcId>,
    rng: StdRng,
    len: usize,
}

impl BeachLine {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arcs: Vec::with_capacity(capacity),
            root: None,
            rng: StdRng::seed_from_u64(PRIORITY_SEED),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn arc(&self, id: ArcId) -> &Arc {
        &self.arcs[id]
    }

    pub fn arc_mut(&mut self, id: ArcId) -> &mut Arc {
        &mut self.arcs[id]
    }

    /// Site indices from left to right.
    #[cfg(test)]
    pub fn sites(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len);
        let mut current = self.first();
        while let Some(id) = current {
            out.push(self.arcs[id].site);
            current = self.arcs[id].next;
        }
        out
    }

    #[cfg(test)]
    fn first(&self) -> Option<ArcId> {
        let mut node = self.root?;
        while let Some(left) = self.arcs[node].left {
            node = left;
        }
        Some(node)
    }

    fn alloc(&mut self, site: usize) -> ArcId {
        let id = self.arcs.len();
        let priority = self.rng.r#gen::<u32>();
        self.arcs.push(Arc {
            site,
            prev: None,
            next: None,
            left_edge: None,
            right_edge: None,
            circle_event: None,
            parent: None,
            left: None,
            right: None,
            priority,
        });
        self.len += 1;
        id
    }

    /// Starts the beach line with a single arc.
    pub fn insert_root(&mut self, site: usize) -> ArcId {
        debug_assert!(self.root.is_none());
        let id = self.alloc(site);
        self.root = Some(id);
        id
    }

    /// Inserts a new arc directly to the right of `anchor`.
    pub fn insert_after(&mut self, anchor: ArcId, site: usize) -> ArcId {
        let id = self.alloc(site);

        let next = self.arcs[anchor].next;
        self.arcs[id].prev = Some(anchor);
        self.arcs[id].next = next;
        if let Some(n) = next {
            self.arcs[n].prev = Some(id);
        }
        self.arcs[anchor].next = Some(id);

        match self.arcs[anchor].right {
            None => {
                self.arcs[anchor].right = Some(id);
                self.arcs[id].parent = Some(anchor);
            }
            Some(right) => {
                let mut node = right;
                while let Some(left) = self.arcs[node].left {
                    node = left;
                }
                self.arcs[node].left = Some(id);
                self.arcs[id].parent = Some(node);
            }
        }

        self.sift_up(id);
        id
    }

    /// Inserts a new arc directly to the left of `anchor`.
    pub fn insert_before(&mut self, anchor: ArcId, site: usize) -> ArcId {
        let id = self.alloc(site);

        let prev = self.arcs[anchor].prev;
        self.arcs[id].next = Some(anchor);
        self.arcs[id].prev = prev;
        if let Some(p) = prev {
            self.arcs[p].next = Some(id);
        }
        self.arcs[anchor].prev = Some(id);

        match self.arcs[anchor].left {
            None => {
                self.arcs[anchor].left = Some(id);
                self.arcs[id].parent = Some(anchor);
            }
            Some(left) => {
                let mut node = left;
                while let Some(right) = self.arcs[node].right {
                    node = right;
                }
                self.arcs[node].right = Some(id);
                self.arcs[id].parent = Some(node);
            }
        }

        self.sift_up(id);
        id
    }

    /// Unlinks an arc. Its slot stays in the arena so ids remain stable.
    pub fn remove(&mut self, id: ArcId) {
        let prev = self.arcs[id].prev;
        let next = self.arcs[id].next;
        if let Some(p) = prev {
            self.arcs[p].next = next;
        }
        if let Some(n) = next {
            self.arcs[n].prev = prev;
        }

        // Rotate the node down until it has at most one child, then splice it out.
        loop {
            match (self.arcs[id].left, self.arcs[id].right) {
                (Some(l), Some(r)) => {
                    let child = if self.arcs[l].priority > self.arcs[r].priority { l } else { r };
                    self.rotate_up(child);
                }
                (l, r) => {
                    let child = l.or(r);
                    let parent = self.arcs[id].parent;
                    if let Some(c) = child {
                        self.arcs[c].parent = parent;
                    }
                    self.replace_child(parent, id, child);
                    break;
                }
            }
        }

        let arc = &mut self.arcs[id];
        arc.prev = None;
        arc.next = None;
        arc.parent = None;
        arc.left = None;
        arc.right = None;
        self.len -= 1;
    }

    /// Finds the arc lying above `x` when the sweep line is at `directrix`.
    /// Foci within `tolerance` of the sweep line are treated as lying on it.
    pub fn find_arc_above(&self, x: f64, sites: &[[f64; 2]], directrix: f64, tolerance: f64) -> Option<ArcId> {
        let mut node = self.root?;
        loop {
            let arc = &self.arcs[node];
            let focus = sites[arc.site];

            let left_bp = arc
                .prev
                .map_or(f64::NEG_INFINITY, |p| breakpoint_x(sites[self.arcs[p].site], focus, directrix, tolerance));
            if x < left_bp {
                match arc.left {
                    Some(l) => {
                        node = l;
                        continue;
                    }
                    None => return Some(node),
                }
            }

            let right_bp = arc
                .next
                .map_or(f64::INFINITY, |n| breakpoint_x(focus, sites[self.arcs[n].site], directrix, tolerance));
            if x > right_bp {
                match arc.right {
                    Some(r) => {
                        node = r;
                        continue;
                    }
                    None => return Some(node),
                }
            }

            return Some(node);
        }
    }

    fn sift_up(&mut self, id: ArcId) {
        while let Some(parent) = self.arcs[id].parent {
            if self.arcs[parent].priority >= self.arcs[id].priority {
                break;
            }
            self.rotate_up(id);
        }
    }

    fn replace_child(&mut self, parent: Option<ArcId>, old: ArcId, new: Option<ArcId>) {
        match parent {
            Some(p) => {
                if self.arcs[p].left == Some(old) {
                    self.arcs[p].left = new;
                } else {
                    self.arcs[p].right = new;
                }
            }
            None => self.root = new,
        }
    }

    /// Rotates `x` above its parent, preserving the in-order sequence.
    fn rotate_up(&mut self, x: ArcId) {
        let Some(p) = self.arcs[x].parent else {
            return;
        };
        let grandparent = self.arcs[p].parent;

        if self.arcs[p].left == Some(x) {
            let inner = self.arcs[x].right;
            self.arcs[p].left = inner;
            if let Some(b) = inner {
                self.arcs[b].parent = Some(p);
            }
            self.arcs[x].right = Some(p);
        } else {
            let inner = self.arcs[x].left;
            self.arcs[p].right = inner;
            if let Some(b) = inner {
                self.arcs[b].parent = Some(p);
            }
            self.arcs[x].left = Some(p);
        }

        self.arcs[p].parent = Some(x);
        self.arcs[x].parent = grandparent;
        self.replace_child(grandparent, p, Some(x));
    }

    #[cfg(test)]
    fn check_tree(&self) {
        fn walk(line: &BeachLine, node: Option<ArcId>, out: &mut Vec<ArcId>) {
            if let Some(n) = node {
                let arc = &line.arcs[n];
                for child in [arc.left, arc.right].into_iter().flatten() {
                    assert_eq!(line.arcs[child].parent, Some(n));
                    assert!(line.arcs[child].priority <= arc.priority);
                }
                walk(line, arc.left, out);
                out.push(n);
                walk(line, arc.right, out);
            }
        }
        let mut in_order = Vec::new();
        walk(self, self.root, &mut in_order);

        let mut linked = Vec::new();
        let mut current = self.first();
        while let Some(id) = current {
            linked.push(id);
            current = self.arcs[id].next;
        }
        assert_eq!(in_order, linked);
        assert_eq!(linked.len(), self.len);
    }
}
