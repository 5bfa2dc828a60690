use crate::point::Point;

/// One segment of the diagram.
///
/// Internal edges separate two cells and are oriented so that `left` lies to
/// the left of `start -> end`. Border edges run counter-clockwise along the
/// bounding box and only have `left`, the cell they close.
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl Edge {
    pub fn new(start: Point, end: Point, left: Option<usize>, right: Option<usize>) -> Self {
        Self { start, end, left, right }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    pub fn mid(&self) -> Point {
        Point::new((self.start.x + self.end.x) * 0.5, (self.start.y + self.end.y) * 0.5)
    }

    /// Whether the edge lies on the bounding box rather than between two cells.
    pub fn is_border(&self) -> bool {
        self.right.is_none()
    }

    /// Distance from `p` to the closest point of the segment.
    pub fn distance_to(&self, p: &Point) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.start.distance(p);
        }
        let t = (((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / len_sq).clamp(0.0, 1.0);
        p.distance(&Point::new(self.start.x + t * dx, self.start.y + t * dy))
    }

    /// Whether `p` lies within `tolerance` of the segment. A tessellation
    /// uses [`BoundingBox::tolerance`](crate::BoundingBox::tolerance).
    pub fn contains(&self, p: &Point, tolerance: f64) -> bool {
        self.distance_to(p) <= tolerance
    }

    /// Whether the edge bounds the cell of `site`.
    pub fn has_site(&self, site: usize) -> bool {
        self.left == Some(site) || self.right == Some(site)
    }

    /// The cell on the other side of the edge, `None` for border edges or if
    /// `site` is not on either side.
    pub fn other_site(&self, site: usize) -> Option<usize> {
        if self.left == Some(site) {
            self.right
        } else if self.right == Some(site) {
            self.left
        } else {
            None
        }
    }
}

/// Undirected: `a -> b` equals `b -> a`.
impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        (self.start == other.start && self.end == other.end) || (self.start == other.end && self.end == other.start)
    }
}
