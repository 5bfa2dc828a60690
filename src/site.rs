use crate::point::{EPSILON, Point};

/// An input point and the cell computed for it.
///
/// The outputs are overwritten by every tessellation pass and stay empty until
/// the first one.
#[derive(Clone, Debug, Default)]
pub struct Site {
    x: f64,
    y: f64,
    pub(crate) cell: Vec<usize>,
    pub(crate) neighbours: Vec<usize>,
    pub(crate) points: Vec<Point>,
    pub(crate) lies_on_edge: Option<usize>,
    pub(crate) lies_on_corner: Option<Point>,
    pub(crate) duplicate: bool,
}

impl Site {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub(crate) fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Moves the site. Outputs are cleared since they no longer describe it.
    pub(crate) fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.reset();
    }

    pub(crate) fn reset(&mut self) {
        self.cell.clear();
        self.neighbours.clear();
        self.points.clear();
        self.lies_on_edge = None;
        self.lies_on_corner = None;
        self.duplicate = false;
    }

    /// Indices into the edge list of the edges bounding this cell.
    pub fn cell(&self) -> &[usize] {
        &self.cell
    }

    /// Indices of the sites sharing an edge with this one, ascending.
    pub fn neighbours(&self) -> &[usize] {
        &self.neighbours
    }

    /// Cell vertices without duplicates, counter-clockwise.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn clockwise_points(&self) -> impl Iterator<Item = &Point> {
        self.points.iter().rev()
    }

    /// Index of the single cell edge passing through the site.
    pub fn lies_on_edge(&self) -> Option<usize> {
        self.lies_on_edge
    }

    /// The cell vertex at the site, when exactly two cell edges meet there.
    pub fn lies_on_corner(&self) -> Option<Point> {
        self.lies_on_corner
    }

    /// Whether the last tessellation skipped this site as a copy of an earlier one.
    pub fn is_duplicate(&self) -> bool {
        self.duplicate
    }

    /// Area enclosed by [`points`](Self::points).
    ///
    /// Cells touching the box are only closed when border edges were generated.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let a = &self.points[i];
            let b = &self.points[(i + 1) % n];
            area += a.x * b.y - b.x * a.y;
        }
        (area * 0.5).abs()
    }

    /// Area centroid of [`points`](Self::points), `None` if they enclose nothing.
    pub fn centroid(&self) -> Option<Point> {
        let n = self.points.len();
        if n < 3 {
            return None;
        }
        let mut cx = 0.0;
        let mut cy = 0.0;
        let mut area = 0.0;
        for i in 0..n {
            let a = &self.points[i];
            let b = &self.points[(i + 1) % n];
            let cross = a.x * b.y - b.x * a.y;
            area += cross;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }
        let span = self.span();
        if area.abs() <= EPSILON * span * span {
            return None;
        }
        let factor = 1.0 / (3.0 * area);
        Some(Point::new(cx * factor, cy * factor))
    }

    /// Larger side of the bounding rectangle of [`points`](Self::points).
    fn span(&self) -> f64 {
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        (max_x - min_x).max(max_y - min_y)
    }

    /// Whether `(x, y)` lies inside or on the polygon of [`points`](Self::points).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let slack = EPSILON * self.span();
        (0..n).all(|i| {
            let a = &self.points[i];
            let b = &self.points[(i + 1) % n];
            let cross = (b.x - a.x) * (y - a.y) - (b.y - a.y) * (x - a.x);
            cross >= -slack * b.distance(a)
        })
    }
}

impl From<[f64; 2]> for Site {
    fn from(p: [f64; 2]) -> Self {
        Site::new(p[0], p[1])
    }
}

impl From<(f64, f64)> for Site {
    fn from(p: (f64, f64)) -> Self {
        Site::new(p.0, p.1)
    }
}
