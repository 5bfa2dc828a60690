/// Relative tolerance of the geometric comparisons.
///
/// Distances are compared against `EPSILON` times the larger side of the
/// bounding box (see [`BoundingBox::tolerance`](crate::BoundingBox::tolerance)),
/// angles against `EPSILON` radians.
pub const EPSILON: f64 = 1e-9;

#[inline]
pub(crate) fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Where a point sits relative to the bounding rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointBorderLocation {
    #[default]
    NotOnBorder,
    Left,
    Bottom,
    Right,
    Top,
    BottomLeft,
    BottomRight,
    TopRight,
    TopLeft,
}

impl PointBorderLocation {
    pub fn is_on_border(self) -> bool {
        self != PointBorderLocation::NotOnBorder
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            PointBorderLocation::BottomLeft
                | PointBorderLocation::BottomRight
                | PointBorderLocation::TopRight
                | PointBorderLocation::TopLeft
        )
    }
}

/// A vertex of the diagram.
///
/// Equality compares coordinates only. Points handed out by a tessellation are
/// interned, so the same vertex always carries bit-identical coordinates.
#[derive(Clone, Copy, Debug, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub border: PointBorderLocation,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            border: PointBorderLocation::NotOnBorder,
        }
    }

    pub(crate) fn with_border(x: f64, y: f64, border: PointBorderLocation) -> Self {
        Self { x, y, border }
    }

    pub fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    pub fn distance_sq(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Coordinate equality within `tolerance` on both axes.
    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        approx_eq(self.x, other.x, tolerance) && approx_eq(self.y, other.y, tolerance)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl From<[f64; 2]> for Point {
    fn from(p: [f64; 2]) -> Self {
        Point::new(p[0], p[1])
    }
}

impl From<(f64, f64)> for Point {
    fn from(p: (f64, f64)) -> Self {
        Point::new(p.0, p.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_border() {
        let a = Point::new(1.0, 2.0);
        let b = Point::with_border(1.0, 2.0, PointBorderLocation::Left);
        assert_eq!(a, b);
        assert!(a.approx_eq(&Point::new(1.0 + EPSILON * 0.5, 2.0), EPSILON));
        assert!(!a.approx_eq(&Point::new(1.0 + 1e-6, 2.0), EPSILON));
        assert!(a.approx_eq(&Point::new(1.0 + 1e-6, 2.0), 1e-5));
    }

    #[test]
    fn test_corner_locations() {
        assert!(PointBorderLocation::TopLeft.is_corner());
        assert!(!PointBorderLocation::Top.is_corner());
        assert!(PointBorderLocation::Top.is_on_border());
        assert!(!PointBorderLocation::NotOnBorder.is_on_border());
    }
}
