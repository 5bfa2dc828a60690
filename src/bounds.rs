use crate::error::{Error, Result};
use crate::point::{EPSILON, Point, PointBorderLocation};

/// Axis-aligned rectangle the diagram is clipped to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl BoundingBox {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    /// Builds the box from its extents, rejecting empty or non-finite rectangles.
    pub fn from_extents(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self> {
        let finite = [min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite());
        if !finite || min_x >= max_x || min_y >= max_y {
            return Err(Error::InvalidBounds {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }
        Ok(Self::new([min_x, min_y], [max_x, max_y]))
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }

    /// Distance below which two coordinates are treated as equal: [`EPSILON`]
    /// times the larger side.
    pub fn tolerance(&self) -> f64 {
        EPSILON * self.width().max(self.height())
    }

    /// Inclusive containment with [`tolerance`](Self::tolerance) slack.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let tol = self.tolerance();
        x >= self.min[0] - tol && x <= self.max[0] + tol && y >= self.min[1] - tol && y <= self.max[1] + tol
    }

    /// Corners in counter-clockwise order starting at the bottom-left one.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::with_border(self.min[0], self.min[1], PointBorderLocation::BottomLeft),
            Point::with_border(self.max[0], self.min[1], PointBorderLocation::BottomRight),
            Point::with_border(self.max[0], self.max[1], PointBorderLocation::TopRight),
            Point::with_border(self.min[0], self.max[1], PointBorderLocation::TopLeft),
        ]
    }

    /// Pulls coordinates lying within [`tolerance`](Self::tolerance) of a side
    /// exactly onto it.
    pub(crate) fn snap(&self, p: [f64; 2]) -> [f64; 2] {
        let tol = self.tolerance();
        let mut out = p;
        for axis in 0..2 {
            if (out[axis] - self.min[axis]).abs() <= tol {
                out[axis] = self.min[axis];
            } else if (out[axis] - self.max[axis]).abs() <= tol {
                out[axis] = self.max[axis];
            }
        }
        out
    }

    /// Classifies a snapped point against the sides of the box.
    pub fn border_location(&self, x: f64, y: f64) -> PointBorderLocation {
        let left = x == self.min[0];
        let right = x == self.max[0];
        let bottom = y == self.min[1];
        let top = y == self.max[1];
        match (left, right, bottom, top) {
            (true, _, true, _) => PointBorderLocation::BottomLeft,
            (_, true, true, _) => PointBorderLocation::BottomRight,
            (_, true, _, true) => PointBorderLocation::TopRight,
            (true, _, _, true) => PointBorderLocation::TopLeft,
            (true, _, _, _) => PointBorderLocation::Left,
            (_, true, _, _) => PointBorderLocation::Right,
            (_, _, true, _) => PointBorderLocation::Bottom,
            (_, _, _, true) => PointBorderLocation::Top,
            _ => PointBorderLocation::NotOnBorder,
        }
    }

    /// Distance travelled counter-clockwise along the perimeter from the
    /// bottom-left corner to a point on the border.
    pub(crate) fn perimeter_position(&self, p: &Point) -> f64 {
        let w = self.width();
        let h = self.height();
        match p.border {
            PointBorderLocation::BottomLeft => 0.0,
            PointBorderLocation::Bottom => p.x - self.min[0],
            PointBorderLocation::BottomRight => w,
            PointBorderLocation::Right => w + (p.y - self.min[1]),
            PointBorderLocation::TopRight => w + h,
            PointBorderLocation::Top => w + h + (self.max[0] - p.x),
            PointBorderLocation::TopLeft => 2.0 * w + h,
            PointBorderLocation::Left => 2.0 * w + h + (self.max[1] - p.y),
            PointBorderLocation::NotOnBorder => f64::NAN,
        }
    }

    /// Clips the parametric line `origin + t * dir`, `t` in `[t0, t1]`, against
    /// the box (Liang–Barsky). Returns the surviving parameter range.
    pub(crate) fn clip_line(&self, origin: [f64; 2], dir: [f64; 2], t0: f64, t1: f64) -> Option<(f64, f64)> {
        let tol = self.tolerance();
        let mut t0 = t0;
        let mut t1 = t1;
        let checks = [
            (-dir[0], origin[0] - self.min[0]),
            (dir[0], self.max[0] - origin[0]),
            (-dir[1], origin[1] - self.min[1]),
            (dir[1], self.max[1] - origin[1]),
        ];

        for (p, q) in checks {
            if p == 0.0 {
                // Parallel to this side: either fully inside its slab or fully out.
                if q < -tol {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                if r > t0 {
                    t0 = r;
                }
            } else {
                if r < t0 {
                    return None;
                }
                if r < t1 {
                    t1 = r;
                }
            }
        }

        if t0 > t1 { None } else { Some((t0, t1)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_bounds() {
        assert!(BoundingBox::from_extents(0.0, 0.0, 10.0, 10.0).is_ok());
        assert!(matches!(
            BoundingBox::from_extents(10.0, 0.0, 10.0, 5.0),
            Err(Error::InvalidBounds { .. })
        ));
        assert!(BoundingBox::from_extents(0.0, 0.0, f64::INFINITY, 5.0).is_err());
    }

    #[test]
    fn test_border_location() {
        let b = BoundingBox::new([0.0, 0.0], [10.0, 20.0]);
        assert_eq!(b.border_location(0.0, 0.0), PointBorderLocation::BottomLeft);
        assert_eq!(b.border_location(10.0, 20.0), PointBorderLocation::TopRight);
        assert_eq!(b.border_location(5.0, 20.0), PointBorderLocation::Top);
        assert_eq!(b.border_location(0.0, 7.0), PointBorderLocation::Left);
        assert_eq!(b.border_location(5.0, 7.0), PointBorderLocation::NotOnBorder);
    }

    #[test]
    fn test_snap() {
        let b = BoundingBox::new([0.0, 0.0], [10.0, 10.0]);
        let p = b.snap([10.0 + 1e-12, -1e-12]);
        assert_eq!(p, [10.0, 0.0]);
        assert_eq!(b.snap([5.0, 5.0]), [5.0, 5.0]);

        // The slack follows the size of the box.
        let tiny = BoundingBox::new([0.0, 0.0], [1e-5, 1e-5]);
        assert_eq!(tiny.snap([1e-5 + 1e-16, 5e-6]), [1e-5, 5e-6]);
        assert_eq!(tiny.snap([1e-7, 5e-6]), [1e-7, 5e-6]);
        assert!(!tiny.contains(1e-5 + 1e-9, 5e-6));
    }

    #[test]
    fn test_clip_full_line() {
        let b = BoundingBox::new([0.0, 0.0], [10.0, 10.0]);
        // Vertical line through x = 4.
        let (t0, t1) = b
            .clip_line([4.0, 5.0], [0.0, 1.0], f64::NEG_INFINITY, f64::INFINITY)
            .unwrap();
        assert!((t0 + 5.0).abs() < 1e-12);
        assert!((t1 - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_clip_ray_and_miss() {
        let b = BoundingBox::new([0.0, 0.0], [10.0, 10.0]);
        // Ray from the center towards the top-right corner.
        let (t0, t1) = b.clip_line([5.0, 5.0], [1.0, 1.0], 0.0, f64::INFINITY).unwrap();
        assert_eq!(t0, 0.0);
        assert!((t1 - 5.0).abs() < 1e-12);

        // Horizontal line above the box.
        assert!(b
            .clip_line([5.0, 12.0], [1.0, 0.0], f64::NEG_INFINITY, f64::INFINITY)
            .is_none());

        // Segment that ends before reaching the box.
        assert!(b.clip_line([-5.0, 5.0], [1.0, 0.0], 0.0, 2.0).is_none());
    }

    #[test]
    fn test_perimeter_order() {
        let b = BoundingBox::new([0.0, 0.0], [10.0, 10.0]);
        let bottom = Point::with_border(3.0, 0.0, PointBorderLocation::Bottom);
        let right = Point::with_border(10.0, 3.0, PointBorderLocation::Right);
        let top = Point::with_border(3.0, 10.0, PointBorderLocation::Top);
        let left = Point::with_border(0.0, 3.0, PointBorderLocation::Left);
        let order: Vec<f64> = [bottom, right, top, left].iter().map(|p| b.perimeter_position(p)).collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(b.perimeter_position(&b.corners()[3]), 30.0);
    }
}
