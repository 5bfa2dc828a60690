//! Geometric predicates for the sweep.
//!
//! The sweep line moves towards increasing `y`. Every site already passed lies
//! below it, and the beach line is the upper envelope of the parabolas with those
//! sites as foci and the sweep line as shared directrix.

use crate::point::{EPSILON, approx_eq};

/// Twice the signed area of the triangle `(a, b, c)`. Positive for a
/// counter-clockwise turn.
#[inline]
pub(crate) fn orientation(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

#[inline]
pub(crate) fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

/// Whether `a -> b -> c` turns left by more than [`EPSILON`] radians, roughly.
///
/// The orientation is compared against the lengths of the legs, so the answer
/// does not depend on the scale of the input.
#[inline]
pub(crate) fn turns_left(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> bool {
    orientation(a, b, c) > EPSILON * distance(a, b) * distance(a, c)
}

/// Whether the three points lie on one line, within [`EPSILON`] relative to
/// the legs.
#[inline]
pub(crate) fn collinear(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> bool {
    orientation(a, b, c).abs() <= EPSILON * distance(a, b) * distance(a, c)
}

/// Center of the circle through three points, `None` when they are collinear.
pub(crate) fn circumcenter(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Option<[f64; 2]> {
    if collinear(a, b, c) {
        return None;
    }

    let bx = b[0] - a[0];
    let by = b[1] - a[1];
    let cx = c[0] - a[0];
    let cy = c[1] - a[1];

    let d = 2.0 * (bx * cy - by * cx);
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;
    let center = [a[0] + ux, a[1] + uy];

    (center[0].is_finite() && center[1].is_finite()).then_some(center)
}

/// Height of the parabola with the given focus and directrix at `x`.
///
/// Undefined for a focus lying on the directrix; callers handle that case
/// as a vertical ray.
pub(crate) fn parabola_y(focus: [f64; 2], directrix: f64, x: f64) -> f64 {
    let dx = x - focus[0];
    dx * dx / (2.0 * (focus[1] - directrix)) + (focus[1] + directrix) * 0.5
}

/// X coordinate of the breakpoint between the arc of `left` and the arc of
/// `right` (in beach line order) for the given sweep position.
///
/// Foci within `tolerance` of the sweep line count as lying on it.
pub(crate) fn breakpoint_x(left: [f64; 2], right: [f64; 2], directrix: f64, tolerance: f64) -> f64 {
    let left_flat = approx_eq(left[1], directrix, tolerance);
    let right_flat = approx_eq(right[1], directrix, tolerance);
    match (left_flat, right_flat) {
        (true, true) => return (left[0] + right[0]) * 0.5,
        (true, false) => return left[0],
        (false, true) => return right[0],
        (false, false) => {}
    }

    if approx_eq(left[1], right[1], tolerance) {
        return (left[0] + right[0]) * 0.5;
    }

    let dl = 2.0 * (left[1] - directrix);
    let dr = 2.0 * (right[1] - directrix);

    let a = 1.0 / dl - 1.0 / dr;
    let b = -2.0 * (left[0] / dl - right[0] / dr);
    let c = left[0] * left[0] / dl - right[0] * right[0] / dr + (left[1] - right[1]) * 0.5;

    let disc = (b * b - 4.0 * a * c).max(0.0).sqrt();
    let x1 = (-b - disc) / (2.0 * a);
    let x2 = (-b + disc) / (2.0 * a);
    let (lo, hi) = if x1 < x2 { (x1, x2) } else { (x2, x1) };

    // The arc whose focus is closer to the sweep line is the narrower one and
    // owns the span between the two intersections.
    if left[1] > right[1] { hi } else { lo }
}
