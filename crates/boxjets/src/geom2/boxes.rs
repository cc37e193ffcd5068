//! Rotated rectangles: corners from parameters and back.
//!
//! Winding invariant
//! - Corners are always produced from the unrotated offsets
//!   `(−w/2, −h/2), (+w/2, −h/2), (+w/2, +h/2), (−w/2, +h/2)` in this order,
//!   then rotated counter-clockwise by the box angle about the center.
//! - Corner `k` and corner `k+1 (mod 4)` share an edge; edges 0→1 and 2→3 have
//!   length `w`, edges 1→2 and 3→0 have length `h`.
//! - Every consumer (jet orientation, IOU, envelopes) reads corners through this
//!   module, so the order never has to be re-derived.

use nalgebra::Matrix2;

use super::types::{BoxParams, Point, Quad};
use super::util::wrap_angle;

/// 2×2 counter-clockwise rotation matrix.
#[inline]
pub fn rotation(angle: f64) -> Matrix2<f64> {
    let (s, c) = angle.sin_cos();
    Matrix2::new(c, -s, s, c)
}

/// Corners of the `w × h` rectangle centered at `(cx, cy)` and rotated by `angle` (radians).
///
/// No closing point is appended. Non-finite inputs propagate into the corners.
pub fn compute_box_corners(cx: f64, cy: f64, w: f64, h: f64, angle: f64) -> Quad {
    let center = Point::new(cx, cy);
    let rot = rotation(angle);
    let (hw, hh) = (w / 2.0, h / 2.0);
    [
        center + rot * Point::new(-hw, -hh),
        center + rot * Point::new(hw, -hh),
        center + rot * Point::new(hw, hh),
        center + rot * Point::new(-hw, hh),
    ]
}

/// Inverse of `compute_box_corners` for corners in the box winding.
///
/// The angle is the direction of edge 0→1, wrapped to (−π, π].
pub fn box_params_from_corners(corners: &Quad) -> BoxParams {
    let center = corners.iter().fold(Point::zeros(), |acc, p| acc + p) / 4.0;
    let e_w = corners[1] - corners[0];
    let e_h = corners[2] - corners[1];
    BoxParams {
        cx: center.x,
        cy: center.y,
        width: e_w.norm(),
        height: e_h.norm(),
        angle: wrap_angle(e_w.y.atan2(e_w.x)),
    }
}

/// Closed ring of a quad (first corner repeated at the end), for consumers that draw outlines.
pub fn closed_ring(corners: &Quad) -> Vec<Point> {
    let mut ring = corners.to_vec();
    ring.push(corners[0]);
    ring
}

impl From<&Quad> for BoxParams {
    #[inline]
    fn from(q: &Quad) -> Self {
        box_params_from_corners(q)
    }
}
