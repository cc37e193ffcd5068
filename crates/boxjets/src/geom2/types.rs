//! Basic 2D types and tolerances used by the box geometry.
//!
//! - `Point`: nalgebra column vector, the one coordinate type of the crate.
//! - `GeomCfg`: centralizes epsilons for corner distinctness and area checks.
//! - `Hs2`: closed half‑space `n·x <= c`, used as the clipping edge of a convex polygon.
//! - `BoxParams`: rotated rectangle `(cx, cy, width, height, angle)`.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// 2D point in image coordinates.
pub type Point = Vector2<f64>;

/// Four corners of a rotated rectangle, in the fixed box winding.
pub type Quad = [Point; 4];

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Two corners closer than this are treated as the same corner.
    pub eps_distinct: f64,
    /// Union areas at or below this make IOU undefined.
    pub eps_area: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_distinct: 1e-12,
            eps_area: 1e-12,
        }
    }
}

/// Closed half‑space `n · x <= c` (no normalization required here).
#[derive(Clone, Copy, Debug)]
pub struct Hs2 {
    pub n: Vector2<f64>,
    pub c: f64,
}

impl Hs2 {
    #[inline]
    pub fn new(n: Vector2<f64>, c: f64) -> Self {
        Self { n, c }
    }

    /// Half-space to the left of the directed edge `p → q`.
    ///
    /// For a counter-clockwise ring this is the interior side.
    #[inline]
    pub fn left_of(p: Point, q: Point) -> Self {
        let edge = q - p;
        let n = Vector2::new(-edge.y, edge.x);
        // interior is n·x >= n·p, flip to the `<=` form
        Self::new(-n, -n.dot(&p))
    }

    /// Signed slack `c − n·x` (non-negative inside).
    #[inline]
    pub fn slack(&self, p: Point) -> f64 {
        self.c - self.n.dot(&p)
    }

    #[inline]
    pub fn satisfies_eps(&self, p: Point, eps: f64) -> bool {
        self.n.dot(&p) <= self.c + eps
    }
}

/// Rotated rectangle: center, size and rotation in radians.
///
/// The region is the polygon of `corners()`; see `compute_box_corners` for the
/// winding order every consumer relies on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxParams {
    pub cx: f64,
    pub cy: f64,
    pub width: f64,
    pub height: f64,
    /// Counter-clockwise rotation about the center, radians.
    pub angle: f64,
}

impl BoxParams {
    #[inline]
    pub fn new(cx: f64, cy: f64, width: f64, height: f64, angle: f64) -> Self {
        Self {
            cx,
            cy,
            width,
            height,
            angle,
        }
    }

    /// Build from a box extract whose angle is given in degrees.
    #[inline]
    pub fn from_degrees(cx: f64, cy: f64, width: f64, height: f64, angle_deg: f64) -> Self {
        Self::new(cx, cy, width, height, angle_deg.to_radians())
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    #[inline]
    pub fn corners(&self) -> Quad {
        super::boxes::compute_box_corners(self.cx, self.cy, self.width, self.height, self.angle)
    }

    #[inline]
    pub fn to_array(self) -> [f64; 5] {
        [self.cx, self.cy, self.width, self.height, self.angle]
    }
}

impl From<[f64; 5]> for BoxParams {
    #[inline]
    fn from(v: [f64; 5]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4])
    }
}
