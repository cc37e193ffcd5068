use super::types::Point;

/// Shoelace signed area; positive for counter-clockwise rings.
pub fn signed_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for k in 0..ring.len() {
        let p = ring[k];
        let q = ring[(k + 1) % ring.len()];
        acc += p.x * q.y - q.x * p.y;
    }
    acc / 2.0
}

#[inline]
pub fn polygon_area(ring: &[Point]) -> f64 {
    signed_area(ring).abs()
}

/// Copy of `ring` in counter-clockwise order.
pub(crate) fn ccw(ring: &[Point]) -> Vec<Point> {
    let mut out = ring.to_vec();
    if signed_area(&out) < 0.0 {
        out.reverse();
    }
    out
}

/// Wrap an angle to (−π, π].
#[inline]
pub(crate) fn wrap_angle(a: f64) -> f64 {
    if !a.is_finite() {
        return a;
    }
    let mut x = a;
    while x <= -std::f64::consts::PI {
        x += 2.0 * std::f64::consts::PI;
    }
    while x > std::f64::consts::PI {
        x -= 2.0 * std::f64::consts::PI;
    }
    x
}
