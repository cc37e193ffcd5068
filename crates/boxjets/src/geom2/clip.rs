//! Convex polygon intersection and IOU.
//!
//! The clip polygon is turned into its edge half‑spaces (`Hs2::left_of` on the
//! counter-clockwise ring) and the subject polygon is cut by each in turn.
//! Both inputs must be convex; boxes always are.

use crate::error::JetError;

use super::types::{GeomCfg, Hs2, Point};
use super::util::{ccw, polygon_area};

/// Edge half‑spaces of a convex ring, interior side kept.
fn edge_halfspaces(ring: &[Point]) -> Vec<Hs2> {
    let ring = ccw(ring);
    (0..ring.len())
        .map(|k| Hs2::left_of(ring[k], ring[(k + 1) % ring.len()]))
        .collect()
}

/// Cut a ring by one half‑space, keeping the part with non-negative slack.
fn clip_by(ring: &[Point], h: &Hs2) -> Vec<Point> {
    let mut out = Vec::with_capacity(ring.len() + 1);
    for k in 0..ring.len() {
        let p = ring[k];
        let q = ring[(k + 1) % ring.len()];
        let p_in = h.satisfies_eps(p, 0.0);
        if p_in {
            out.push(p);
        }
        if p_in != h.satisfies_eps(q, 0.0) {
            let (sp, sq) = (h.slack(p), h.slack(q));
            let t = sp / (sp - sq);
            out.push(p + (q - p) * t);
        }
    }
    out
}

/// Intersection of two convex polygons as a ring (possibly empty).
pub fn intersect_convex(subject: &[Point], clip: &[Point]) -> Vec<Point> {
    let mut out = ccw(subject);
    for h in edge_halfspaces(clip) {
        if out.is_empty() {
            break;
        }
        out = clip_by(&out, &h);
    }
    out
}

/// Intersection-over-union of two convex polygons, using default tolerances.
pub fn polygon_iou(a: &[Point], b: &[Point]) -> Result<f64, JetError> {
    polygon_iou_cfg(a, b, GeomCfg::default())
}

/// Intersection-over-union of two convex polygons.
///
/// Returns `DegeneratePolygon` when the union area is not above `cfg.eps_area`.
pub fn polygon_iou_cfg(a: &[Point], b: &[Point], cfg: GeomCfg) -> Result<f64, JetError> {
    let area_a = polygon_area(a);
    let area_b = polygon_area(b);
    let inter = polygon_area(&intersect_convex(a, b));
    let union = area_a + area_b - inter;
    if !(union > cfg.eps_area) {
        return Err(JetError::DegeneratePolygon);
    }
    Ok((inter / union).clamp(0.0, 1.0))
}
