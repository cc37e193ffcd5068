//! Canonical jet orientation from the consensus box and the start point.
//!
//! Steps
//! - The two corners nearest `start` are the base (nearest first).
//! - Walk the ring from the nearest corner; the height segment starts at the
//!   second base corner and runs to its other ring neighbour.
//! - The angle is measured from solar north (−y in image coordinates),
//!   clockwise positive: `atan2(dh.x, −dh.y)`.

use crate::error::JetError;
use crate::geom2::{GeomCfg, Point, Quad};

/// Orientation quantities derived once from a consensus box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    pub base_points: [Point; 2],
    pub height_points: [Point; 2],
    pub angle: f64,
    pub width: f64,
    pub height: f64,
}

/// Reject boxes that do not have four distinct, finite corners.
pub(crate) fn check_corners(corners: &Quad, cfg: GeomCfg) -> Result<(), JetError> {
    if corners.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(JetError::MalformedGeometry(
            "box has non-finite corners".to_string(),
        ));
    }
    for i in 0..4 {
        for j in (i + 1)..4 {
            if (corners[i] - corners[j]).norm() <= cfg.eps_distinct {
                return Err(JetError::MalformedGeometry(format!(
                    "box corners {i} and {j} coincide"
                )));
            }
        }
    }
    Ok(())
}

/// Derive base/height segments, angle and size of a jet box.
pub fn autorotate(corners: &Quad, start: Point, cfg: GeomCfg) -> Result<Orientation, JetError> {
    check_corners(corners, cfg)?;
    if !(start.x.is_finite() && start.y.is_finite()) {
        return Err(JetError::MalformedGeometry(
            "start point is not finite".to_string(),
        ));
    }

    let dists = corners.map(|p| (p - start).norm());
    let mut order = [0usize, 1, 2, 3];
    order.sort_by(|&a, &b| dists[a].total_cmp(&dists[b]));
    let nearest = order[0];
    let second = order[1];
    let base_points = [corners[nearest], corners[second]];

    // ring after the nearest corner, nearest dropped
    let rolled = [1, 2, 3].map(|k| corners[(nearest + k) % 4]);
    // corners are distinct, so an index match is an exact coordinate match
    let height_points = if (nearest + 1) % 4 == second {
        [rolled[0], rolled[1]]
    } else {
        [rolled[2], rolled[1]]
    };

    let dh = height_points[1] - height_points[0];
    Ok(Orientation {
        base_points,
        height_points,
        angle: dh.x.atan2(-dh.y),
        width: (base_points[1] - base_points[0]).norm(),
        height: dh.norm(),
    })
}
