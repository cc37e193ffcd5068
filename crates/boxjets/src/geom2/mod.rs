//! 2D geometry for rotated boxes.
//!
//! Purpose
//! - Corners of rotated rectangles in one fixed winding (`boxes`).
//! - Convex clipping and intersection-over-union (`clip`).
//! - Jittered synthetic annotations around a box (`rand`).
//!
//! Only convex rings are supported; a box is always convex, and so is the
//! intersection of two boxes.

pub mod boxes;
pub mod clip;
pub mod rand;
mod types;
mod util;

pub use boxes::{box_params_from_corners, closed_ring, compute_box_corners, rotation};
pub use clip::{intersect_convex, polygon_iou, polygon_iou_cfg};
pub use types::{BoxParams, GeomCfg, Hs2, Point, Quad};
pub use util::{polygon_area, signed_area};
