//! Consensus geometry for crowdsourced solar jet annotations.
//!
//! Volunteers mark each jet with a rotated box plus base (start) and tip (end)
//! points, frame by frame. An upstream clustering stage averages those marks
//! into one consensus detection; this crate takes it from there:
//! - `geom2`: rotated-box corners (one fixed winding), convex IOU.
//! - `envelope`: `mean ± sigma·std` boxes from the contributing annotations.
//! - `jet`: the consensus `Jet` with its canonical orientation, extracts and
//!   render payload.
//! - `meta`: subject metadata lookup by id, event, date window or cluster.
//!
//! Everything here is synchronous and free of shared state; jets may be
//! processed in parallel by the caller.

pub mod api;
pub mod cluster;
pub mod envelope;
pub mod error;
pub mod geom2;
pub mod jet;
pub mod meta;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cluster::JetCluster;
pub use envelope::{compute_sigma_envelope, SigmaEnvelope};
pub use error::{JetError, MetaError};
pub use geom2::{compute_box_corners, polygon_iou, BoxParams, GeomCfg, Point, Quad};
pub use jet::{Jet, RenderPayload};
pub use meta::{MetaFile, MetaValue};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::envelope::{compute_sigma_envelope, SigmaEnvelope};
    pub use crate::geom2::{
        box_params_from_corners, compute_box_corners, polygon_iou, BoxParams, GeomCfg, Point, Quad,
    };
    pub use crate::jet::{ConsensusRecord, ExtractKind, ExtractRecord, Jet, RenderPayload};
    pub use crate::{JetError, MetaError};
}
