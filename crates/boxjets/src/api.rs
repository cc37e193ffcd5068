//! Curated surface for the command-line front end and experiments.
//!
//! Prefer these re-exports over reaching into submodules.

// Box geometry
pub use crate::geom2::{
    box_params_from_corners, closed_ring, compute_box_corners, intersect_convex, polygon_area,
    polygon_iou, polygon_iou_cfg, BoxParams, GeomCfg, Point, Quad,
};
// Synthetic annotations
pub use crate::geom2::rand::{draw_annotations, Annotation, AnnotationCfg, ReplayToken};
// Uncertainty envelope
pub use crate::envelope::{compute_sigma_envelope, mean_std, SigmaEnvelope};
// Jets and their I/O records
pub use crate::jet::{
    autorotate, parse_records, BoxExtract, ConsensusRecord, Direction, EnvelopePolygons,
    ExtractKind, ExtractRecord, ExtractSet, Jet, Orientation, RenderPayload, WeightedPolygon,
};
// Clusters and metadata
pub use crate::cluster::{find_cluster, JetCluster};
pub use crate::meta::{parse_datetime, MetaEntry, MetaFile, MetaValue};
