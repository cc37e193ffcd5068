//! Consensus jet: one aggregated detection plus the annotations behind it.
//!
//! Lifecycle
//! - `Jet::new` fixes subject, start/end, consensus box and cluster values, and
//!   derives the orientation once (`orient::autorotate`).
//! - Extracts (`add_*_extract`, `add_extracts`) and `sigma` are attached by later
//!   passes. They never change the derived orientation.
//! - Everything else is read-only: accessors, IOU per extract, envelope,
//!   render payload.

mod orient;
mod records;
mod render;
mod types;

pub use orient::{autorotate, Orientation};
pub use records::{parse_records, ConsensusRecord};
pub use render::{Direction, EnvelopePolygons, RenderPayload, WeightedPolygon};
pub use types::{BoxExtract, ExtractKind, ExtractRecord, ExtractSet};

use crate::envelope::{compute_sigma_envelope, SigmaEnvelope};
use crate::error::JetError;
use crate::geom2::{polygon_iou_cfg, rotation, BoxParams, GeomCfg, Point, Quad};

#[derive(Clone, Debug)]
pub struct Jet {
    subject: u64,
    start: Point,
    end: Point,
    bx: BoxParams,
    corners: Quad,
    cluster_values: Vec<BoxParams>,
    extracts: ExtractSet,
    orientation: Orientation,
    sigma: Option<f64>,
    cfg: GeomCfg,
}

impl Jet {
    /// Build a jet and derive its orientation, using default tolerances.
    pub fn new(
        subject: u64,
        start: Point,
        end: Point,
        bx: BoxParams,
        cluster_values: Vec<BoxParams>,
    ) -> Result<Self, JetError> {
        Self::new_cfg(subject, start, end, bx, cluster_values, GeomCfg::default())
    }

    /// Build a jet with explicit tolerances.
    ///
    /// Fails with `MalformedGeometry` if the box does not have four distinct corners.
    pub fn new_cfg(
        subject: u64,
        start: Point,
        end: Point,
        bx: BoxParams,
        cluster_values: Vec<BoxParams>,
        cfg: GeomCfg,
    ) -> Result<Self, JetError> {
        let corners = bx.corners();
        let orientation = autorotate(&corners, start, cfg)?;
        tracing::trace!(
            subject,
            angle = orientation.angle,
            width = orientation.width,
            height = orientation.height,
            "jet oriented"
        );
        Ok(Self {
            subject,
            start,
            end,
            bx,
            corners,
            cluster_values,
            extracts: ExtractSet::default(),
            orientation,
            sigma: None,
            cfg,
        })
    }

    #[inline]
    pub fn subject(&self) -> u64 {
        self.subject
    }
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }
    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }
    #[inline]
    pub fn box_params(&self) -> BoxParams {
        self.bx
    }
    /// Consensus box corners in the box winding.
    #[inline]
    pub fn box_corners(&self) -> &Quad {
        &self.corners
    }
    #[inline]
    pub fn cluster_values(&self) -> &[BoxParams] {
        &self.cluster_values
    }
    #[inline]
    pub fn extracts(&self) -> &ExtractSet {
        &self.extracts
    }
    #[inline]
    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }
    #[inline]
    pub fn base_points(&self) -> &[Point; 2] {
        &self.orientation.base_points
    }
    #[inline]
    pub fn height_points(&self) -> &[Point; 2] {
        &self.orientation.height_points
    }
    /// Base segment and height segment, in that order.
    #[inline]
    pub fn width_height_pairs(&self) -> (&[Point; 2], &[Point; 2]) {
        (&self.orientation.base_points, &self.orientation.height_points)
    }
    /// Jet direction from solar north, radians, clockwise positive in image coordinates.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.orientation.angle
    }
    #[inline]
    pub fn width(&self) -> f64 {
        self.orientation.width
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.orientation.height
    }
    #[inline]
    pub fn sigma(&self) -> Option<f64> {
        self.sigma
    }

    /// Attach the confidence multiplier found by the uncertainty fit.
    pub fn set_sigma(&mut self, sigma: f64) {
        self.sigma = Some(sigma);
    }

    pub fn add_box_extract(&mut self, x: f64, y: f64, w: f64, h: f64, angle_deg: f64) {
        self.extracts.boxes.push(BoxExtract {
            x,
            y,
            w,
            h,
            angle_deg,
        });
    }

    pub fn add_start_extract(&mut self, x: f64, y: f64) {
        self.extracts.starts.push(Point::new(x, y));
    }

    pub fn add_end_extract(&mut self, x: f64, y: f64) {
        self.extracts.ends.push(Point::new(x, y));
    }

    /// Append one extract record; wrong arity is rejected without mutation.
    pub fn add_extract(&mut self, rec: &ExtractRecord) -> Result<(), JetError> {
        rec.validate()?;
        let v = &rec.values;
        match rec.kind {
            ExtractKind::Box => self.add_box_extract(v[0], v[1], v[2], v[3], v[4]),
            ExtractKind::Start => self.add_start_extract(v[0], v[1]),
            ExtractKind::End => self.add_end_extract(v[0], v[1]),
        }
        Ok(())
    }

    /// Append a batch of records. All records are validated before any is appended.
    pub fn add_extracts(&mut self, recs: &[ExtractRecord]) -> Result<(), JetError> {
        for rec in recs {
            if let Err(e) = rec.validate() {
                tracing::debug!(
                    subject = self.subject,
                    classification_id = ?rec.classification_id,
                    "rejecting extract batch"
                );
                return Err(e);
            }
        }
        for rec in recs {
            self.add_extract(rec)?;
        }
        Ok(())
    }

    pub fn extract_start_points(&self) -> Vec<Point> {
        self.extracts.starts.clone()
    }

    pub fn extract_end_points(&self) -> Vec<Point> {
        self.extracts.ends.clone()
    }

    /// Corner polygons of the box extracts, in insertion order.
    pub fn extract_box_polygons(&self) -> Vec<Quad> {
        self.extracts
            .boxes
            .iter()
            .map(|b| b.to_params().corners())
            .collect()
    }

    /// IOU of every box extract against the consensus box.
    pub fn extract_ious(&self) -> Result<Vec<f64>, JetError> {
        self.extract_box_polygons()
            .iter()
            .map(|q| polygon_iou_cfg(q, &self.corners, self.cfg))
            .collect()
    }

    /// Mean extract IOU, `None` without box extracts.
    pub fn mean_extract_iou(&self) -> Result<Option<f64>, JetError> {
        let ious = self.extract_ious()?;
        if ious.is_empty() {
            return Ok(None);
        }
        Ok(Some(ious.iter().sum::<f64>() / ious.len() as f64))
    }

    /// Mean of the four consensus corners.
    pub fn center(&self) -> Point {
        self.corners.iter().fold(Point::zeros(), |acc, p| acc + p) / 4.0
    }

    /// Arrow through the box center, from the base side to the top.
    pub fn direction(&self) -> Direction {
        let rot = rotation(self.angle());
        let half = Point::new(0.0, self.height() / 2.0);
        let center = self.center();
        let tail = center + rot * half;
        let head = center - rot * half;
        Direction {
            tail,
            vector: head - tail,
        }
    }

    /// Envelope for the attached sigma; `None` until `set_sigma` was called.
    pub fn sigma_envelope(&self) -> Result<Option<SigmaEnvelope>, JetError> {
        match self.sigma {
            Some(sigma) => compute_sigma_envelope(&self.cluster_values, sigma).map(Some),
            None => Ok(None),
        }
    }
}
