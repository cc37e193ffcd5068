//! Data bundle handed to a renderer. No drawing happens here.

use serde::{Deserialize, Serialize};

use crate::error::JetError;
use crate::geom2::{Point, Quad};

use super::Jet;

/// Extract polygon with its agreement against the consensus box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedPolygon {
    pub polygon: Quad,
    pub iou: f64,
}

/// Arrow from the base side of the box to its top, through the center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub tail: Point,
    pub vector: Point,
}

impl Direction {
    #[inline]
    pub fn head(&self) -> Point {
        self.tail + self.vector
    }
}

/// Outlines of the `+sigma` and `−sigma` boxes; the band between them is the uncertainty region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvelopePolygons {
    pub sigma: f64,
    pub upper: Quad,
    pub lower: Quad,
}

impl EnvelopePolygons {
    /// Closed band outline: upper corners followed by the lower corners reversed.
    pub fn band(&self) -> Vec<Point> {
        self.upper
            .iter()
            .copied()
            .chain(self.lower.iter().rev().copied())
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderPayload {
    pub subject: u64,
    pub box_polygon: Quad,
    pub start: Point,
    pub end: Point,
    pub start_extracts: Vec<Point>,
    pub end_extracts: Vec<Point>,
    pub box_extracts: Vec<WeightedPolygon>,
    pub direction: Direction,
    pub envelope: Option<EnvelopePolygons>,
}

impl Jet {
    /// Everything a renderer needs for this jet.
    ///
    /// The envelope is included only when `plot_sigma` is set and a sigma was attached.
    pub fn render_payload(&self, plot_sigma: bool) -> Result<RenderPayload, JetError> {
        let box_extracts = self
            .extract_box_polygons()
            .into_iter()
            .zip(self.extract_ious()?)
            .map(|(polygon, iou)| WeightedPolygon { polygon, iou })
            .collect();

        let envelope = match (plot_sigma, self.sigma()) {
            (true, Some(sigma)) => self.sigma_envelope()?.map(|env| {
                let (upper, lower) = env.polygons();
                EnvelopePolygons {
                    sigma,
                    upper,
                    lower,
                }
            }),
            _ => None,
        };

        Ok(RenderPayload {
            subject: self.subject(),
            box_polygon: *self.box_corners(),
            start: self.start(),
            end: self.end(),
            start_extracts: self.extract_start_points(),
            end_extracts: self.extract_end_points(),
            box_extracts,
            direction: self.direction(),
            envelope,
        })
    }
}
