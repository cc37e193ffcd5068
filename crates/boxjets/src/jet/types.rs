use serde::{Deserialize, Serialize};

use crate::error::JetError;
use crate::geom2::{BoxParams, Point};

/// One volunteer's box, as annotated (angle in degrees).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxExtract {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub angle_deg: f64,
}

impl BoxExtract {
    #[inline]
    pub fn to_params(self) -> BoxParams {
        BoxParams::from_degrees(self.x, self.y, self.w, self.h, self.angle_deg)
    }
}

/// Raw volunteer annotations assigned to one jet, in insertion order.
///
/// The three collections are independent; their lengths may differ.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExtractSet {
    pub boxes: Vec<BoxExtract>,
    pub starts: Vec<Point>,
    pub ends: Vec<Point>,
}

impl ExtractSet {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty() && self.starts.is_empty() && self.ends.is_empty()
    }
}

/// Which annotation task an extract record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractKind {
    Box,
    Start,
    End,
}

impl ExtractKind {
    /// Number of values a record of this kind carries.
    #[inline]
    pub fn arity(self) -> usize {
        match self {
            ExtractKind::Box => 5,
            ExtractKind::Start | ExtractKind::End => 2,
        }
    }
}

/// A single squashed per-classification extract, as delivered by the assignment stage.
///
/// Box values are `[x, y, w, h, angle_deg]`, point values `[x, y]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtractRecord {
    #[serde(default)]
    pub classification_id: Option<u64>,
    pub kind: ExtractKind,
    pub values: Vec<f64>,
}

impl ExtractRecord {
    pub fn new(kind: ExtractKind, values: Vec<f64>) -> Self {
        Self {
            classification_id: None,
            kind,
            values,
        }
    }

    pub fn validate(&self) -> Result<(), JetError> {
        if self.values.len() != self.kind.arity() {
            return Err(JetError::MalformedGeometry(format!(
                "{:?} extract needs {} values, got {}",
                self.kind,
                self.kind.arity(),
                self.values.len()
            )));
        }
        Ok(())
    }
}
