use serde::{Deserialize, Serialize};

use crate::error::JetError;
use crate::geom2::{BoxParams, Point};

use super::{ExtractRecord, Jet};

/// One consensus detection as produced by the clustering stage.
///
/// `cluster_values` are `[x, y, w, h, angle_rad]` rows, one per contributing annotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsensusRecord {
    pub subject: u64,
    pub start: Point,
    pub end: Point,
    #[serde(rename = "box")]
    pub bx: BoxParams,
    #[serde(default)]
    pub cluster_values: Vec<[f64; 5]>,
    #[serde(default)]
    pub sigma: Option<f64>,
    #[serde(default)]
    pub extracts: Vec<ExtractRecord>,
}

/// Parse a JSON array of consensus records.
pub fn parse_records(json: &str) -> Result<Vec<ConsensusRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

impl Jet {
    /// Build a jet from a record, attaching its extracts and sigma.
    ///
    /// Either the whole record is accepted or no jet is returned.
    pub fn from_record(rec: &ConsensusRecord) -> Result<Jet, JetError> {
        let cluster_values = rec.cluster_values.iter().copied().map(BoxParams::from).collect();
        let mut jet = Jet::new(rec.subject, rec.start, rec.end, rec.bx, cluster_values)?;
        jet.add_extracts(&rec.extracts)?;
        if let Some(sigma) = rec.sigma {
            jet.set_sigma(sigma);
        }
        Ok(jet)
    }
}
