//! Error types for the geometry core and the metadata lookup.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the jet geometry core.
///
/// All of these are local and deterministic: retrying the same call gives the
/// same error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JetError {
    #[error("polygon union has zero area; IOU is undefined")]
    DegeneratePolygon,

    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("empty input: {0}")]
    EmptyInput(&'static str),
}

/// Failures of the subject metadata lookup.
#[derive(Error, Debug)]
pub enum MetaError {
    #[error("metadata file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("unable to read metadata file: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("subject {0} occurs more than once")]
    Duplicate(u64),

    #[error("key {key} is missing for subject {subject}")]
    MissingKey { subject: u64, key: String },

    #[error("invalid date {0:?}; expected 'YYYY-MM-DD' or 'YYYY-MM-DD hh:mm:ss'")]
    InvalidDate(String),
}
