//! Subject metadata lookup.
//!
//! The metadata file is a JSON array with one entry per platform subject:
//!
//! ```json
//! [{"subjectId": 123, "data": {"#sol_standard": "SOL2011-01-01T00:00:00L000C000",
//!   "startDate": "2011-01-01 00:00:00", "endDate": "2011-01-01 00:10:00", "#width": 1024}}]
//! ```
//!
//! Queries are by subject id, by solar event identifier (`#sol_standard`), by
//! start-date window, or by jet cluster id. `startDate`/`endDate` values come
//! back parsed. Entries without `#sol_standard` never match an event query.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cluster::{find_cluster, JetCluster};
use crate::error::MetaError;

pub const SOL_KEY: &str = "#sol_standard";
pub const START_DATE_KEY: &str = "startDate";
pub const END_DATE_KEY: &str = "endDate";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetaEntry {
    #[serde(rename = "subjectId")]
    pub subject_id: u64,
    pub data: Map<String, Value>,
}

impl MetaEntry {
    fn sol_standard(&self) -> Option<&str> {
        self.data.get(SOL_KEY).and_then(Value::as_str)
    }

    fn value(&self, key: &str) -> Result<MetaValue, MetaError> {
        let raw = self.data.get(key).ok_or_else(|| MetaError::MissingKey {
            subject: self.subject_id,
            key: key.to_string(),
        })?;
        if key == START_DATE_KEY || key == END_DATE_KEY {
            let s = raw
                .as_str()
                .ok_or_else(|| MetaError::InvalidDate(raw.to_string()))?;
            return parse_datetime(s).map(MetaValue::Date);
        }
        Ok(MetaValue::Value(raw.clone()))
    }
}

/// A metadata value; dates are parsed, everything else is passed through.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Date(NaiveDateTime),
    Value(Value),
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD hh:mm:ss` (optionally with fraction) or the `T`-separated form.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, MetaError> {
    let s = s.trim();
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| MetaError::InvalidDate(s.to_string()))
}

#[derive(Clone, Debug, Default)]
pub struct MetaFile {
    path: Option<PathBuf>,
    entries: Vec<MetaEntry>,
}

impl MetaFile {
    /// Load a metadata JSON file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MetaError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MetaError::FileNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };
        let entries: Vec<MetaEntry> = serde_json::from_str(&text)?;
        tracing::debug!(path = %path.display(), subjects = entries.len(), "metadata loaded");
        Ok(Self {
            path: Some(path.to_path_buf()),
            entries,
        })
    }

    pub fn from_entries(entries: Vec<MetaEntry>) -> Self {
        Self {
            path: None,
            entries,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn entries(&self) -> &[MetaEntry] {
        &self.entries
    }

    /// All subject ids, in file order.
    pub fn subjects(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.subject_id).collect()
    }

    /// Distinct event identifiers, sorted.
    pub fn sol_standards(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(MetaEntry::sol_standard)
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    // the result borrows only `self`; `sol` is needed for the scan alone
    fn by_sol(&self, sol: &str) -> Vec<&MetaEntry> {
        self.entries
            .iter()
            .filter(|e| e.sol_standard() == Some(sol))
            .collect()
    }

    pub fn subject_ids_by_sol_standard(&self, sol: &str) -> Vec<u64> {
        self.by_sol(sol).into_iter().map(|e| e.subject_id).collect()
    }

    pub fn subject_data_by_sol_standard(&self, sol: &str) -> Vec<&Map<String, Value>> {
        self.by_sol(sol).into_iter().map(|e| &e.data).collect()
    }

    pub fn key_values_by_sol_standard(&self, sol: &str, key: &str) -> Result<Vec<MetaValue>, MetaError> {
        self.by_sol(sol).into_iter().map(|e| e.value(key)).collect()
    }

    /// Subjects whose start date lies strictly inside `(start, end)`.
    pub fn subject_ids_by_dates(&self, start: &str, end: &str) -> Result<Vec<u64>, MetaError> {
        let lo = parse_datetime(start)?;
        let hi = parse_datetime(end)?;
        let mut out = Vec::new();
        for e in &self.entries {
            if let MetaValue::Date(d) = e.value(START_DATE_KEY)? {
                if lo < d && d < hi {
                    out.push(e.subject_id);
                }
            }
        }
        Ok(out)
    }

    /// Metadata of a single subject; the id must occur exactly once.
    pub fn subject_data_by_id(&self, subject: u64) -> Result<&Map<String, Value>, MetaError> {
        self.entry(subject).map(|e| &e.data)
    }

    fn entry(&self, subject: u64) -> Result<&MetaEntry, MetaError> {
        let mut hits = self.entries.iter().filter(|e| e.subject_id == subject);
        let first = hits
            .next()
            .ok_or_else(|| MetaError::NotFound(format!("subject {subject}")))?;
        if hits.next().is_some() {
            return Err(MetaError::Duplicate(subject));
        }
        Ok(first)
    }

    pub fn key_value_by_id(&self, subject: u64, key: &str) -> Result<MetaValue, MetaError> {
        self.entry(subject)?.value(key)
    }

    pub fn key_values_by_list(&self, subjects: &[u64], key: &str) -> Result<Vec<MetaValue>, MetaError> {
        subjects
            .iter()
            .map(|&s| self.key_value_by_id(s, key))
            .collect()
    }

    pub fn subject_ids_by_cluster(&self, clusters: &[JetCluster], id: &str) -> Result<Vec<u64>, MetaError> {
        find_cluster(clusters, id)
            .map(JetCluster::subjects)
            .ok_or_else(|| MetaError::NotFound(format!("jet cluster {id}")))
    }

    pub fn subject_data_by_cluster(
        &self,
        clusters: &[JetCluster],
        id: &str,
    ) -> Result<Vec<&Map<String, Value>>, MetaError> {
        self.subject_ids_by_cluster(clusters, id)?
            .into_iter()
            .map(|s| self.subject_data_by_id(s))
            .collect()
    }

    pub fn key_values_by_cluster(
        &self,
        clusters: &[JetCluster],
        id: &str,
        key: &str,
    ) -> Result<Vec<MetaValue>, MetaError> {
        let subjects = self.subject_ids_by_cluster(clusters, id)?;
        self.key_values_by_list(&subjects, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::BoxParams;
    use crate::jet::Jet;
    use nalgebra::vector;
    use serde_json::json;

    fn sample() -> MetaFile {
        let entries: Vec<MetaEntry> = serde_json::from_value(json!([
            {"subjectId": 1, "data": {"#sol_standard": "SOL_A", "startDate": "2012-05-01 10:00:00", "endDate": "2012-05-01 10:20:00", "#width": 1920}},
            {"subjectId": 2, "data": {"#sol_standard": "SOL_A", "startDate": "2012-05-01 11:00:00", "endDate": "2012-05-01 11:20:00", "#width": 1920}},
            {"subjectId": 3, "data": {"#sol_standard": "SOL_B", "startDate": "2013-02-10 08:00:00", "endDate": "2013-02-10 08:20:00", "#width": 1024}},
            {"subjectId": 3, "data": {"#sol_standard": "SOL_B", "startDate": "2013-02-10 09:00:00", "endDate": "2013-02-10 09:20:00"}}
        ]))
        .unwrap();
        MetaFile::from_entries(entries)
    }

    fn jet(subject: u64) -> Jet {
        Jet::new(
            subject,
            vector![-5.0, -10.0],
            vector![0.0, 10.0],
            BoxParams::new(0.0, 0.0, 10.0, 20.0, 0.0),
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn subjects_and_events() {
        let m = sample();
        assert_eq!(m.subjects(), vec![1, 2, 3, 3]);
        assert_eq!(m.sol_standards(), vec!["SOL_A".to_string(), "SOL_B".to_string()]);
        assert_eq!(m.subject_ids_by_sol_standard("SOL_A"), vec![1, 2]);
        assert!(m.subject_ids_by_sol_standard("SOL_C").is_empty());
        assert_eq!(m.subject_data_by_sol_standard("SOL_B").len(), 2);
    }

    #[test]
    fn event_data_outlives_query_string() {
        let m = sample();
        let data = {
            let sol = String::from("SOL_A");
            m.subject_data_by_sol_standard(&sol)
        };
        assert_eq!(data.len(), 2);
        assert_eq!(data[1]["startDate"], json!("2012-05-01 11:00:00"));
    }

    #[test]
    fn key_values_by_event() {
        let m = sample();
        let widths = m.key_values_by_sol_standard("SOL_A", "#width").unwrap();
        assert_eq!(widths, vec![MetaValue::Value(json!(1920)), MetaValue::Value(json!(1920))]);
        // second SOL_B entry has no width
        assert!(matches!(
            m.key_values_by_sol_standard("SOL_B", "#width"),
            Err(MetaError::MissingKey { subject: 3, .. })
        ));
    }

    #[test]
    fn dates_are_parsed() {
        let m = sample();
        let v = m.key_value_by_id(1, "startDate").unwrap();
        let expected = NaiveDate::from_ymd_opt(2012, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(v, MetaValue::Date(expected));
    }

    #[test]
    fn date_window_is_exclusive() {
        let m = sample();
        assert_eq!(m.subject_ids_by_dates("2012-05-01", "2012-05-02").unwrap(), vec![1, 2]);
        assert_eq!(
            m.subject_ids_by_dates("2012-05-01 10:00:00", "2012-05-01 11:00:00").unwrap(),
            Vec::<u64>::new()
        );
        assert!(matches!(
            m.subject_ids_by_dates("05/01/2012", "2012-05-02"),
            Err(MetaError::InvalidDate(_))
        ));
    }

    #[test]
    fn lookups_by_id() {
        let m = sample();
        assert_eq!(m.subject_data_by_id(2).unwrap()["#sol_standard"], json!("SOL_A"));
        assert!(matches!(m.subject_data_by_id(9), Err(MetaError::NotFound(_))));
        assert!(matches!(m.subject_data_by_id(3), Err(MetaError::Duplicate(3))));
        assert!(matches!(
            m.key_value_by_id(1, "#nope"),
            Err(MetaError::MissingKey { .. })
        ));
        let list = m.key_values_by_list(&[2, 1], "#sol_standard").unwrap();
        assert_eq!(list, vec![MetaValue::Value(json!("SOL_A")); 2]);
    }

    #[test]
    fn lookups_by_cluster() {
        let m = sample();
        let clusters = vec![
            JetCluster::new("sjh_1", vec![jet(1), jet(2)]),
            JetCluster::new("sjh_2", vec![jet(3)]),
        ];
        assert_eq!(m.subject_ids_by_cluster(&clusters, "sjh_1").unwrap(), vec![1, 2]);
        assert_eq!(m.subject_data_by_cluster(&clusters, "sjh_1").unwrap().len(), 2);
        let widths = m.key_values_by_cluster(&clusters, "sjh_1", "#width").unwrap();
        assert_eq!(widths.len(), 2);
        assert!(matches!(
            m.subject_ids_by_cluster(&clusters, "sjh_9"),
            Err(MetaError::NotFound(_))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = MetaFile::open("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, MetaError::FileNotFound(_)));
    }

    #[test]
    fn datetime_formats() {
        assert!(parse_datetime("2012-05-01").is_ok());
        assert!(parse_datetime("2012-05-01 10:00:00").is_ok());
        assert!(parse_datetime("2012-05-01T10:00:00.250").is_ok());
        assert!(parse_datetime("yesterday").is_err());
    }
}
