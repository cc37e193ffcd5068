use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: subcommand, its inputs and parameters, and how many jets went through.
#[derive(Debug, Serialize)]
pub struct Provenance {
    pub command: &'static str,
    pub inputs: Vec<String>,
    pub params: Value,
    pub jets_read: usize,
    pub jets_skipped: usize,
}

impl Provenance {
    pub fn new(command: &'static str, input: &Path) -> Self {
        Self {
            command,
            inputs: vec![input.to_string_lossy().into_owned()],
            params: json!({}),
            jets_read: 0,
            jets_skipped: 0,
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    pub fn with_counts(mut self, read: usize, skipped: usize) -> Self {
        self.jets_read = read;
        self.jets_skipped = skipped;
        self
    }
}

/// Write `<artifact stem>.provenance.json` next to `artifact`.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, prov: &Provenance, tag: Option<&str>) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = sidecar_path(artifact);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    let doc = json!({
        "code_rev": current_git_rev(),
        "version": boxjets::VERSION,
        "tag": tag,
        "run": prov,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "provenance written");
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

/// Commit of the build, from `GIT_COMMIT` (build or run time) or `git rev-parse`.
pub fn current_git_rev() -> String {
    option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            if !output.status.success() {
                return None;
            }
            String::from_utf8(output.stdout).ok().map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_artifact() {
        let base = Path::new("/tmp/output/stats.csv");
        assert_eq!(sidecar_path(base), Path::new("/tmp/output/stats.provenance.json"));
    }

    #[test]
    fn sidecar_records_run() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("payloads.json");
        fs::write(&artifact, "[]").unwrap();
        let prov = Provenance::new("payload", Path::new("jets.json"))
            .with_params(json!({"plot_sigma": true}))
            .with_counts(3, 1);
        let path = write_sidecar(&artifact, &prov, Some("run-1")).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["run"]["command"], "payload");
        assert_eq!(parsed["run"]["jets_skipped"], 1);
        assert_eq!(parsed["tag"], "run-1");
    }
}
