use anyhow::{bail, Context, Result};
use boxjets::api::{compute_sigma_envelope, parse_records, Jet, MetaFile, MetaValue};
use clap::{Parser, Subcommand};
use polars::prelude::*;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

use provenance::{write_sidecar, Provenance};

#[derive(Parser)]
#[command(name = "boxjets")]
#[command(about = "Consensus geometry for crowdsourced solar jet annotations")]
struct Cmd {
    /// Optional run tag; propagated to provenance sidecars
    #[arg(long)]
    tag: Option<String>,

    /// Log debug events
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build jets and write their render payloads as JSON
    Payload {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Leave out the sigma envelopes
        #[arg(long)]
        no_sigma: bool,
    },
    /// Write a per-jet statistics table (CSV)
    Stats {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print sigma envelopes; `--sigma` overrides the per-jet value
    Envelope {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        sigma: Option<f64>,
    },
    /// Query subject metadata
    Meta {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        subject: Option<u64>,
        #[arg(long)]
        sol: Option<String>,
        #[arg(long, requires = "to")]
        from: Option<String>,
        #[arg(long, requires = "from")]
        to: Option<String>,
        /// Return only this key instead of the full record
        #[arg(long)]
        key: Option<String>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    let tag = cmd.tag.as_deref();
    match cmd.action {
        Action::Payload {
            input,
            out,
            no_sigma,
        } => payload(&input, &out, !no_sigma, tag),
        Action::Stats { input, out } => stats(&input, &out, tag),
        Action::Envelope { input, sigma } => envelope(&input, sigma),
        Action::Meta {
            file,
            subject,
            sol,
            from,
            to,
            key,
        } => meta(&file, subject, sol, from.zip(to), key),
        Action::Report => report(tag),
    }
}

/// Read consensus records and build jets; records that fail are logged and skipped.
fn load_jets(input: &Path) -> Result<(Vec<Jet>, usize)> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let records =
        parse_records(&text).with_context(|| format!("parsing records in {}", input.display()))?;
    let mut jets = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for rec in &records {
        match Jet::from_record(rec) {
            Ok(jet) => jets.push(jet),
            Err(err) => {
                tracing::warn!(subject = rec.subject, %err, "skipping jet");
                skipped += 1;
            }
        }
    }
    tracing::info!(input = %input.display(), jets = jets.len(), skipped, "jets loaded");
    Ok((jets, skipped))
}

fn ensure_parent(out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn payload(input: &Path, out: &Path, plot_sigma: bool, tag: Option<&str>) -> Result<()> {
    let (jets, mut skipped) = load_jets(input)?;
    let mut payloads = Vec::with_capacity(jets.len());
    for jet in &jets {
        match jet.render_payload(plot_sigma) {
            Ok(p) => payloads.push(p),
            Err(err) => {
                tracing::warn!(subject = jet.subject(), %err, "no payload for jet");
                skipped += 1;
            }
        }
    }
    ensure_parent(out)?;
    std::fs::write(out, serde_json::to_vec_pretty(&payloads)?)
        .with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(out = %out.display(), payloads = payloads.len(), "payloads written");

    let prov = Provenance::new("payload", input)
        .with_params(json!({ "plot_sigma": plot_sigma }))
        .with_counts(jets.len(), skipped);
    write_sidecar(out, &prov, tag)?;
    Ok(())
}

/// Per-jet statistics as a polars frame, sorted by subject.
fn stats_frame(jets: &[Jet]) -> Result<DataFrame> {
    let mut subject = Vec::with_capacity(jets.len());
    let mut angle = Vec::with_capacity(jets.len());
    let mut width = Vec::with_capacity(jets.len());
    let mut height = Vec::with_capacity(jets.len());
    let mut n_boxes = Vec::with_capacity(jets.len());
    let mut n_starts = Vec::with_capacity(jets.len());
    let mut n_ends = Vec::with_capacity(jets.len());
    let mut mean_iou = Vec::with_capacity(jets.len());
    let mut sigma = Vec::with_capacity(jets.len());
    for jet in jets {
        subject.push(jet.subject());
        angle.push(jet.angle());
        width.push(jet.width());
        height.push(jet.height());
        n_boxes.push(jet.extracts().boxes.len() as u32);
        n_starts.push(jet.extracts().starts.len() as u32);
        n_ends.push(jet.extracts().ends.len() as u32);
        mean_iou.push(jet.mean_extract_iou()?);
        sigma.push(jet.sigma());
    }
    let df = df!(
        "subject" => subject,
        "angle" => angle,
        "width" => width,
        "height" => height,
        "n_box_extracts" => n_boxes,
        "n_start_extracts" => n_starts,
        "n_end_extracts" => n_ends,
        "mean_iou" => mean_iou,
        "sigma" => sigma
    )?;
    let df = df
        .lazy()
        .with_column((col("angle") * lit(180.0 / std::f64::consts::PI)).alias("angle_deg"))
        .sort(["subject"], SortMultipleOptions::default())
        .collect()?;
    Ok(df)
}

fn stats(input: &Path, out: &Path, tag: Option<&str>) -> Result<()> {
    let (jets, skipped) = load_jets(input)?;
    let mut df = stats_frame(&jets)?;
    ensure_parent(out)?;
    let mut file =
        std::fs::File::create(out).with_context(|| format!("creating {}", out.display()))?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    tracing::info!(out = %out.display(), rows = df.height(), cols = df.width(), "stats written");

    let prov = Provenance::new("stats", input).with_counts(jets.len(), skipped);
    write_sidecar(out, &prov, tag)?;
    Ok(())
}

fn envelope(input: &Path, sigma: Option<f64>) -> Result<()> {
    for line in envelope_lines(input, sigma)? {
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}

/// One JSON object per jet that has a sigma (its own or the override) and cluster values.
fn envelope_lines(input: &Path, sigma: Option<f64>) -> Result<Vec<Value>> {
    let (jets, _) = load_jets(input)?;
    let mut lines = Vec::with_capacity(jets.len());
    for jet in &jets {
        let Some(s) = sigma.or(jet.sigma()) else {
            tracing::info!(subject = jet.subject(), "no sigma, skipping envelope");
            continue;
        };
        match compute_sigma_envelope(jet.cluster_values(), s) {
            Ok(env) => lines.push(json!({ "subject": jet.subject(), "sigma": s, "envelope": env })),
            Err(err) => tracing::warn!(subject = jet.subject(), %err, "no envelope for jet"),
        }
    }
    Ok(lines)
}

fn meta(
    file: &Path,
    subject: Option<u64>,
    sol: Option<String>,
    window: Option<(String, String)>,
    key: Option<String>,
) -> Result<()> {
    let out = meta_query(file, subject, sol, window, key)?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn meta_query(
    file: &Path,
    subject: Option<u64>,
    sol: Option<String>,
    window: Option<(String, String)>,
    key: Option<String>,
) -> Result<Value> {
    let meta = MetaFile::open(file)?;
    let out = match (subject, sol, window) {
        (Some(id), None, None) => match key {
            Some(k) => serde_json::to_value(meta.key_value_by_id(id, &k)?)?,
            None => serde_json::to_value(meta.subject_data_by_id(id)?)?,
        },
        (None, Some(sol), None) => match key {
            Some(k) => serde_json::to_value(meta.key_values_by_sol_standard(&sol, &k)?)?,
            None => json!({
                "subjects": meta.subject_ids_by_sol_standard(&sol),
                "data": meta.subject_data_by_sol_standard(&sol),
            }),
        },
        (None, None, Some((from, to))) => {
            let ids = meta.subject_ids_by_dates(&from, &to)?;
            match key {
                Some(k) => {
                    let values: Vec<MetaValue> = meta.key_values_by_list(&ids, &k)?;
                    json!({ "subjects": ids, "values": values })
                }
                None => json!({ "subjects": ids }),
            }
        }
        (None, None, None) => json!({ "sol_standards": meta.sol_standards(), "subjects": meta.subjects() }),
        _ => bail!("use only one of --subject, --sol or --from/--to"),
    };
    Ok(out)
}

fn report(tag: Option<&str>) -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "version": boxjets::VERSION,
        "tag": tag,
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
