//! Assembling, rendering and emitting a run.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use super::percentiles::{metric_percentiles, MetricPercentiles};
use super::sweep::{bias_sweep, rounding_sweep, SweepTable};
use crate::config::Config;
use crate::debug_log;
use crate::io::atomic::atomic_write;

/// Which parts of the batch run to perform.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sections {
    pub bias: bool,
    pub rounding: bool,
    pub percentiles: bool,
}

impl Sections {
    pub const ALL: Sections = Sections { bias: true, rounding: true, percentiles: true };
    pub const BIAS: Sections = Sections { bias: true, rounding: false, percentiles: false };
    pub const ROUNDING: Sections = Sections { bias: false, rounding: true, percentiles: false };
    pub const PERCENTILES: Sections = Sections { bias: false, rounding: false, percentiles: true };
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub seed: u64,
    pub samples: usize,
    pub space: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bias: Vec<SweepTable>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rounding: Vec<SweepTable>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub percentiles: Vec<MetricPercentiles>,
}

/// Runs the requested sections in a fixed order on one seeded RNG.
pub fn build(cfg: &Config, sections: Sections) -> Result<Report> {
    let seed = cfg.seed.unwrap_or_else(rand::random);
    debug_log!("report: seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut report = Report {
        seed,
        samples: cfg.samples,
        space: cfg.space(),
        bias: Vec::new(),
        rounding: Vec::new(),
        percentiles: Vec::new(),
    };
    if sections.bias {
        report.bias = bias_sweep(&mut rng, cfg).context("bias sweep")?;
    }
    if sections.rounding {
        report.rounding = rounding_sweep(&mut rng, cfg, &cfg.sweep.modes).context("rounding sweep")?;
    }
    if sections.percentiles {
        report.percentiles = metric_percentiles(&mut rng, cfg).context("percentile trials")?;
    }
    Ok(report)
}

fn render_table(out: &mut String, table: &SweepTable) {
    let _ = writeln!(out, "{}", table.label);
    for row in &table.rows {
        let _ = writeln!(out, "{:>4} {:.3} {:.3}", row.samples, row.ks, row.cvm);
    }
    out.push('\n');
}

/// Plain-text layout: one block per sweep table, then `pNN: value` lines per metric.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    for table in report.bias.iter().chain(&report.rounding) {
        render_table(&mut out, table);
    }
    for mp in &report.percentiles {
        let _ = writeln!(
            out,
            "{} percentiles (n = {}, s = {}, {} trials)",
            mp.metric, mp.summary.samples, mp.summary.space, mp.summary.trials
        );
        for p in &mp.summary.percentiles {
            let _ = writeln!(out, "{}: {:.3}", p.label(), p.value);
        }
        out.push('\n');
    }
    out
}

pub fn render_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).context("serializing report")
}

/// Prints the report and, when asked, also writes it to `out`.
pub fn emit(report: &Report, json: bool, out: Option<&Path>) -> Result<()> {
    let rendered = if json { render_json(report)? + "\n" } else { render_text(report) };
    print!("{}", rendered);
    if let Some(path) = out {
        atomic_write(path, rendered.as_bytes())
            .with_context(|| format!("writing report to {}", path.display()))?;
        eprintln!("{} {}", "wrote".green().bold(), path.display());
    }
    Ok(())
}

pub fn run(cfg: &Config, sections: Sections, json: bool, out: Option<&Path>) -> Result<()> {
    let report = build(cfg, sections)?;
    emit(&report, json, out)
}
