use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::report::Sections;
use crate::config::Config;
use crate::core::metrics::Metric;
use crate::core::sampler::{RangeRule, Reduction, RoundingMode};

#[derive(Debug, Parser)]
#[command(
    name = "randfit",
    about = "KS / Cramér-von Mises uniformity checks for biased and rounded random integers",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct RandfitCli {
    /// Global: path to config (TOML); default: ~/.randfit/config.toml
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Global: fixed RNG seed (reproducible runs)
    #[arg(long = "seed", value_name = "SEED", global = true)]
    pub seed: Option<u64>,

    /// Global: sample count n per sweep sequence and per trial
    #[arg(long = "samples", short = 'n', value_name = "N", global = true)]
    pub samples: Option<usize>,

    /// Global: sample space is [0, 2^BITS)
    #[arg(long = "space-bits", value_name = "BITS", global = true)]
    pub space_bits: Option<u32>,

    /// Global: number of trials for the percentile summaries
    #[arg(long = "trials", value_name = "T", global = true)]
    pub trials: Option<usize>,

    /// Global: print the report as JSON
    #[arg(long = "json", action = ArgAction::SetTrue, global = true)]
    pub json: bool,

    /// Global: also write the rendered report to FILE
    #[arg(short = 'o', long = "out", value_name = "FILE", global = true)]
    pub out: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Full batch run: bias sweep, rounding sweep, then percentiles (default)
    Report,

    /// Bias sweep only
    ///
    /// Examples:
    ///   randfit sweep --bias-end 64 --bias-step 8
    ///   randfit sweep --range-rule legacy-modulus --bias-start 2
    Sweep {
        #[arg(long = "bias-start", value_name = "B")]
        bias_start: Option<u64>,
        #[arg(long = "bias-end", value_name = "B")]
        bias_end: Option<u64>,
        #[arg(long = "bias-step", value_name = "B")]
        bias_step: Option<u64>,
        /// truncate | legacy-modulus
        #[arg(long = "range-rule", value_name = "RULE")]
        range_rule: Option<RangeRule>,
        /// lemire | modulo
        #[arg(long = "reduction", value_name = "KIND")]
        reduction: Option<Reduction>,
    },

    /// Rounding sweep only (floor / ceil / round of scaled floats)
    Rounding {
        /// Repeatable; defaults to round, floor, ceil
        #[arg(long = "mode", value_name = "MODE")]
        modes: Vec<RoundingMode>,
    },

    /// Percentile summaries only
    Percentiles {
        /// Repeatable level in [0, 1); defaults to 0.25 0.5 0.9 0.99 0.999
        #[arg(long = "level", value_name = "L")]
        levels: Vec<f64>,
        /// Repeatable: ks | cvm; defaults to both
        #[arg(long = "metric", value_name = "METRIC")]
        metrics: Vec<Metric>,
    },
}

impl RandfitCli {
    /// Folds command-line overrides into the loaded config.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(seed) = self.seed {
            cfg.seed = Some(seed);
        }
        if let Some(n) = self.samples {
            cfg.samples = n;
        }
        if let Some(bits) = self.space_bits {
            cfg.space_bits = bits;
        }
        if let Some(trials) = self.trials {
            cfg.percentiles.trials = trials;
        }
        match &self.cmd {
            Some(Command::Sweep { bias_start, bias_end, bias_step, range_rule, reduction }) => {
                let sweep = &mut cfg.sweep;
                sweep.bias_start = bias_start.unwrap_or(sweep.bias_start);
                sweep.bias_end = bias_end.unwrap_or(sweep.bias_end);
                sweep.bias_step = bias_step.unwrap_or(sweep.bias_step);
                sweep.range_rule = range_rule.unwrap_or(sweep.range_rule);
                sweep.reduction = reduction.unwrap_or(sweep.reduction);
            }
            Some(Command::Rounding { modes }) if !modes.is_empty() => {
                cfg.sweep.modes = modes.clone();
            }
            Some(Command::Percentiles { levels, metrics }) => {
                if !levels.is_empty() {
                    cfg.percentiles.levels = levels.clone();
                }
                if !metrics.is_empty() {
                    cfg.percentiles.metrics = metrics.clone();
                }
            }
            _ => {}
        }
    }

    pub fn sections(&self) -> Sections {
        match self.cmd {
            None | Some(Command::Report) => Sections::ALL,
            Some(Command::Sweep { .. }) => Sections::BIAS,
            Some(Command::Rounding { .. }) => Sections::ROUNDING,
            Some(Command::Percentiles { .. }) => Sections::PERCENTILES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn globals_and_subcommand_overrides() {
        let cli = RandfitCli::parse_from([
            "randfit", "--seed", "5", "-n", "64", "sweep", "--bias-step", "2",
            "--range-rule", "legacy-modulus", "--reduction", "modulo",
        ]);
        let mut cfg = Config::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg.seed, Some(5));
        assert_eq!(cfg.samples, 64);
        assert_eq!(cfg.sweep.bias_step, 2);
        assert_eq!(cfg.sweep.bias_end, 32);
        assert_eq!(cfg.sweep.range_rule, RangeRule::LegacyModulus);
        assert_eq!(cfg.sweep.reduction, Reduction::Modulo);
        assert_eq!(cli.sections(), Sections::BIAS);
    }

    #[test]
    fn repeatable_modes_levels_metrics() {
        let cli = RandfitCli::parse_from(["randfit", "rounding", "--mode", "ceil", "--mode", "floor"]);
        let mut cfg = Config::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg.sweep.modes, vec![RoundingMode::Ceil, RoundingMode::Floor]);

        let cli = RandfitCli::parse_from([
            "randfit", "percentiles", "--level", "0.5", "--metric", "cvm", "--trials", "10",
        ]);
        let mut cfg = Config::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg.percentiles.levels, vec![0.5]);
        assert_eq!(cfg.percentiles.metrics, vec![Metric::Cvm]);
        assert_eq!(cfg.percentiles.trials, 10);
    }

    #[test]
    fn unknown_mode_is_rejected_by_parser() {
        let err = RandfitCli::try_parse_from(["randfit", "rounding", "--mode", "trunc"]).unwrap_err();
        assert!(err.to_string().contains("unknown rounding mode"));
    }

    #[test]
    fn no_subcommand_runs_everything() {
        let cli = RandfitCli::parse_from(["randfit", "--json"]);
        assert!(cli.json);
        assert_eq!(cli.sections(), Sections::ALL);
    }
}
