//! Bias and rounding sweeps: one generated sequence per setting, scored by prefix.

use rand::RngCore;
use serde::Serialize;

use crate::config::Config;
use crate::core::cdf::frequency;
use crate::core::error::StatsResult;
use crate::core::metrics::{cvm_metric, ks_metric};
use crate::core::sampler::{biased_samples, float_rounded_samples, RoundingMode};
use crate::debug_log;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SweepRow {
    pub samples: usize,
    pub ks: f64,
    pub cvm: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SweepTable {
    pub label: String,
    pub rows: Vec<SweepRow>,
}

/// Perfect squares `4, 9, 16, ..., floor(sqrt(n))^2`.
pub fn prefix_lengths(n: usize) -> Vec<usize> {
    (2usize..)
        .map(|k| k * k)
        .take_while(|&i| i <= n)
        .collect()
}

/// Scores every square-length prefix of `xs`, so each row is a sub-sample of the next.
pub fn prefix_table(label: impl Into<String>, xs: &[u64], s: u64) -> StatsResult<SweepTable> {
    let rows = prefix_lengths(xs.len())
        .into_iter()
        .map(|i| {
            let prefix = &xs[..i];
            Ok(SweepRow {
                samples: i,
                ks: ks_metric(prefix, s)?,
                cvm: cvm_metric(prefix, s)?,
            })
        })
        .collect::<StatsResult<Vec<_>>>()?;
    Ok(SweepTable { label: label.into(), rows })
}

fn log_spread(label: &str, xs: &[u64]) {
    if crate::core::debug::is_enabled() {
        let freq = frequency(xs);
        let (lo, hi) = (freq.first().map(|f| f.0), freq.last().map(|f| f.0));
        debug_log!("{}: {} distinct values, min {:?}, max {:?}", label, freq.len(), lo, hi);
    }
}

pub fn bias_sweep<R: RngCore + ?Sized>(rng: &mut R, cfg: &Config) -> StatsResult<Vec<SweepTable>> {
    let s = cfg.space();
    cfg.biases()
        .into_iter()
        .map(|bias| {
            let xs: Vec<u64> = biased_samples(
                &mut *rng,
                cfg.samples,
                s,
                bias,
                cfg.sweep.range_rule,
                cfg.sweep.reduction,
            )?
            .collect();
            let label = format!("bias: {}", bias);
            log_spread(&label, &xs);
            prefix_table(label, &xs, s)
        })
        .collect()
}

pub fn rounding_sweep<R: RngCore + ?Sized>(
    rng: &mut R,
    cfg: &Config,
    modes: &[RoundingMode],
) -> StatsResult<Vec<SweepTable>> {
    let s = cfg.space();
    modes
        .iter()
        .map(|&mode| {
            let xs: Vec<u64> = float_rounded_samples(&mut *rng, cfg.samples, s, mode)?.collect();
            let label = format!("float bias: {}", mode);
            log_spread(&label, &xs);
            prefix_table(label, &xs, s)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sampler::RangeRule;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn prefix_lengths_are_squares_up_to_n() {
        assert_eq!(prefix_lengths(3), Vec::<usize>::new());
        assert_eq!(prefix_lengths(4), vec![4]);
        assert_eq!(prefix_lengths(30), vec![4, 9, 16, 25]);
        let full = prefix_lengths(1000);
        assert_eq!(full.first(), Some(&4));
        assert_eq!(full.last(), Some(&961));
        assert_eq!(full.len(), 30);
    }

    #[test]
    fn prefixes_score_the_same_as_standalone_samples() {
        let xs: Vec<u64> = (0..100u64).map(|i| (i * 37) % 64).collect();
        let table = prefix_table("t", &xs, 64).unwrap();
        for row in &table.rows {
            assert_eq!(row.ks, ks_metric(&xs[..row.samples].to_vec(), 64).unwrap());
            assert_eq!(row.cvm, cvm_metric(&xs[..row.samples].to_vec(), 64).unwrap());
        }
    }

    #[test]
    fn sweeps_produce_one_table_per_setting() {
        let mut cfg = Config::default();
        cfg.samples = 50;
        cfg.space_bits = 10;
        let mut rng = StdRng::seed_from_u64(4);
        let bias = bias_sweep(&mut rng, &cfg).unwrap();
        assert_eq!(bias.len(), 8);
        assert_eq!(bias[1].label, "bias: 4");
        assert!(bias.iter().all(|t| t.rows.len() == 6));

        let rounding = rounding_sweep(&mut rng, &cfg, &RoundingMode::ALL).unwrap();
        let labels: Vec<&str> = rounding.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["float bias: round", "float bias: floor", "float bias: ceil"]);
    }

    #[test]
    fn legacy_rule_fails_on_bias_one() {
        let mut cfg = Config::default();
        cfg.samples = 10;
        cfg.sweep.range_rule = RangeRule::LegacyModulus;
        cfg.sweep.bias_start = 0;
        cfg.sweep.bias_end = 3;
        cfg.sweep.bias_step = 1;
        let mut rng = StdRng::seed_from_u64(4);
        assert!(bias_sweep(&mut rng, &cfg).is_err());
    }
}
