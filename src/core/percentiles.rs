//! Distribution of a metric over repeated unbiased trials, read at fixed levels.

use rand::RngCore;
use serde::Serialize;

use super::error::{StatsError, StatsResult};
use super::sampler::integer_samples;

/// p25, p50, p90, p99, p99.9
pub const DEFAULT_LEVELS: [f64; 5] = [0.25, 0.50, 0.90, 0.99, 0.999];

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Percentile {
    pub level: f64,
    pub value: f64,
}

impl Percentile {
    /// `p25`, `p50`, `p99.9`, ...
    pub fn label(&self) -> String {
        let pct = self.level * 100.0;
        let rounded = (pct * 1000.0).round() / 1000.0;
        format!("p{}", rounded)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PercentileSummary {
    pub samples: usize,
    pub space: u64,
    pub trials: usize,
    pub percentiles: Vec<Percentile>,
}

impl PercentileSummary {
    pub fn get(&self, level: f64) -> Option<f64> {
        self.percentiles.iter().find(|p| p.level == level).map(|p| p.value)
    }
}

fn validate_levels(levels: &[f64]) -> StatsResult<()> {
    match levels.iter().find(|l| !(0.0..1.0).contains(*l)) {
        Some(bad) => Err(StatsError::invalid_argument(format!(
            "percentile level {} is outside [0, 1)",
            bad
        ))),
        None => Ok(()),
    }
}

/// Rank of `level` in a sorted distribution of `len` values, without interpolation.
pub fn rank(level: f64, len: usize) -> usize {
    ((level * len as f64).floor() as usize).min(len.saturating_sub(1))
}

/// Reads each level from an already sorted distribution.
pub fn summarize(sorted: &[f64], levels: &[f64]) -> StatsResult<Vec<Percentile>> {
    if sorted.is_empty() {
        return Err(StatsError::invalid_argument("cannot read percentiles of an empty distribution"));
    }
    validate_levels(levels)?;
    Ok(levels
        .iter()
        .map(|&level| Percentile { level, value: sorted[rank(level, sorted.len())] })
        .collect())
}

/// Runs `trials` fresh unbiased sample sets of size `n` through `metric_fn`
/// and reports the requested levels of the sorted results.
pub fn percentiles<R, F>(
    rng: &mut R,
    mut metric_fn: F,
    n: usize,
    s: u64,
    trials: usize,
    levels: &[f64],
) -> StatsResult<PercentileSummary>
where
    R: RngCore + ?Sized,
    F: FnMut(&[u64], u64) -> StatsResult<f64>,
{
    if trials == 0 {
        return Err(StatsError::invalid_argument("trials must be positive"));
    }
    if n == 0 {
        return Err(StatsError::invalid_argument("sample count must be positive"));
    }
    validate_levels(levels)?;

    let mut distribution = Vec::with_capacity(trials);
    let mut xs = Vec::with_capacity(n);
    for trial in 0..trials {
        xs.clear();
        xs.extend(integer_samples(&mut *rng, n, s, 0)?);
        distribution.push(metric_fn(&xs, s)?);
        if (trial + 1) % 10_000 == 0 {
            crate::debug_log!("percentiles: {}/{} trials", trial + 1, trials);
        }
    }
    distribution.sort_by(f64::total_cmp);

    Ok(PercentileSummary {
        samples: n,
        space: s,
        trials,
        percentiles: summarize(&distribution, levels)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::{ks_metric, Metric};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn summarize_indexes_by_floor() {
        let sorted: Vec<f64> = (0..1000).map(f64::from).collect();
        for level in DEFAULT_LEVELS {
            let got = summarize(&sorted, &[level]).unwrap()[0].value;
            assert_eq!(got, sorted[(level * 1000.0).floor() as usize]);
        }
        let picked = summarize(&sorted, &DEFAULT_LEVELS).unwrap();
        let values: Vec<f64> = picked.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![250.0, 500.0, 900.0, 990.0, 999.0]);
    }

    #[test]
    fn no_interpolation_between_ranks() {
        let sorted = [1.0, 10.0, 100.0];
        assert_eq!(summarize(&sorted, &[0.5]).unwrap()[0].value, 10.0);
        assert_eq!(summarize(&sorted, &[0.0]).unwrap()[0].value, 1.0);
        assert_eq!(summarize(&sorted, &[0.99]).unwrap()[0].value, 100.0);
    }

    #[test]
    fn rank_never_leaves_the_array() {
        assert_eq!(rank(0.0, 1), 0);
        assert_eq!(rank(0.999_999_999_999_999_9, 3), 2);
        assert_eq!(rank(0.5, 0), 0);
    }

    #[test]
    fn rejects_bad_levels_and_trials() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(percentiles(&mut rng, ks_metric, 10, 100, 0, &[0.5]).is_err());
        assert!(percentiles(&mut rng, ks_metric, 10, 100, 5, &[1.0]).is_err());
        assert!(percentiles(&mut rng, ks_metric, 10, 100, 5, &[-0.1]).is_err());
        assert!(percentiles(&mut rng, ks_metric, 10, 100, 5, &[f64::NAN]).is_err());
        assert!(percentiles(&mut rng, ks_metric, 0, 100, 5, &[0.5]).is_err());
        assert!(summarize(&[], &[0.5]).is_err());
    }

    #[test]
    fn percentiles_are_ordered_and_reproducible() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            percentiles(&mut rng, |xs, s| Metric::Cvm.evaluate(xs, s), 100, 1 << 32, 500, &DEFAULT_LEVELS)
                .unwrap()
        };
        let a = run(17);
        assert_eq!(a, run(17));
        assert_eq!(a.trials, 500);
        for w in a.percentiles.windows(2) {
            assert!(w[0].value <= w[1].value);
        }
        assert!(a.get(0.5).unwrap() > 0.0);
    }

    #[test]
    fn labels() {
        let p = |level| Percentile { level, value: 0.0 }.label();
        assert_eq!(p(0.25), "p25");
        assert_eq!(p(0.5), "p50");
        assert_eq!(p(0.99), "p99");
        assert_eq!(p(0.999), "p99.9");
    }
}
