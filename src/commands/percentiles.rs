use rand::RngCore;
use serde::Serialize;

use crate::config::Config;
use crate::core::error::StatsResult;
use crate::core::metrics::Metric;
use crate::core::percentiles::{percentiles, PercentileSummary};
use crate::debug_log;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricPercentiles {
    pub metric: Metric,
    #[serde(flatten)]
    pub summary: PercentileSummary,
}

/// Null distribution of each configured metric, one after the other on the same RNG.
pub fn metric_percentiles<R: RngCore + ?Sized>(
    rng: &mut R,
    cfg: &Config,
) -> StatsResult<Vec<MetricPercentiles>> {
    let pc = &cfg.percentiles;
    pc.metrics
        .iter()
        .map(|&metric| {
            debug_log!("percentiles: {} over {} trials of n = {}", metric, pc.trials, cfg.samples);
            let summary = percentiles(
                &mut *rng,
                |xs, s| metric.evaluate(xs, s),
                cfg.samples,
                cfg.space(),
                pc.trials,
                &pc.levels,
            )?;
            Ok(MetricPercentiles { metric, summary })
        })
        .collect()
}
