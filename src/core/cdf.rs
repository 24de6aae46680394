//! Empirical CDF of integer samples, rescaled to the unit square.

use std::collections::BTreeMap;

use serde::Serialize;

use super::error::{StatsError, StatsResult};

/// A jump point of the empirical CDF.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct CdfPoint {
    pub x: f64,
    pub y: f64,
}

impl CdfPoint {
    pub const ORIGIN: CdfPoint = CdfPoint { x: 0.0, y: 0.0 };
    pub const END: CdfPoint = CdfPoint { x: 1.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        CdfPoint { x, y }
    }

    /// Vertical distance to the uniform CDF `y = x`.
    pub fn deviation(&self) -> f64 {
        self.y - self.x
    }
}

fn counts(samples: &[u64]) -> BTreeMap<u64, usize> {
    let mut freq = BTreeMap::new();
    for &v in samples {
        *freq.entry(v).or_insert(0) += 1;
    }
    freq
}

/// Relative frequency of each distinct value, sorted by value.
pub fn frequency(samples: &[u64]) -> Vec<(u64, f64)> {
    let total = samples.len() as f64;
    counts(samples)
        .into_iter()
        .map(|(v, count)| (v, count as f64 / total))
        .collect()
}

/// Builds the empirical CDF of `samples` over the space `[0, s)`.
///
/// The result starts at `(0, 0)`, has one point `((v + 1) / s, #{x <= v} / n)`
/// per distinct value `v` in ascending order, and always ends with `(1, 1)`.
/// A value at or beyond `s` (only the rounding generators produce one) is
/// placed on the right edge, `x = 1`.
pub fn build_cdf(samples: &[u64], s: u64) -> StatsResult<Vec<CdfPoint>> {
    if samples.is_empty() {
        return Err(StatsError::invalid_argument("cannot build a CDF from an empty sample set"));
    }
    if s == 0 {
        return Err(StatsError::invalid_argument("sample space size must be positive"));
    }
    let total = samples.len() as f64;
    let space = s as f64;
    let freq = counts(samples);

    let mut cdf = Vec::with_capacity(freq.len() + 2);
    cdf.push(CdfPoint::ORIGIN);
    let mut acc = 0usize;
    for (v, count) in freq {
        acc += count;
        let x = ((v as f64 + 1.0) / space).min(1.0);
        cdf.push(CdfPoint::new(x, acc as f64 / total));
    }
    cdf.push(CdfPoint::END);
    Ok(cdf)
}
