//! Statistical core: sampling, empirical CDFs, distance metrics and percentiles.
//! Only declare modules that exist in the src/core/ directory.

#[macro_use]
pub mod debug; // gated debug logging (RANDFIT_DEBUG=1) provides debug_log! macro
pub mod cdf;
pub mod error;
pub mod metrics;
pub mod percentiles;
pub mod pickrand;
pub mod sampler;

pub use cdf::{build_cdf, CdfPoint};
pub use error::{StatsError, StatsResult};
pub use metrics::{cvm_distance, cvm_metric, ks_distance, ks_metric, Metric};
pub use percentiles::{percentiles, summarize, Percentile, PercentileSummary, DEFAULT_LEVELS};
pub use sampler::{float_rounded_samples, integer_samples, RangeRule, Reduction, RoundingMode};
