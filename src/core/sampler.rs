//! Candidate "random" draws: unbiased, deliberately biased, or rounded floats.
//!
//! Every generator borrows the caller's RNG and yields exactly `n` values
//! lazily, so a single sequence can be generated once and consumed by prefix.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use rand::RngCore;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use super::error::{StatsError, StatsResult};
use super::pickrand;

/// How a bias is turned into the size of the draw range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeRule {
    /// Draw from `[0, s - bias)`.
    #[default]
    Truncate,
    /// Draw from `[0, s % (s + 1 - bias))`, the formula of the first
    /// version of this tool. For `2 <= bias <= s / 2` it collapses the
    /// range to `bias - 1` values.
    LegacyModulus,
}

impl RangeRule {
    /// Size of the range that samples are drawn from.
    pub fn range(self, s: u64, bias: u64) -> StatsResult<NonZeroU64> {
        let range = match self {
            RangeRule::Truncate => {
                if bias >= s {
                    return Err(StatsError::invalid_argument(format!(
                        "bias {} leaves no values in a space of size {}",
                        bias, s
                    )));
                }
                s - bias
            }
            RangeRule::LegacyModulus => {
                if bias > s {
                    return Err(StatsError::invalid_argument(format!(
                        "bias {} exceeds the space size {}",
                        bias, s
                    )));
                }
                // s + 1 - bias >= 1 here; it only overflows for s == u64::MAX, bias == 0.
                match (s - bias).checked_add(1) {
                    Some(modulus) => s % modulus,
                    None => s,
                }
            }
        };
        NonZeroU64::new(range).ok_or_else(|| {
            StatsError::invalid_argument(format!(
                "bias {} selects an empty range under the {} rule",
                bias, self
            ))
        })
    }
}

impl fmt::Display for RangeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RangeRule::Truncate => "truncate",
            RangeRule::LegacyModulus => "legacy-modulus",
        })
    }
}

impl FromStr for RangeRule {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "truncate" => Ok(RangeRule::Truncate),
            "legacy-modulus" => Ok(RangeRule::LegacyModulus),
            other => Err(StatsError::invalid_argument(format!(
                "unknown range rule '{}' (expected truncate or legacy-modulus)",
                other
            ))),
        }
    }
}

/// How a raw 64-bit word is reduced into the draw range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reduction {
    #[default]
    Lemire,
    Modulo,
}

impl Reduction {
    fn draw<R: RngCore + ?Sized>(self, rng: &mut R, range: NonZeroU64) -> u64 {
        let n = range.get();
        let drawn = match self {
            Reduction::Lemire => pickrand::uint64_below(rng, n),
            Reduction::Modulo => pickrand::modulo_below(rng, n),
        };
        // n is non-zero, so neither reduction can fail.
        drawn.unwrap_or_default()
    }
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Reduction::Lemire => "lemire",
            Reduction::Modulo => "modulo",
        })
    }
}

impl FromStr for Reduction {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lemire" => Ok(Reduction::Lemire),
            "modulo" => Ok(Reduction::Modulo),
            other => Err(StatsError::invalid_argument(format!(
                "unknown reduction '{}' (expected lemire or modulo)",
                other
            ))),
        }
    }
}

/// Rounding policy applied to `u * s` by [`float_rounded_samples`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    Floor,
    Ceil,
    /// Nearest integer, ties to even.
    Round,
}

impl RoundingMode {
    pub const ALL: [RoundingMode; 3] = [RoundingMode::Round, RoundingMode::Floor, RoundingMode::Ceil];

    pub fn apply(self, value: f64) -> f64 {
        match self {
            RoundingMode::Floor => value.floor(),
            RoundingMode::Ceil => value.ceil(),
            RoundingMode::Round => value.round_ties_even(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RoundingMode::Floor => "floor",
            RoundingMode::Ceil => "ceil",
            RoundingMode::Round => "round",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoundingMode {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "floor" => Ok(RoundingMode::Floor),
            "ceil" => Ok(RoundingMode::Ceil),
            "round" => Ok(RoundingMode::Round),
            other => Err(StatsError::invalid_argument(format!(
                "unknown rounding mode '{}' (expected floor, ceil or round)",
                other
            ))),
        }
    }
}

/// `n` values drawn from `[0, range)` with the given reduction.
pub fn integer_samples_with<'a, R: RngCore + ?Sized>(
    rng: &'a mut R,
    n: usize,
    range: NonZeroU64,
    reduction: Reduction,
) -> impl Iterator<Item = u64> + 'a {
    (0..n).map(move |_| reduction.draw(&mut *rng, range))
}

/// `n` values drawn uniformly from `[0, s - bias)`.
pub fn integer_samples<'a, R: RngCore + ?Sized>(
    rng: &'a mut R,
    n: usize,
    s: u64,
    bias: u64,
) -> StatsResult<impl Iterator<Item = u64> + 'a> {
    biased_samples(rng, n, s, bias, RangeRule::Truncate, Reduction::Lemire)
}

/// `n` values drawn from the range `rule` selects for `bias`.
pub fn biased_samples<'a, R: RngCore + ?Sized>(
    rng: &'a mut R,
    n: usize,
    s: u64,
    bias: u64,
    rule: RangeRule,
    reduction: Reduction,
) -> StatsResult<impl Iterator<Item = u64> + 'a> {
    if s == 0 {
        return Err(StatsError::invalid_argument("sample space size must be positive"));
    }
    let range = rule.range(s, bias)?;
    Ok(integer_samples_with(rng, n, range, reduction))
}

/// `n` values `mode(u * s)` for `u` uniform in `[0, 1)`.
///
/// `Ceil` and `Round` can land on `s` itself, one past the sample space.
pub fn float_rounded_samples<'a, R: RngCore + ?Sized>(
    rng: &'a mut R,
    n: usize,
    s: u64,
    mode: RoundingMode,
) -> StatsResult<impl Iterator<Item = u64> + 'a> {
    if s == 0 {
        return Err(StatsError::invalid_argument("sample space size must be positive"));
    }
    let unit = Uniform::new(0.0f64, 1.0f64);
    let scale = s as f64;
    Ok((0..n).map(move |_| mode.apply(unit.sample(&mut *rng) * scale) as u64))
}
