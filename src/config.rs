//! Run configuration: built-in defaults + optional TOML file.
//!
//! - `Config::default()` → the original batch run (n = 1000, s = 2^32, 100k trials)
//! - `Config::from_toml_file(path)` → load a user config
//! - `Config::load(path, explicit)` → file if present, defaults otherwise
//! - `validate(&self)` → reject settings the core would choke on later

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::debug::warn;
use crate::core::error::StatsError;
use crate::core::metrics::Metric;
use crate::core::percentiles::DEFAULT_LEVELS;
use crate::core::sampler::{RangeRule, Reduction, RoundingMode};
use crate::debug_log;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fixed RNG seed; entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Sample count `n` for sweeps and trials.
    pub samples: usize,
    /// The sample space is `[0, 2^space_bits)`.
    pub space_bits: u32,
    pub sweep: SweepConfig,
    pub percentiles: PercentilesConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub bias_start: u64,
    pub bias_end: u64,
    pub bias_step: u64,
    pub range_rule: RangeRule,
    pub reduction: Reduction,
    pub modes: Vec<RoundingMode>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PercentilesConfig {
    pub trials: usize,
    pub levels: Vec<f64>,
    pub metrics: Vec<Metric>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            samples: 1000,
            space_bits: 32,
            sweep: SweepConfig::default(),
            percentiles: PercentilesConfig::default(),
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            bias_start: 0,
            bias_end: 32,
            bias_step: 4,
            range_rule: RangeRule::Truncate,
            reduction: Reduction::Lemire,
            modes: RoundingMode::ALL.to_vec(),
        }
    }
}

impl Default for PercentilesConfig {
    fn default() -> Self {
        Self {
            trials: 100_000,
            levels: DEFAULT_LEVELS.to_vec(),
            metrics: Metric::ALL.to_vec(),
        }
    }
}

impl Config {
    /// Load from TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let cfg: Config = toml::from_str(&txt)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg)
    }

    /// An explicitly requested file must exist and parse; a broken file at the
    /// default location only earns a warning.
    pub fn load(path: Option<&Path>, explicit: bool) -> Result<Self> {
        match path {
            Some(p) if explicit => Self::from_toml_file(p),
            Some(p) if p.exists() => match Self::from_toml_file(p) {
                Ok(cfg) => {
                    debug_log!("config: loaded {}", p.display());
                    Ok(cfg)
                }
                Err(e) => {
                    warn(&format!("failed loading {} ({:#}), using defaults", p.display(), e));
                    Ok(Self::default())
                }
            },
            _ => {
                debug_log!("config: using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Size of the sample space, `2^space_bits`.
    pub fn space(&self) -> u64 {
        1u64 << self.space_bits
    }

    /// Bias levels of the sweep, `bias_start..bias_end` by `bias_step`.
    pub fn biases(&self) -> Vec<u64> {
        let step = self.sweep.bias_step.max(1) as usize;
        (self.sweep.bias_start..self.sweep.bias_end).step_by(step).collect()
    }

    pub fn validate(&self) -> Result<(), StatsError> {
        if !(1..=63).contains(&self.space_bits) {
            return Err(StatsError::invalid_config(format!(
                "space_bits must be between 1 and 63, got {}",
                self.space_bits
            )));
        }
        if self.samples == 0 {
            return Err(StatsError::invalid_config("samples must be positive"));
        }
        if self.sweep.bias_step == 0 {
            return Err(StatsError::invalid_config("sweep.bias_step must be positive"));
        }
        if self.sweep.bias_start > self.sweep.bias_end {
            return Err(StatsError::invalid_config(format!(
                "sweep.bias_start {} is past sweep.bias_end {}",
                self.sweep.bias_start, self.sweep.bias_end
            )));
        }
        if self.percentiles.trials == 0 {
            return Err(StatsError::invalid_config("percentiles.trials must be positive"));
        }
        if let Some(bad) = self.percentiles.levels.iter().find(|l| !(0.0..1.0).contains(*l)) {
            return Err(StatsError::invalid_config(format!(
                "percentiles.levels entry {} is outside [0, 1)",
                bad
            )));
        }
        Ok(())
    }
}

/// ~/.randfit/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|h| h.join(".randfit").join("config.toml"))
}

pub fn resolve_config_path(cli_path: &Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = cli_path {
        return Some(p.clone());
    }
    default_config_path()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_batch_run() {
        let cfg = Config::default();
        assert_eq!(cfg.samples, 1000);
        assert_eq!(cfg.space(), 1 << 32);
        assert_eq!(cfg.biases(), vec![0, 4, 8, 12, 16, 20, 24, 28]);
        assert_eq!(cfg.sweep.modes, vec![RoundingMode::Round, RoundingMode::Floor, RoundingMode::Ceil]);
        assert_eq!(cfg.percentiles.trials, 100_000);
        assert_eq!(cfg.percentiles.levels, DEFAULT_LEVELS.to_vec());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml() {
        let cfg: Config = toml::from_str(
            r#"
            seed = 7
            space_bits = 8

            [sweep]
            range_rule = "legacy-modulus"
            reduction = "modulo"
            modes = ["ceil"]

            [percentiles]
            trials = 50
            metrics = ["ks"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.space(), 256);
        assert_eq!(cfg.samples, 1000);
        assert_eq!(cfg.sweep.range_rule, RangeRule::LegacyModulus);
        assert_eq!(cfg.sweep.reduction, Reduction::Modulo);
        assert_eq!(cfg.sweep.modes, vec![RoundingMode::Ceil]);
        assert_eq!(cfg.sweep.bias_step, 4);
        assert_eq!(cfg.percentiles.trials, 50);
        assert_eq!(cfg.percentiles.metrics, vec![Metric::Ks]);
    }

    #[test]
    fn rejects_unknown_mode_and_keys() {
        assert!(toml::from_str::<Config>("[sweep]\nmodes = [\"trunc\"]").is_err());
        assert!(toml::from_str::<Config>("bogus = 1").is_err());
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut cfg = Config::default();
        cfg.space_bits = 64;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.sweep.bias_step = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.percentiles.levels = vec![0.5, 1.0];
        assert!(matches!(cfg.validate(), Err(StatsError::InvalidConfig(_))));

        let mut cfg = Config::default();
        cfg.percentiles.trials = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_falls_back_only_for_default_location() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert_eq!(Config::load(Some(&missing), false).unwrap(), Config::default());
        assert!(Config::load(Some(&missing), true).is_err());

        let present = dir.path().join("config.toml");
        fs::write(&present, "samples = 64\n").unwrap();
        assert_eq!(Config::load(Some(&present), false).unwrap().samples, 64);

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "samples = \"many\"\n").unwrap();
        assert_eq!(Config::load(Some(&broken), false).unwrap(), Config::default());
        assert!(Config::load(Some(&broken), true).is_err());
    }
}
