//! Uniformity checks for integer random sources.
//!
//! `core` holds the statistics (sampling, empirical CDF, KS / CvM metrics,
//! percentile trials); `commands` drives them into sweeps and reports.
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
