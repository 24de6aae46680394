pub mod percentiles;
pub mod report;
pub mod sweep;
