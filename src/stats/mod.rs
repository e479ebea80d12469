//! Stats module - aggregates and the preparation summary

mod calculator;
mod report;

pub use calculator::{CategoryStats, StatsCalculator};
pub use report::{dollars, RankedMajor, SummaryReport};
