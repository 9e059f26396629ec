//! Stats module - Histogram binning and price summaries

mod binning;
mod calculator;

pub use binning::NumericBins;
pub use calculator::{PriceSummary, StatsCalculator};
