//! Statistics Calculator Module
//! Descriptive price statistics per manufacturer.

use crate::data::{DataProcessor, ProcessorError};
use polars::prelude::DataFrame;
use rayon::prelude::*;
use statrs::statistics::{Data, Distribution, Median, OrderStatistics};
use std::collections::HashMap;

/// Price statistics for a single manufacturer.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSummary {
    pub make: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub p05: f64,
    pub p95: f64,
}

impl PriceSummary {
    fn empty(make: &str) -> Self {
        Self {
            make: make.to_string(),
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            p05: f64::NAN,
            p95: f64::NAN,
        }
    }
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for one manufacturer's prices.
    pub fn summarize(make: &str, prices: Vec<f64>) -> PriceSummary {
        let count = prices.len();
        if count == 0 {
            return PriceSummary::empty(make);
        }

        let mut data = Data::new(prices);
        let mean = data.mean().unwrap_or(f64::NAN);
        let std = if count > 1 {
            data.std_dev().unwrap_or(f64::NAN)
        } else {
            0.0
        };
        let median = data.median();
        let p05 = data.percentile(5);
        let p95 = data.percentile(95);

        PriceSummary {
            make: make.to_string(),
            count,
            mean,
            median,
            std,
            p05,
            p95,
        }
    }

    /// Summaries for the selected manufacturers, in selection order.
    pub fn price_summaries(
        df: &DataFrame,
        makes: &[String],
    ) -> Result<Vec<PriceSummary>, ProcessorError> {
        let prices = DataProcessor::float_values(df, "price")?;
        let row_makes = DataProcessor::string_values(df, "make")?;

        let mut by_make: HashMap<&str, Vec<f64>> = HashMap::new();
        for (make, price) in row_makes.iter().zip(prices) {
            if let (Some(make), Some(price)) = (make, price) {
                by_make.entry(make.as_str()).or_default().push(price);
            }
        }

        // Use rayon for parallel computation
        let summaries = makes
            .par_iter()
            .map(|make| {
                let values = by_make.get(make.as_str()).cloned().unwrap_or_default();
                Self::summarize(make, values)
            })
            .collect();

        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_summarize_basic_stats() {
        let summary = StatsCalculator::summarize("ford", vec![10.0, 30.0, 20.0]);
        assert_eq!(summary.count, 3);
        assert!((summary.mean - 20.0).abs() < 1e-9);
        assert!((summary.median - 20.0).abs() < 1e-9);
        assert!((summary.std - 10.0).abs() < 1e-9);
        assert!(summary.p05 <= summary.median && summary.median <= summary.p95);
    }

    #[test]
    fn test_summarize_single_value() {
        let summary = StatsCalculator::summarize("kia", vec![500.0]);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.std, 0.0);
        assert!((summary.median - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_summaries_follow_selection_order() {
        let df = df!(
            "make" => ["ford", "bmw", "ford", "bmw"],
            "price" => [Some(1000.0), Some(3000.0), Some(2000.0), None]
        )
        .unwrap();

        let selection = vec!["bmw".to_string(), "ford".to_string(), "tesla".to_string()];
        let summaries = StatsCalculator::price_summaries(&df, &selection).unwrap();

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].make, "bmw");
        assert_eq!(summaries[0].count, 1);
        assert_eq!(summaries[1].count, 2);
        assert!((summaries[1].mean - 1500.0).abs() < 1e-9);
        assert_eq!(summaries[2].count, 0);
        assert!(summaries[2].mean.is_nan());
    }
}
