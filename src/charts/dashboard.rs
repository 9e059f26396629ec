//! The full set of dashboard charts for one session and one set of selections.

use super::builder::{ChartBuilder, DEFAULT_BINS, ODOMETER_BINS};
use super::error::ChartError;
use super::fields::{ColorField, HistogramField, ScatterField};
use super::parallel::parallel_coordinates;
use super::spec::{ChartSpec, Plot};
use crate::data::Session;
use crate::stats::{PriceSummary, StatsCalculator};

/// Widget state that feeds the charts. Rebuilt from the UI on every frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selections {
    pub color_field: ColorField,
    pub compared_makes: Vec<String>,
    pub scatter_field: ScatterField,
    pub parallel_make: Option<String>,
}

impl Selections {
    /// Defaults with the parallel chart pointed at the first manufacturer.
    pub fn for_session(session: &Session) -> Self {
        Self {
            parallel_make: session.makes().first().cloned(),
            ..Self::default()
        }
    }
}

/// Built charts, in dashboard order.
#[derive(Debug)]
pub struct DashboardCharts {
    pub vehicles_by_make: ChartSpec,
    pub odometer: ChartSpec,
    pub price: ChartSpec,
    pub comparison: Option<ChartSpec>,
    pub summaries: Vec<PriceSummary>,
    pub scatter: ChartSpec,
    pub scatter_field: ScatterField,
    /// `None` when no manufacturer is selected.
    pub parallel: Option<Result<ChartSpec, ChartError>>,
}

impl DashboardCharts {
    pub fn build(session: &Session, selections: &Selections) -> Result<Self, ChartError> {
        let df = session.listings();

        let vehicles_by_make = ChartBuilder::histogram(
            df,
            HistogramField::Make,
            selections.color_field.column(),
            DEFAULT_BINS,
        )?;
        let odometer = ChartBuilder::histogram(df, HistogramField::Odometer, "make", ODOMETER_BINS)?;
        let price = ChartBuilder::histogram(df, HistogramField::Price, "make", DEFAULT_BINS)?;

        let comparison = ChartBuilder::price_comparison(df, &selections.compared_makes)?;
        let summaries = StatsCalculator::price_summaries(df, &selections.compared_makes)?;

        let scatter = ChartBuilder::scatter(df, selections.scatter_field)?;

        let parallel = selections.parallel_make.as_deref().map(|make| {
            let result = parallel_coordinates(df, make);
            match &result {
                Err(e) if e.is_expected() => log::warn!("Parallel coordinates: {}", e),
                Err(e) => log::error!("Parallel coordinates for {} failed: {}", make, e),
                Ok(_) => {}
            }
            result
        });

        log::debug!(
            "Built dashboard charts for {} listings ({} compared manufacturers)",
            session.row_count(),
            selections.compared_makes.len()
        );

        Ok(Self {
            vehicles_by_make,
            odometer,
            price,
            comparison,
            summaries,
            scatter,
            scatter_field: selections.scatter_field,
            parallel,
        })
    }

    /// Charts worth writing to disk, keyed by a file-friendly name.
    pub fn exportable(&self) -> Vec<(String, &ChartSpec)> {
        let mut charts = vec![
            ("vehicles_by_manufacturer".to_string(), &self.vehicles_by_make),
            ("odometer_distribution".to_string(), &self.odometer),
            ("price_distribution".to_string(), &self.price),
        ];
        if let Some(comparison) = &self.comparison {
            charts.push(("price_comparison".to_string(), comparison));
        }
        charts.push((format!("scatter_{}", self.scatter_field.column()), &self.scatter));
        if let Some(Ok(parallel)) = &self.parallel {
            if let Plot::ParallelCoordinates(plot) = &parallel.plot {
                charts.push((format!("parallel_{}", file_stem(&plot.make)), parallel));
            }
        }
        charts
    }
}

/// Lowercase name with anything but ASCII alphanumerics replaced by `_`.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
