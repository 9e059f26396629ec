//! Chart Builder Module
//! Turns the listings table plus a chart request into a `ChartSpec`.

use super::error::ChartError;
use super::fields::{HistogramField, ScatterField};
use super::palette::Palette;
use super::spec::{
    Axis, BarMode, Bins, ChartSpec, HistogramPlot, HistogramSeries, Layout, Plot, ScatterPlot,
    ScatterSeries,
};
use crate::data::DataProcessor;
use crate::stats::NumericBins;
use polars::prelude::DataFrame;
use std::collections::HashMap;

/// Default bin count of the distribution histograms.
pub const DEFAULT_BINS: usize = 500;
/// Bin count of the odometer histogram on the dashboard.
pub const ODOMETER_BINS: usize = 100;
/// Bin count of the manufacturer price comparison.
pub const COMPARISON_BINS: usize = 100;

pub const HISTOGRAM_OPACITY: f32 = 0.8;
pub const COMPARISON_OPACITY: f32 = 0.7;

const VEHICLES_AXIS: &str = "Number of Vehicles";
const OCCURRENCES_AXIS: &str = "Number of Occurrences";

/// Builds histogram and scatter specifications.
pub struct ChartBuilder;

impl ChartBuilder {
    /// Histogram of `x`, one stacked series per distinct value of `color`.
    ///
    /// The table is used as given; callers filter beforehand.
    pub fn histogram(
        df: &DataFrame,
        x: HistogramField,
        color: &str,
        nbins: usize,
    ) -> Result<ChartSpec, ChartError> {
        let plot = Self::histogram_plot(
            df,
            x.column(),
            x.is_categorical(),
            color,
            nbins,
            BarMode::Stack,
            HISTOGRAM_OPACITY,
        )?;

        Ok(ChartSpec {
            title: x.title().to_string(),
            x_axis: Axis::new(x.axis_label()),
            y_axis: Axis::new(VEHICLES_AXIS),
            layout: Layout::default(),
            plot: Plot::Histogram(plot),
        })
    }

    /// Same as [`ChartBuilder::histogram`] with the x field given by column name.
    pub fn histogram_by_name(
        df: &DataFrame,
        x: &str,
        color: &str,
        nbins: usize,
    ) -> Result<ChartSpec, ChartError> {
        Self::histogram(df, x.parse()?, color, nbins)
    }

    /// Overlayed price histograms of the selected manufacturers.
    ///
    /// An empty selection is the idle state and yields `Ok(None)`.
    pub fn price_comparison(
        df: &DataFrame,
        makes: &[String],
    ) -> Result<Option<ChartSpec>, ChartError> {
        if makes.is_empty() {
            return Ok(None);
        }

        let selected = DataProcessor::filter_by_makes(df, makes)?;
        let plot = Self::histogram_plot(
            &selected,
            "price",
            false,
            "make",
            COMPARISON_BINS,
            BarMode::Overlay,
            COMPARISON_OPACITY,
        )?;

        Ok(Some(ChartSpec {
            title: "Price Distribution Comparison".to_string(),
            x_axis: Axis::new("USD"),
            y_axis: Axis::new(OCCURRENCES_AXIS),
            layout: Layout::default(),
            plot: Plot::Histogram(plot),
        }))
    }

    /// Price against odometer or days listed, one series per manufacturer.
    pub fn scatter(df: &DataFrame, x: ScatterField) -> Result<ChartSpec, ChartError> {
        let xs = DataProcessor::float_values(df, x.column())?;
        let prices = DataProcessor::float_values(df, "price")?;
        let makes = DataProcessor::string_values(df, "make")?;

        let mut series: Vec<ScatterSeries> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();

        for ((x, y), make) in xs.into_iter().zip(prices).zip(makes) {
            let (Some(x), Some(y), Some(make)) = (x, y, make) else {
                continue;
            };
            let slot = *slots.entry(make.clone()).or_insert_with(|| {
                series.push(ScatterSeries {
                    name: make,
                    color: Palette::PLOTLY.color(series.len()),
                    points: Vec::new(),
                });
                series.len() - 1
            });
            series[slot].points.push([x, y]);
        }

        Ok(ChartSpec {
            title: x.title().to_string(),
            x_axis: Axis::new(x.column()),
            y_axis: Axis::new("price"),
            layout: Layout::default(),
            plot: Plot::Scatter(ScatterPlot { series }),
        })
    }

    fn histogram_plot(
        df: &DataFrame,
        x: &str,
        categorical: bool,
        color: &str,
        nbins: usize,
        barmode: BarMode,
        opacity: f32,
    ) -> Result<HistogramPlot, ChartError> {
        let groups = DataProcessor::string_values(df, color)?;

        let (bins, positions) = if categorical {
            Self::categorical_positions(DataProcessor::string_values(df, x)?, &groups)
        } else {
            Self::numeric_positions(DataProcessor::float_values(df, x)?, &groups, nbins)
        };

        let mut series: Vec<HistogramSeries> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();

        for (position, group) in positions.into_iter().zip(groups) {
            let (Some(position), Some(group)) = (position, group) else {
                continue;
            };
            let slot = *slots.entry(group.clone()).or_insert_with(|| {
                series.push(HistogramSeries {
                    name: group,
                    color: Palette::PLOTLY.color(series.len()),
                    counts: vec![0; bins.len()],
                });
                series.len() - 1
            });
            series[slot].counts[position] += 1;
        }

        Ok(HistogramPlot {
            barmode,
            opacity,
            bins,
            series,
        })
    }

    /// One bin per distinct value, in order of first appearance.
    fn categorical_positions(
        values: Vec<Option<String>>,
        groups: &[Option<String>],
    ) -> (Bins, Vec<Option<usize>>) {
        let mut categories: Vec<String> = Vec::new();
        let mut lookup: HashMap<String, usize> = HashMap::new();

        let positions = values
            .into_iter()
            .zip(groups)
            .map(|(value, group)| {
                let value = value?;
                group.as_ref()?;
                let index = *lookup.entry(value.clone()).or_insert_with(|| {
                    categories.push(value);
                    categories.len() - 1
                });
                Some(index)
            })
            .collect();

        (Bins::Categorical { categories }, positions)
    }

    fn numeric_positions(
        values: Vec<Option<f64>>,
        groups: &[Option<String>],
        nbins: usize,
    ) -> (Bins, Vec<Option<usize>>) {
        let counted = values
            .iter()
            .zip(groups)
            .filter(|(_, group)| group.is_some())
            .filter_map(|(value, _)| *value);

        let Some(numeric) = NumericBins::from_values(counted, nbins) else {
            return (
                Bins::Numeric {
                    start: 0.0,
                    size: 1.0,
                    count: 0,
                },
                vec![None; values.len()],
            );
        };

        let positions = values
            .iter()
            .map(|value| value.and_then(|v| numeric.index_of(v)))
            .collect();
        (numeric.into(), positions)
    }
}
