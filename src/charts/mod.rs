//! Charts module - Chart specification and rendering

mod builder;
mod dashboard;
mod error;
mod fields;
mod palette;
mod parallel;
mod plotter;
mod renderer;
pub mod spec;

pub use builder::{
    ChartBuilder, COMPARISON_BINS, COMPARISON_OPACITY, DEFAULT_BINS, HISTOGRAM_OPACITY,
    ODOMETER_BINS,
};
pub use dashboard::{DashboardCharts, Selections};
pub use error::ChartError;
pub use fields::{dimension_label, ColorField, HistogramField, ScatterField};
pub use palette::{Palette, Rgb};
pub use parallel::{parallel_coordinates, DROPPED_COLUMNS, IDENTITY_COLUMNS, MODEL_CODE};
pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
pub use spec::ChartSpec;
