use crate::data::ProcessorError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Why a chart could not be built.
///
/// `NoListings`, `NoModels` and `NoAxes` are expected outcomes of a valid
/// selection over real data; everything else points at a bug or a broken table.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Unknown histogram field '{0}' (expected make, odometer or price)")]
    UnknownField(String),
    #[error("No listings found for manufacturer '{0}'")]
    NoListings(String),
    #[error("Manufacturer '{0}' has no model names to color by")]
    NoModels(String),
    #[error("Manufacturer '{0}' has no columns to plot")]
    NoAxes(String),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

impl ChartError {
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            ChartError::NoListings(_) | ChartError::NoModels(_) | ChartError::NoAxes(_)
        )
    }

    /// Text shown in place of a chart that could not be drawn.
    pub fn user_message(&self) -> String {
        if self.is_expected() {
            format!("{self}. Try another manufacturer.")
        } else {
            format!("Error: {self}")
        }
    }
}
