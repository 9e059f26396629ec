//! CSV Data Loader Module
//! Reads the listings CSV with Polars and hands it to the enricher.

use super::enrich::enrich;
use super::processor::ProcessorError;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error("Cannot access {}: {source}", path.display())]
    Access {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Required column '{0}' is missing")]
    MissingColumn(String),
    #[error("Column '{column}' row {row}: '{value}' is not numeric")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },
    #[error("Column '{column}' row {row}: '{value}' is not an integer")]
    NonInteger {
        column: String,
        row: usize,
        value: String,
    },
}

/// Load and enrich the listings CSV.
///
/// A file that does not exist is reported as `Ok(None)` so callers can show
/// an idle "no data" state. Any other read or conversion failure is an error.
pub fn load_listings(path: &Path) -> Result<Option<DataFrame>, LoaderError> {
    let exists = path.try_exists().map_err(|source| LoaderError::Access {
        path: path.to_path_buf(),
        source,
    })?;
    if !exists {
        log::warn!("File does not exist: {}", path.display());
        return Ok(None);
    }

    // Scan the whole file for the schema so late oddities surface as load errors
    let raw = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(None)
        .finish()?
        .collect()?;

    log::debug!(
        "Read {} rows, {} columns from {}",
        raw.height(),
        raw.width(),
        path.display()
    );

    let df = enrich(raw)?;
    log::info!("Loaded {} listings from {}", df.height(), path.display());

    Ok(Some(df))
}
