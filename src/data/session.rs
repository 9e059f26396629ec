use super::processor::{DataProcessor, ProcessorError};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Per-session context: the enriched listings plus lookups every render needs.
///
/// Chart builders only ever receive `&Session` (or the table inside it), so the
/// table stays read-only for the lifetime of the session.
#[derive(Debug, Clone)]
pub struct Session {
    listings: DataFrame,
    makes: Vec<String>,
    source: PathBuf,
}

impl Session {
    pub fn new(listings: DataFrame, source: impl Into<PathBuf>) -> Result<Self, ProcessorError> {
        let makes = DataProcessor::unique_values(&listings, "make")?;
        Ok(Self {
            listings,
            makes,
            source: source.into(),
        })
    }

    pub fn listings(&self) -> &DataFrame {
        &self.listings
    }

    /// Manufacturers in order of first appearance.
    pub fn makes(&self) -> &[String] {
        &self.makes
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn row_count(&self) -> usize {
        self.listings.height()
    }
}
