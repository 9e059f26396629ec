//! Data Processor Module
//! Column extraction, value counts and manufacturer filters over the listings table.

use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Manufacturers need strictly more ads than this to count as popular.
pub const POPULAR_MAKE_THRESHOLD: usize = 1000;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' not found")]
    MissingColumn(String),
}

/// Read-only queries over the enriched listings table.
pub struct DataProcessor;

impl DataProcessor {
    pub fn is_integer_dtype(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    pub fn is_numeric_dtype(dtype: &DataType) -> bool {
        Self::is_integer_dtype(dtype) || matches!(dtype, DataType::Float32 | DataType::Float64)
    }

    fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ProcessorError> {
        df.column(name)
            .map_err(|_| ProcessorError::MissingColumn(name.to_string()))
    }

    /// Values of a column rendered as text, nulls preserved.
    pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, ProcessorError> {
        let column = Self::column(df, name)?.cast(&DataType::String)?;
        let values = column
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Ok(values)
    }

    /// Values of a column as floats. Text that does not parse becomes null.
    pub fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
        let column = Self::column(df, name)?.cast(&DataType::Float64)?;
        let values = column
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    }

    /// Distinct non-null values in order of first appearance.
    pub fn unique_values(df: &DataFrame, name: &str) -> Result<Vec<String>, ProcessorError> {
        let mut seen = HashSet::new();
        let unique = Self::string_values(df, name)?
            .into_iter()
            .flatten()
            .filter(|v| seen.insert(v.clone()))
            .collect();
        Ok(unique)
    }

    /// Occurrences per distinct value, most frequent first.
    /// Ties keep first-appearance order.
    pub fn value_counts(df: &DataFrame, name: &str) -> Result<Vec<(String, usize)>, ProcessorError> {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        for value in Self::string_values(df, name)?.into_iter().flatten() {
            let count = counts.entry(value.clone()).or_insert_with(|| {
                order.push(value.clone());
                0
            });
            *count += 1;
        }

        let mut result: Vec<(String, usize)> = order
            .into_iter()
            .map(|value| {
                let count = counts.get(&value).copied().unwrap_or(0);
                (value, count)
            })
            .collect();
        result.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(result)
    }

    /// Manufacturers with strictly more than `min_ads` listings.
    pub fn popular_makes(df: &DataFrame, min_ads: usize) -> Result<Vec<String>, ProcessorError> {
        let makes = Self::value_counts(df, "make")?
            .into_iter()
            .filter(|(_, count)| *count > min_ads)
            .map(|(make, _)| make)
            .collect();
        Ok(makes)
    }

    /// Rows for a single manufacturer.
    pub fn filter_by_make(df: &DataFrame, make: &str) -> Result<DataFrame, ProcessorError> {
        Self::column(df, "make")?;
        let filtered = df
            .clone()
            .lazy()
            .filter(col("make").eq(lit(make)))
            .collect()?;
        Ok(filtered)
    }

    /// Rows whose manufacturer is one of `makes`.
    pub fn filter_by_makes(df: &DataFrame, makes: &[String]) -> Result<DataFrame, ProcessorError> {
        let wanted: HashSet<&str> = makes.iter().map(String::as_str).collect();
        let mask: BooleanChunked = Self::string_values(df, "make")?
            .iter()
            .map(|make| make.as_deref().is_some_and(|m| wanted.contains(m)))
            .collect();
        Ok(df.filter(&mask)?)
    }

    /// Keep only rows from popular manufacturers (see [`POPULAR_MAKE_THRESHOLD`]).
    pub fn restrict_to_popular(df: &DataFrame, min_ads: usize) -> Result<DataFrame, ProcessorError> {
        let popular = Self::popular_makes(df, min_ads)?;
        Self::filter_by_makes(df, &popular)
    }
}
