//! Closed sets of chart fields with their display metadata.

use super::error::ChartError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// X-axis field of the distribution histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistogramField {
    Make,
    Odometer,
    Price,
}

impl HistogramField {
    pub const ALL: [HistogramField; 3] = [Self::Make, Self::Odometer, Self::Price];

    pub fn column(self) -> &'static str {
        match self {
            Self::Make => "make",
            Self::Odometer => "odometer",
            Self::Price => "price",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Make => "Vehicle by Manufacturer",
            Self::Odometer => "Odometer Distribution (10K range)",
            Self::Price => "Price Distribution (1K range)",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Self::Make => "Manufacturer",
            Self::Odometer => "Miles",
            Self::Price => "USD",
        }
    }

    /// Categorical fields get one bar per distinct value instead of numeric bins.
    pub fn is_categorical(self) -> bool {
        matches!(self, Self::Make)
    }
}

impl FromStr for HistogramField {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.column() == s)
            .ok_or_else(|| ChartError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for HistogramField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Vehicle attribute used to color the manufacturer histogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorField {
    #[default]
    Type,
    Condition,
    Cylinders,
    Fuel,
    Transmission,
}

impl ColorField {
    pub const ALL: [ColorField; 5] = [
        Self::Type,
        Self::Condition,
        Self::Cylinders,
        Self::Fuel,
        Self::Transmission,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Type => "Type",
            Self::Condition => "Condition",
            Self::Cylinders => "Cylinders",
            Self::Fuel => "Fuel",
            Self::Transmission => "Transmission",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Condition => "condition",
            Self::Cylinders => "cylinders",
            Self::Fuel => "fuel",
            Self::Transmission => "transmission",
        }
    }
}

/// X-axis of the price scatter plot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScatterField {
    #[default]
    Odometer,
    DaysListed,
}

impl ScatterField {
    pub const ALL: [ScatterField; 2] = [Self::Odometer, Self::DaysListed];

    pub fn label(self) -> &'static str {
        match self {
            Self::Odometer => "Odometer",
            Self::DaysListed => "Days Listed",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Odometer => "odometer",
            Self::DaysListed => "days_listed",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Odometer => "Price by Odometer",
            Self::DaysListed => "Price by Days Listed",
        }
    }
}

/// Axis label of a parallel-coordinates dimension.
pub fn dimension_label(column: &str) -> &str {
    match column {
        "model_year" => "Model Year",
        "model_code" => "Model",
        "price" => "Price",
        "cylinders" => "Cylinders",
        "odometer" => "Odometer",
        "days_listed" => "Days Listed",
        "year" => "Year",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_field_parsing() {
        assert_eq!("make".parse::<HistogramField>().unwrap(), HistogramField::Make);
        assert_eq!("price".parse::<HistogramField>().unwrap(), HistogramField::Price);
        assert_eq!(
            "odometer".parse::<HistogramField>().unwrap(),
            HistogramField::Odometer
        );
    }

    #[test]
    fn test_unknown_histogram_field_is_rejected() {
        for name in ["days_listed", "Make", "", "model"] {
            match name.parse::<HistogramField>() {
                Err(ChartError::UnknownField(field)) => assert_eq!(field, name),
                other => panic!("expected UnknownField for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_histogram_metadata() {
        assert_eq!(HistogramField::Odometer.title(), "Odometer Distribution (10K range)");
        assert_eq!(HistogramField::Price.axis_label(), "USD");
        assert!(HistogramField::Make.is_categorical());
        assert!(!HistogramField::Price.is_categorical());
    }

    #[test]
    fn test_dimension_labels() {
        assert_eq!(dimension_label("model_code"), "Model");
        assert_eq!(dimension_label("days_listed"), "Days Listed");
        assert_eq!(dimension_label("fuel"), "fuel");
    }
}
