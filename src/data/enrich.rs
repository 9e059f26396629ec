//! Listing Enricher
//! Derives manufacturer/model and date-part columns and coerces price and
//! model year to their analysis types.

use super::loader::LoaderError;
use super::processor::DataProcessor;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Columns the enricher cannot work without.
pub const REQUIRED_COLUMNS: [&str; 4] = ["model", "date_posted", "price", "model_year"];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Days from 0001-01-01 (CE) to 1970-01-01, for polars' epoch-based Date.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Split a raw model string on single spaces into (make, model).
pub fn split_model(model: &str) -> (String, Option<String>) {
    let mut tokens = model.split(' ');
    let make = tokens.next().unwrap_or_default().to_string();
    let model_only = tokens.next().map(str::to_string);
    (make, model_only)
}

/// Parse a posting date, returning `None` for anything unrecognised.
pub fn parse_posted_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Add derived columns to a freshly read listings table.
pub fn enrich(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
    for name in REQUIRED_COLUMNS {
        if df.get_column_index(name).is_none() {
            return Err(LoaderError::MissingColumn(name.to_string()));
        }
    }

    let price = coerce_float(&df, "price")?;
    let model_year = coerce_nullable_int(&df, "model_year")?;
    df.with_column(price)?;
    df.with_column(model_year)?;

    // Manufacturer / model split
    let models = DataProcessor::string_values(&df, "model")?;
    let mut makes: Vec<Option<String>> = Vec::with_capacity(models.len());
    let mut model_only: Vec<Option<String>> = Vec::with_capacity(models.len());
    for model in &models {
        match model.as_deref().map(split_model) {
            Some((make, rest)) => {
                makes.push(Some(make));
                model_only.push(rest);
            }
            None => {
                makes.push(None);
                model_only.push(None);
            }
        }
    }

    // Date parts
    let dates: Vec<Option<NaiveDate>> = DataProcessor::string_values(&df, "date_posted")?
        .iter()
        .map(|raw| raw.as_deref().and_then(parse_posted_date))
        .collect();

    let epoch_days: Vec<Option<i32>> = dates
        .iter()
        .map(|d| d.map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE))
        .collect();
    let years: Vec<Option<i32>> = dates.iter().map(|d| d.map(|d| d.year())).collect();
    let months: Vec<Option<String>> = dates
        .iter()
        .map(|d| d.map(|d| d.format("%B").to_string()))
        .collect();
    let days: Vec<Option<i32>> = dates.iter().map(|d| d.map(|d| d.day() as i32)).collect();
    let weekdays: Vec<Option<String>> = dates
        .iter()
        .map(|d| d.map(|d| d.format("%A").to_string()))
        .collect();

    let date_posted = Column::new("date_posted".into(), epoch_days).cast(&DataType::Date)?;
    df.with_column(date_posted)?;

    df.with_column(Column::new("make".into(), makes))?;
    df.with_column(Column::new("model_only".into(), model_only))?;
    df.with_column(Column::new("year".into(), years))?;
    df.with_column(Column::new("month".into(), months))?;
    df.with_column(Column::new("day".into(), days))?;
    df.with_column(Column::new("day_of_week".into(), weekdays))?;

    Ok(df)
}

/// Float conversion that refuses text which is not a number.
fn coerce_float(df: &DataFrame, name: &str) -> Result<Column, LoaderError> {
    let column = df
        .column(name)
        .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
    if DataProcessor::is_numeric_dtype(column.dtype()) {
        return Ok(column.cast(&DataType::Float64)?);
    }

    let mut parsed: Vec<Option<f64>> = Vec::with_capacity(column.len());
    for (row, value) in DataProcessor::string_values(df, name)?.into_iter().enumerate() {
        let value = match value.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(text.parse::<f64>().map_err(|_| LoaderError::NonNumeric {
                column: name.to_string(),
                row,
                value: text.to_string(),
            })?),
        };
        parsed.push(value);
    }
    Ok(Column::new(name.into(), parsed))
}

/// Nullable integer conversion. Whole floats such as `2011.0` are accepted.
fn coerce_nullable_int(df: &DataFrame, name: &str) -> Result<Column, LoaderError> {
    let column = df
        .column(name)
        .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
    if DataProcessor::is_integer_dtype(column.dtype()) {
        return Ok(column.cast(&DataType::Int64)?);
    }

    let mut parsed: Vec<Option<i64>> = Vec::with_capacity(column.len());
    for (row, value) in DataProcessor::string_values(df, name)?.into_iter().enumerate() {
        let text = match value.as_deref().map(str::trim) {
            None | Some("") => {
                parsed.push(None);
                continue;
            }
            Some(text) => text,
        };
        let integer = text.parse::<i64>().ok().or_else(|| {
            text.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        });
        match integer {
            Some(v) => parsed.push(Some(v)),
            None => {
                return Err(LoaderError::NonInteger {
                    column: name.to_string(),
                    row,
                    value: text.to_string(),
                })
            }
        }
    }
    Ok(Column::new(name.into(), parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_listings() -> DataFrame {
        df!(
            "price" => [9400i64, 25500, 5500, 1500],
            "model_year" => [Some(2011.0), None, Some(2013.0), Some(2003.0)],
            "model" => [Some("bmw x5"), Some("ford f-150"), Some("hyundai"), None],
            "date_posted" => [Some("2018-06-23"), Some("2019-03-15"), Some("not a date"), None],
            "days_listed" => [19i64, 50, 79, 9]
        )
        .unwrap()
    }

    #[test]
    fn test_split_model() {
        assert_eq!(split_model("ford f-150"), ("ford".to_string(), Some("f-150".to_string())));
        assert_eq!(split_model("hyundai"), ("hyundai".to_string(), None));
        assert_eq!(
            split_model("chevrolet silverado 1500"),
            ("chevrolet".to_string(), Some("silverado".to_string()))
        );
    }

    #[test]
    fn test_parse_posted_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 3, 15);
        assert_eq!(parse_posted_date("2019-03-15"), expected);
        assert_eq!(parse_posted_date(" 2019-03-15 "), expected);
        assert_eq!(parse_posted_date("03/15/2019"), expected);
        assert_eq!(parse_posted_date("2019-03-15 08:30:00"), expected);
        assert_eq!(parse_posted_date("2019-13-40"), None);
        assert_eq!(parse_posted_date(""), None);
    }

    #[test]
    fn test_make_and_model_columns() {
        let df = enrich(raw_listings()).unwrap();
        let makes = DataProcessor::string_values(&df, "make").unwrap();
        let models = DataProcessor::string_values(&df, "model_only").unwrap();

        assert_eq!(makes[0].as_deref(), Some("bmw"));
        assert_eq!(models[0].as_deref(), Some("x5"));
        assert_eq!(makes[2].as_deref(), Some("hyundai"));
        assert_eq!(models[2], None);
        assert_eq!(makes[3], None);
    }

    #[test]
    fn test_date_parts_are_consistent() {
        let df = enrich(raw_listings()).unwrap();
        let years = DataProcessor::float_values(&df, "year").unwrap();
        let months = DataProcessor::string_values(&df, "month").unwrap();
        let days = DataProcessor::float_values(&df, "day").unwrap();
        let weekdays = DataProcessor::string_values(&df, "day_of_week").unwrap();

        assert_eq!(years[1], Some(2019.0));
        assert_eq!(months[1].as_deref(), Some("March"));
        assert_eq!(days[1], Some(15.0));
        assert_eq!(weekdays[1].as_deref(), Some("Friday"));

        assert_eq!(weekdays[0].as_deref(), Some("Saturday"));
        assert_eq!(months[0].as_deref(), Some("June"));
    }

    #[test]
    fn test_unparseable_dates_become_null() {
        let df = enrich(raw_listings()).unwrap();
        assert_eq!(df.column("date_posted").unwrap().dtype(), &DataType::Date);

        for name in ["year", "month", "day", "day_of_week"] {
            let values = DataProcessor::string_values(&df, name).unwrap();
            assert_eq!(values[2], None, "{name} should be null for a bad date");
            assert_eq!(values[3], None, "{name} should be null for a missing date");
        }
        assert_eq!(df.column("date_posted").unwrap().null_count(), 2);
    }

    #[test]
    fn test_price_and_model_year_types() {
        let df = enrich(raw_listings()).unwrap();
        assert_eq!(df.column("price").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("model_year").unwrap().dtype(), &DataType::Int64);

        let years = df.column("model_year").unwrap();
        assert_eq!(years.null_count(), 1);
        assert_eq!(years.i64().unwrap().get(0), Some(2011));
    }

    #[test]
    fn test_text_price_is_parsed() {
        let df = df!(
            "price" => [Some("100"), Some(" 250.5 "), None],
            "model_year" => [Some("2011"), Some("2012.0"), Some("")],
            "model" => ["kia soul", "kia rio", "kia"],
            "date_posted" => ["2018-01-01", "2018-01-02", "2018-01-03"]
        )
        .unwrap();

        let df = enrich(df).unwrap();
        let prices = DataProcessor::float_values(&df, "price").unwrap();
        assert_eq!(prices, vec![Some(100.0), Some(250.5), None]);
        let years = df.column("model_year").unwrap();
        assert_eq!(years.i64().unwrap().get(1), Some(2012));
        assert_eq!(years.null_count(), 1);
    }

    #[test]
    fn test_non_numeric_price_fails_load() {
        let df = df!(
            "price" => ["100", "cheap"],
            "model_year" => [2011i64, 2012],
            "model" => ["kia soul", "kia rio"],
            "date_posted" => ["2018-01-01", "2018-01-02"]
        )
        .unwrap();

        match enrich(df) {
            Err(LoaderError::NonNumeric { column, row, value }) => {
                assert_eq!(column, "price");
                assert_eq!(row, 1);
                assert_eq!(value, "cheap");
            }
            other => panic!("expected NonNumeric, got {other:?}"),
        }
    }

    #[test]
    fn test_fractional_model_year_fails_load() {
        let df = df!(
            "price" => [100.0],
            "model_year" => [2011.5],
            "model" => ["kia soul"],
            "date_posted" => ["2018-01-01"]
        )
        .unwrap();

        assert!(matches!(enrich(df), Err(LoaderError::NonInteger { .. })));
    }

    #[test]
    fn test_missing_required_column() {
        let df = df!("model" => ["kia soul"], "price" => [1.0]).unwrap();
        assert!(matches!(enrich(df), Err(LoaderError::MissingColumn(name)) if name == "date_posted"));
    }
}
