//! Parallel-coordinates chart over one manufacturer's listings.

use super::error::ChartError;
use super::fields::dimension_label;
use super::palette::Palette;
use super::spec::{
    Axis, ChartSpec, ColorBar, ColorEncoding, Dimension, Layout, Margin, ModelColor, Orientation,
    ParallelPlot, Plot, XAnchor,
};
use crate::data::DataProcessor;
use polars::prelude::{DataFrame, DataType};
use std::collections::{HashMap, HashSet};

/// Columns left out of the chart entirely.
pub const DROPPED_COLUMNS: [&str; 2] = ["is_4wd", "day"];
/// Free-text and identity columns that make no useful axis.
pub const IDENTITY_COLUMNS: [&str; 4] = ["model", "make", "model_only", "date_posted"];
/// Integer code of `model_only`, used as last axis and as color.
pub const MODEL_CODE: &str = "model_code";

const NULL_CODE: i64 = -1;

/// Codes over the sorted distinct values; null becomes `None`.
fn category_codes(values: &[Option<String>]) -> (Vec<String>, Vec<Option<i64>>) {
    let mut categories: Vec<String> = values
        .iter()
        .flatten()
        .cloned()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    categories.sort();

    let lookup: HashMap<&str, i64> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i as i64))
        .collect();
    let codes = values
        .iter()
        .map(|v| v.as_deref().and_then(|v| lookup.get(v).copied()))
        .collect();

    (categories, codes)
}

fn dimensions(df: &DataFrame) -> Result<Vec<Dimension>, ChartError> {
    let mut dims = Vec::new();

    for column in df.get_columns() {
        let name = column.name().as_str();
        if DROPPED_COLUMNS.contains(&name) || IDENTITY_COLUMNS.contains(&name) || name == MODEL_CODE
        {
            continue;
        }

        let dtype = column.dtype();
        let dim = if DataProcessor::is_numeric_dtype(dtype) {
            Dimension {
                column: name.to_string(),
                label: dimension_label(name).to_string(),
                values: DataProcessor::float_values(df, name)?,
                ticks: None,
            }
        } else if matches!(dtype, DataType::String | DataType::Boolean) {
            let (categories, codes) = category_codes(&DataProcessor::string_values(df, name)?);
            Dimension {
                column: name.to_string(),
                label: dimension_label(name).to_string(),
                values: codes.into_iter().map(|c| c.map(|c| c as f64)).collect(),
                ticks: Some(categories),
            }
        } else {
            log::debug!("Skipping column '{}' ({}) in parallel coordinates", name, dtype);
            continue;
        };
        dims.push(dim);
    }

    Ok(dims)
}

/// Parallel coordinates for `make`, colored by model.
///
/// The expected failures are `NoListings`, `NoModels` and `NoAxes`; anything
/// else is a data or processing error.
pub fn parallel_coordinates(df: &DataFrame, make: &str) -> Result<ChartSpec, ChartError> {
    let listings = DataProcessor::filter_by_make(df, make)?;
    if listings.height() == 0 {
        return Err(ChartError::NoListings(make.to_string()));
    }

    let models = DataProcessor::string_values(&listings, "model_only")?;
    let (model_names, codes) = category_codes(&models);
    if model_names.is_empty() {
        return Err(ChartError::NoModels(make.to_string()));
    }
    let codes: Vec<i64> = codes.into_iter().map(|c| c.unwrap_or(NULL_CODE)).collect();

    // Legend colors in order of first appearance
    let mut legend: Vec<ModelColor> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for (model, code) in models.iter().zip(&codes) {
        let Some(model) = model.as_deref() else {
            continue;
        };
        if seen.insert(model) {
            legend.push(ModelColor {
                code: *code,
                model: model.to_string(),
                color: Palette::PASTEL.color(legend.len()),
            });
        }
    }
    let palette_wrapped = legend.len() > Palette::PASTEL.len();
    if palette_wrapped {
        log::warn!(
            "{} has {} models but the {} palette has {} colors; colors repeat",
            make,
            legend.len(),
            Palette::PASTEL.name,
            Palette::PASTEL.len()
        );
    }

    let mut dims = dimensions(&listings)?;
    if dims.is_empty() {
        return Err(ChartError::NoAxes(make.to_string()));
    }
    dims.push(Dimension {
        column: MODEL_CODE.to_string(),
        label: dimension_label(MODEL_CODE).to_string(),
        values: codes.iter().map(|c| Some(*c as f64)).collect(),
        ticks: Some(model_names),
    });

    let color = ColorEncoding {
        column: MODEL_CODE.to_string(),
        values: codes.iter().map(|c| *c as f64).collect(),
        scale: Palette::SET3.colors().to_vec(),
        colorbar: ColorBar {
            title: "Model Code".to_string(),
            orientation: Orientation::Horizontal,
            x: 0.5,
            x_anchor: XAnchor::Center,
            y: -0.2,
        },
    };

    Ok(ChartSpec {
        title: format!("Parallel Coordinates ({make})"),
        x_axis: Axis::default(),
        y_axis: Axis::default(),
        layout: Layout {
            show_legend: false,
            margin: Some(Margin {
                top: 50,
                bottom: 100,
            }),
        },
        plot: Plot::ParallelCoordinates(ParallelPlot {
            make: make.to_string(),
            row_count: listings.height(),
            dimensions: dims,
            color,
            models: legend,
            palette_wrapped,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn listings() -> DataFrame {
        df!(
            "price" => [9000.0, 4000.0, 12000.0, 7000.0, 3000.0],
            "model_year" => [Some(2011i64), Some(2008), None, Some(2014), Some(2005)],
            "model" => ["ford f-150", "bmw x5", "ford escape", "ford", "kia soul"],
            "condition" => ["good", "fair", "excellent", "good", "like new"],
            "is_4wd" => [Some(1.0), None, Some(1.0), None, None],
            "make" => ["ford", "bmw", "ford", "ford", "kia"],
            "model_only" => [Some("f-150"), Some("x5"), Some("escape"), None, Some("soul")],
            "day" => [1i32, 2, 3, 4, 5]
        )
        .unwrap()
    }

    fn parallel(spec: &ChartSpec) -> &ParallelPlot {
        match &spec.plot {
            Plot::ParallelCoordinates(plot) => plot,
            other => panic!("expected parallel coordinates, got {other:?}"),
        }
    }

    #[test]
    fn test_model_codes_are_sorted_with_null_as_minus_one() {
        let spec = parallel_coordinates(&listings(), "ford").unwrap();
        let plot = parallel(&spec);

        assert_eq!(plot.row_count, 3);
        // sorted: escape=0, f-150=1
        assert_eq!(plot.color.values, vec![1.0, 0.0, -1.0]);

        let model_axis = plot.dimensions.last().unwrap();
        assert_eq!(model_axis.column, "model_code");
        assert_eq!(model_axis.label, "Model");
        assert_eq!(
            model_axis.ticks,
            Some(vec!["escape".to_string(), "f-150".to_string()])
        );
    }

    #[test]
    fn test_legend_colors_follow_first_appearance() {
        let spec = parallel_coordinates(&listings(), "ford").unwrap();
        let plot = parallel(&spec);

        assert_eq!(plot.models.len(), 2);
        assert_eq!(plot.models[0].model, "f-150");
        assert_eq!(plot.models[0].code, 1);
        assert_eq!(plot.models[0].color, Palette::PASTEL.color(0));
        assert_eq!(plot.models[1].model, "escape");
        assert_eq!(plot.model_color(0), Some(Palette::PASTEL.color(1)));
        assert!(!plot.palette_wrapped);
    }

    #[test]
    fn test_dropped_and_identity_columns_are_not_axes() {
        let spec = parallel_coordinates(&listings(), "ford").unwrap();
        let plot = parallel(&spec);

        let columns: Vec<&str> = plot.dimensions.iter().map(|d| d.column.as_str()).collect();
        assert_eq!(columns, vec!["price", "model_year", "condition", "model_code"]);
        assert_eq!(plot.dimensions[1].label, "Model Year");

        let condition = &plot.dimensions[2];
        assert_eq!(
            condition.ticks,
            Some(vec!["excellent".to_string(), "good".to_string()])
        );
        assert_eq!(condition.values, vec![Some(1.0), Some(0.0), Some(1.0)]);
    }

    #[test]
    fn test_layout_and_colorbar() {
        let spec = parallel_coordinates(&listings(), "ford").unwrap();
        assert!(!spec.layout.show_legend);
        assert_eq!(spec.layout.margin, Some(Margin { top: 50, bottom: 100 }));

        let plot = parallel(&spec);
        assert_eq!(plot.color.colorbar.title, "Model Code");
        assert_eq!(plot.color.colorbar.orientation, Orientation::Horizontal);
        assert_eq!(plot.color.colorbar.x_anchor, XAnchor::Center);
        assert_eq!(plot.color.scale, Palette::SET3.colors().to_vec());
    }

    #[test]
    fn test_single_listing_renders_degenerate_chart() {
        let spec = parallel_coordinates(&listings(), "kia").unwrap();
        let plot = parallel(&spec);
        assert_eq!(plot.row_count, 1);
        assert!(plot
            .dimensions
            .iter()
            .all(|d| d.normalized().iter().all(|v| *v == Some(0.5) || v.is_none())));
    }

    #[test]
    fn test_unknown_make_is_expected_failure() {
        let err = parallel_coordinates(&listings(), "tesla").unwrap_err();
        assert!(matches!(err, ChartError::NoListings(ref make) if make == "tesla"));
        assert!(err.is_expected());
    }

    #[test]
    fn test_make_without_models_is_expected_failure() {
        let df = df!(
            "price" => [100.0],
            "make" => ["ram"],
            "model_only" => [None::<&str>]
        )
        .unwrap();
        let err = parallel_coordinates(&df, "ram").unwrap_err();
        assert!(matches!(err, ChartError::NoModels(_)));
    }

    #[test]
    fn test_palette_wraps_when_models_exceed_colors() {
        let count = Palette::PASTEL.len() + 2;
        let models: Vec<String> = (0..count).map(|i| format!("m{i:02}")).collect();
        let df = df!(
            "price" => (0..count).map(|i| i as f64).collect::<Vec<_>>(),
            "make" => vec!["ford"; count],
            "model_only" => models
        )
        .unwrap();

        let spec = parallel_coordinates(&df, "ford").unwrap();
        let plot = parallel(&spec);
        assert!(plot.palette_wrapped);
        assert_eq!(plot.models[0].color, plot.models[Palette::PASTEL.len()].color);
    }
}
