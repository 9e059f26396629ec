use car_ads_eda::charts::spec::{Bins, Plot};
use car_ads_eda::charts::{
    parallel_coordinates, ChartBuilder, ChartError, DashboardCharts, HistogramField, Selections,
};
use car_ads_eda::config::Args;
use car_ads_eda::data::{load_listings, LoaderError, Session};
use car_ads_eda::charts::ChartSpec;
use car_ads_eda::export::{export_charts, export_specs, run_headless, ExportFormat};
use clap::Parser;
use polars::prelude::DataType;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/listings.csv");

fn fixture_session() -> Session {
    let listings = load_listings(Path::new(FIXTURE))
        .expect("Failed to load fixture")
        .expect("Fixture is missing");
    Session::new(listings, FIXTURE).expect("Failed to build session")
}

/// Fresh scratch directory under the system temp dir
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("car_ads_eda_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_fixture_loads_with_derived_columns() {
    let session = fixture_session();
    let df = session.listings();

    assert_eq!(session.row_count(), 5);
    assert_eq!(df.column("price").unwrap().dtype(), &DataType::Float64);
    assert_eq!(df.column("model_year").unwrap().dtype(), &DataType::Int64);
    assert_eq!(df.column("date_posted").unwrap().dtype(), &DataType::Date);
    assert_eq!(session.makes(), ["bmw", "ford", "hyundai", "chrysler"]);

    let weekdays: Vec<Option<&str>> = df
        .column("day_of_week")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(weekdays[0], Some("Saturday"));
    assert_eq!(weekdays[3], Some("Friday"));
}

#[test]
fn test_missing_file_is_idle_state() {
    let result = load_listings(Path::new("tests/fixtures/does_not_exist.csv")).unwrap();
    assert!(result.is_none());
}

#[test]
fn test_unreadable_path_is_an_error() {
    // A regular file used as a directory is not "missing"
    let path = Path::new(FIXTURE).join("inner.csv");
    let err = load_listings(&path).unwrap_err();
    assert!(matches!(err, LoaderError::Access { .. }));
    assert!(err.to_string().contains("inner.csv"));
}

#[test]
fn test_manufacturer_bar_counts_match_tally() {
    let session = fixture_session();
    let charts = DashboardCharts::build(&session, &Selections::for_session(&session)).unwrap();

    let Plot::Histogram(plot) = &charts.vehicles_by_make.plot else {
        panic!("expected histogram");
    };
    let Bins::Categorical { categories } = &plot.bins else {
        panic!("expected categorical bins");
    };

    // Stack all color groups per manufacturer bar
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for series in &plot.series {
        for (make, count) in categories.iter().zip(&series.counts) {
            *totals.entry(make.as_str()).or_default() += count;
        }
    }

    let expected: HashMap<&str, u64> =
        [("bmw", 1), ("ford", 2), ("hyundai", 1), ("chrysler", 1)].into();
    assert_eq!(totals, expected);

    let names: Vec<&str> = plot.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["SUV", "pickup", "sedan"]);
}

#[test]
fn test_unknown_histogram_field_is_rejected() {
    let session = fixture_session();
    let err = ChartBuilder::histogram_by_name(session.listings(), "model_year", "make", 500)
        .unwrap_err();
    assert!(matches!(err, ChartError::UnknownField(_)));
    assert!("odometer".parse::<HistogramField>().is_ok());
}

#[test]
fn test_empty_comparison_renders_nothing() {
    let session = fixture_session();
    assert!(ChartBuilder::price_comparison(session.listings(), &[])
        .unwrap()
        .is_none());
}

#[test]
fn test_single_listing_parallel_chart() {
    let session = fixture_session();
    let spec = parallel_coordinates(session.listings(), "bmw").unwrap();
    let Plot::ParallelCoordinates(plot) = &spec.plot else {
        panic!("expected parallel coordinates");
    };
    assert_eq!(plot.row_count, 1);
    assert_eq!(plot.models.len(), 1);
    assert_eq!(plot.dimensions.last().unwrap().column, "model_code");
    assert!(plot
        .dimensions
        .iter()
        .all(|d| d.column != "is_4wd" && d.column != "day" && d.column != "model"));
}

#[test]
fn test_export_json_writes_every_chart() {
    let session = fixture_session();
    let selections = Selections {
        compared_makes: vec!["ford".to_string(), "bmw".to_string()],
        ..Selections::for_session(&session)
    };
    let charts = DashboardCharts::build(&session, &selections).unwrap();

    let dir = scratch_dir("export_json");
    let written = export_charts(&charts, &dir, ExportFormat::Json, 800, 600).unwrap();

    assert_eq!(written.len(), charts.exportable().len());
    assert!(written.iter().all(|p| p.exists()));

    let comparison = fs::read_to_string(dir.join("price_comparison.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&comparison).unwrap();
    assert_eq!(json["title"], "Price Distribution Comparison");
    assert_eq!(json["plot"]["kind"], "histogram");
    assert_eq!(json["plot"]["barmode"], "overlay");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_export_png_from_worker_thread() {
    let session = fixture_session();
    let charts = DashboardCharts::build(&session, &Selections::for_session(&session)).unwrap();
    let specs: Vec<(String, ChartSpec)> = charts
        .exportable()
        .into_iter()
        .map(|(name, spec)| (name, spec.clone()))
        .collect();
    let expected = specs.len();

    let dir = scratch_dir("export_png");
    let worker_dir = dir.clone();
    let written = std::thread::spawn(move || {
        export_specs(&specs, &worker_dir, ExportFormat::Png, 640, 400)
    })
    .join()
    .unwrap()
    .unwrap();

    assert_eq!(written.len(), expected);
    for path in &written {
        let bytes = fs::read(path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
    assert!(written.contains(&dir.join("parallel_bmw.png")));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_headless_run_with_chosen_parallel_make() {
    let dir = scratch_dir("headless");
    let args = Args::parse_from([
        "car_ads_eda",
        "--data",
        FIXTURE,
        "--export-dir",
        dir.to_str().unwrap(),
        "--format",
        "json",
        "--parallel-make",
        "ford",
    ]);

    let written = run_headless(&args, &dir).unwrap();
    assert!(written.contains(&dir.join("parallel_ford.json")));
    assert!(written.contains(&dir.join("scatter_odometer.json")));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_headless_run_fails_without_data() {
    let dir = scratch_dir("headless_missing");
    let args = Args::parse_from([
        "car_ads_eda",
        "--data",
        "tests/fixtures/does_not_exist.csv",
        "--export-dir",
        dir.to_str().unwrap(),
    ]);
    let err = run_headless(&args, &dir).unwrap_err();
    assert!(err.to_string().contains("not found"));
}
