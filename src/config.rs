//! Command line configuration.

use crate::export::ExportFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "car_ads_eda")]
#[command(about = "Explore and visualize car advertisement listings", long_about = None)]
pub struct Args {
    /// Listings CSV file
    #[arg(long, default_value = "vehicles_us.csv")]
    pub data: PathBuf,

    /// Write the dashboard charts to this directory and exit instead of opening the window
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Exported file format
    #[arg(long, value_enum, default_value_t = ExportFormat::Both)]
    pub format: ExportFormat,

    /// PNG width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// PNG height in pixels
    #[arg(long, default_value_t = 700)]
    pub height: u32,

    /// Manufacturer of the exported parallel-coordinates chart (default: the first one)
    #[arg(long)]
    pub parallel_make: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["car_ads_eda"]);
        assert_eq!(args.data, PathBuf::from("vehicles_us.csv"));
        assert!(args.export_dir.is_none());
        assert_eq!(args.format, ExportFormat::Both);
        assert_eq!((args.width, args.height), (1200, 700));
        assert!(args.parallel_make.is_none());
    }

    #[test]
    fn test_headless_flags() {
        let args = Args::parse_from([
            "car_ads_eda",
            "--data",
            "listings.csv",
            "--export-dir",
            "out",
            "--format",
            "json",
            "--parallel-make",
            "ford",
        ]);
        assert_eq!(args.export_dir, Some(PathBuf::from("out")));
        assert_eq!(args.format, ExportFormat::Json);
        assert_eq!(args.parallel_make.as_deref(), Some("ford"));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["car_ads_eda", "--format", "svg"]).is_err());
    }
}
