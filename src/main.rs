//! Car Advertisement EDA - Vehicle Listing Dashboard
//!
//! Opens the interactive dashboard, or exports the charts headless with `--export-dir`.

use anyhow::Result;
use car_ads_eda::config::Args;
use car_ads_eda::export::run_headless;
use car_ads_eda::gui::DashboardApp;
use clap::Parser;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(dir) = &args.export_dir {
        let written = run_headless(&args, dir)?;
        for path in written {
            println!("{}", path.display());
        }
        return Ok(());
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("EDA - Car Advertisement"),
        ..Default::default()
    };

    eframe::run_native(
        "EDA - Car Advertisement",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, args.data)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start the dashboard: {e}"))
}
