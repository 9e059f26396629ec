//! Chart Export Module
//! Writes dashboard charts to a directory as JSON specifications and/or PNG images.

use crate::charts::{ChartSpec, DashboardCharts, Selections, StaticChartRenderer};
use crate::config::Args;
use crate::data::{load_listings, Session};
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use rayon::prelude::*;
use std::borrow::Borrow;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Png,
    Both,
}

impl ExportFormat {
    fn json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }

    fn png(self) -> bool {
        matches!(self, Self::Png | Self::Both)
    }
}

fn write_json(dir: &Path, name: &str, spec: &ChartSpec) -> Result<PathBuf> {
    let path = dir.join(format!("{name}.json"));
    let json = serde_json::to_string_pretty(spec)
        .with_context(|| format!("Failed to serialize chart '{name}'"))?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn write_png(dir: &Path, name: &str, spec: &ChartSpec, width: u32, height: u32) -> Result<PathBuf> {
    let path = dir.join(format!("{name}.png"));
    let png = StaticChartRenderer::render_png(spec, width, height)
        .with_context(|| format!("Failed to render chart '{name}'"))?;
    fs::write(&path, png).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Write every exportable chart into `dir`, returning the written files.
pub fn export_charts(
    charts: &DashboardCharts,
    dir: &Path,
    format: ExportFormat,
    width: u32,
    height: u32,
) -> Result<Vec<PathBuf>> {
    export_specs(&charts.exportable(), dir, format, width, height)
}

/// Write named chart specs into `dir`. Accepts borrowed or owned specs, so a
/// worker thread can take its own copies.
pub fn export_specs<S>(
    charts: &[(String, S)],
    dir: &Path,
    format: ExportFormat,
    width: u32,
    height: u32,
) -> Result<Vec<PathBuf>>
where
    S: Borrow<ChartSpec> + Sync,
{
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::new();
    if format.json() {
        for (name, spec) in charts {
            written.push(write_json(dir, name, spec.borrow())?);
        }
    }

    if format.png() {
        // Use rayon for parallel rendering
        let pngs: Vec<PathBuf> = charts
            .par_iter()
            .map(|(name, spec)| write_png(dir, name, spec.borrow(), width, height))
            .collect::<Result<_>>()?;
        written.extend(pngs);
    }

    log::info!("Exported {} files to {}", written.len(), dir.display());
    Ok(written)
}

/// Load the listings, build the default dashboard and export it.
pub fn run_headless(args: &Args, dir: &Path) -> Result<Vec<PathBuf>> {
    let Some(listings) = load_listings(&args.data)
        .with_context(|| format!("Failed to load {}", args.data.display()))?
    else {
        bail!("Data file not found: {}", args.data.display());
    };
    let session = Session::new(listings, &args.data).context("Failed to index listings")?;

    let mut selections = Selections::for_session(&session);
    if let Some(make) = &args.parallel_make {
        selections.parallel_make = Some(make.clone());
    }

    let charts = DashboardCharts::build(&session, &selections).context("Failed to build charts")?;
    if let Some(Err(e)) = &charts.parallel {
        log::warn!("Parallel coordinates not exported: {}", e.user_message());
    }

    export_charts(&charts, dir, args.format, args.width, args.height)
}
