//! Static Chart Renderer
//! Draws chart specifications into PNG images with plotters.
//!
//! Layout of every image:
//! 1. Title centered on top
//! 2. Plot area with axis descriptions
//! 3. Series legend in the upper right corner (histograms and scatter plots)

use super::palette::{Palette, Rgb};
use super::spec::{BarMode, Bins, ChartSpec, HistogramPlot, ParallelPlot, Plot, ScatterPlot};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use thiserror::Error;

const FONT: &str = "sans-serif";
const TITLE_SIZE: u32 = 24;
const MARGIN: u32 = 15;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Pixel buffer does not match the image size")]
    Buffer,
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a chart to PNG bytes of the given size.
    pub fn render_png(spec: &ChartSpec, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![255u8; width as usize * height as usize * 3];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            match &spec.plot {
                Plot::Histogram(plot) => Self::draw_histogram(&root, spec, plot)?,
                Plot::Scatter(plot) => Self::draw_scatter(&root, spec, plot)?,
                Plot::ParallelCoordinates(plot) => Self::draw_parallel(&root, spec, plot)?,
            }

            root.present().map_err(draw_err)?;
        }

        let image = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer)?;
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    fn draw_histogram(
        root: &Area<'_>,
        spec: &ChartSpec,
        plot: &HistogramPlot,
    ) -> Result<(), RenderError> {
        let (x_min, x_max) = plot.bins.x_range();
        let y_max = (plot.max_height() as f64 * 1.1).max(1.0);
        let bins = &plot.bins;
        let label_count = match bins {
            Bins::Categorical { categories } => categories.len().max(1),
            Bins::Numeric { .. } => 10,
        };

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, (FONT, TITLE_SIZE))
            .margin(MARGIN)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(spec.x_axis.title.as_str())
            .y_desc(spec.y_axis.title.as_str())
            .x_labels(label_count)
            .x_label_formatter(&|x: &f64| bins.tick_label(*x))
            .draw()
            .map_err(draw_err)?;

        let mut base = vec![0u64; plot.bins.len()];
        for series in &plot.series {
            let color = rgb(series.color).mix(plot.opacity as f64);
            let stacked = plot.barmode == BarMode::Stack;

            let rects: Vec<Rectangle<(f64, f64)>> = series
                .counts
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(|(i, &count)| {
                    let (lo, hi) = plot.bins.edges(i);
                    let bottom = if stacked { base[i] } else { 0 };
                    Rectangle::new(
                        [(lo, bottom as f64), (hi, (bottom + count) as f64)],
                        color.filled(),
                    )
                })
                .collect();

            if stacked {
                for (total, count) in base.iter_mut().zip(&series.counts) {
                    *total += count;
                }
            }

            let legend_color = rgb(series.color);
            chart
                .draw_series(rects)
                .map_err(draw_err)?
                .label(series.name.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], legend_color.filled())
                });
        }

        if spec.layout.show_legend && !plot.series.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_scatter(
        root: &Area<'_>,
        spec: &ChartSpec,
        plot: &ScatterPlot,
    ) -> Result<(), RenderError> {
        let ((x0, x1), (y0, y1)) = plot.bounds().unwrap_or(((0.0, 1.0), (0.0, 1.0)));
        let pad = |lo: f64, hi: f64| {
            let span = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
            (lo - span)..(hi + span)
        };

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, (FONT, TITLE_SIZE))
            .margin(MARGIN)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(pad(x0, x1), pad(y0, y1))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc(spec.x_axis.title.as_str())
            .y_desc(spec.y_axis.title.as_str())
            .draw()
            .map_err(draw_err)?;

        for series in &plot.series {
            let color = rgb(series.color);
            chart
                .draw_series(
                    series
                        .points
                        .iter()
                        .map(|p| Circle::new((p[0], p[1]), 2, color.mix(0.7).filled())),
                )
                .map_err(draw_err)?
                .label(series.name.as_str())
                .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));
        }

        if spec.layout.show_legend && !plot.series.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_parallel(
        root: &Area<'_>,
        spec: &ChartSpec,
        plot: &ParallelPlot,
    ) -> Result<(), RenderError> {
        let axes = plot.dimensions.len();
        let labels: Vec<&str> = plot.dimensions.iter().map(|d| d.label.as_str()).collect();
        let bottom = spec.layout.margin.map(|m| m.bottom).unwrap_or(MARGIN);

        let (plot_area, legend_area) =
            root.split_vertically(root.dim_in_pixel().1.saturating_sub(bottom));

        let mut chart = ChartBuilder::on(&plot_area)
            .caption(&spec.title, (FONT, TITLE_SIZE))
            .margin(MARGIN)
            .x_label_area_size(40)
            .build_cartesian_2d(-0.5..(axes as f64 - 0.5), -0.1..1.1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .disable_y_axis()
            .x_labels(axes + 1)
            .x_label_formatter(&|x: &f64| {
                let rounded = x.round();
                if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
                    return String::new();
                }
                labels.get(rounded as usize).map(|l| l.to_string()).unwrap_or_default()
            })
            .draw()
            .map_err(draw_err)?;

        let (code_min, code_max) = plot
            .color
            .values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        let normalized: Vec<Vec<Option<f64>>> =
            plot.dimensions.iter().map(|d| d.normalized()).collect();

        let mut paths = Vec::new();
        for (row, code) in plot.color.values.iter().enumerate() {
            let t = if code_max > code_min {
                (code - code_min) / (code_max - code_min)
            } else {
                0.5
            };
            let style = rgb(Palette::SET3.sample(t)).mix(0.6).stroke_width(1);

            let mut segment: Vec<(f64, f64)> = Vec::new();
            for (axis, values) in normalized.iter().enumerate() {
                match values.get(row).copied().flatten() {
                    Some(y) => segment.push((axis as f64, y)),
                    None if segment.len() > 1 => {
                        paths.push(PathElement::new(std::mem::take(&mut segment), style))
                    }
                    None => segment.clear(),
                }
            }
            if segment.len() > 1 {
                paths.push(PathElement::new(segment, style));
            }
        }
        chart.draw_series(paths).map_err(draw_err)?;

        chart
            .draw_series((0..axes).map(|axis| {
                let x = axis as f64;
                PathElement::new(vec![(x, 0.0), (x, 1.0)], BLACK.mix(0.5).stroke_width(1))
            }))
            .map_err(draw_err)?;

        // Range or categories next to each axis
        let mut annotations = Vec::new();
        for (axis, dim) in plot.dimensions.iter().enumerate() {
            let x = axis as f64;
            match &dim.ticks {
                Some(ticks) if ticks.len() <= 15 => {
                    let last = ticks.len().saturating_sub(1).max(1) as f64;
                    for (code, tick) in ticks.iter().enumerate() {
                        let y = if ticks.len() > 1 { code as f64 / last } else { 0.5 };
                        annotations.push(Text::new(tick.clone(), (x, y), (FONT, 11)));
                    }
                }
                Some(_) => {}
                None => {
                    if let Some((lo, hi)) = dim.range() {
                        annotations.push(Text::new(format!("{lo:.0}"), (x, -0.05), (FONT, 11)));
                        annotations.push(Text::new(format!("{hi:.0}"), (x, 1.08), (FONT, 11)));
                    }
                }
            }
        }
        chart.draw_series(annotations).map_err(draw_err)?;

        Self::draw_model_legend(&legend_area, plot)
    }

    /// Color bar title and the model code legend below the chart.
    fn draw_model_legend(area: &Area<'_>, plot: &ParallelPlot) -> Result<(), RenderError> {
        let (width, _) = area.dim_in_pixel();
        let title = &plot.color.colorbar.title;
        area.draw(&Text::new(
            title.as_str(),
            ((width as f64 * plot.color.colorbar.x) as i32 - 40, 5),
            (FONT, 14),
        ))
        .map_err(draw_err)?;

        let (mut x, mut y) = (MARGIN as i32, 28);
        for model in &plot.models {
            let text = format!("{} {}", model.code, model.model);
            let step = 24 + 7 * text.len() as i32;
            if x + step > width as i32 {
                x = MARGIN as i32;
                y += 20;
            }
            area.draw(&Rectangle::new([(x, y), (x + 12, y + 12)], rgb(model.color).filled()))
                .map_err(draw_err)?;
            area.draw(&Text::new(text, (x + 16, y), (FONT, 12)))
                .map_err(draw_err)?;
            x += step;
        }
        Ok(())
    }
}
