//! Chart Plotter Module
//! Draws chart specifications interactively using egui_plot.

use super::palette::{Palette, Rgb};
use super::spec::{BarMode, ChartSpec, HistogramPlot, ParallelPlot, Plot, ScatterPlot};
use crate::stats::PriceSummary;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, PlotPoint, PlotPoints, Points, Text, VLine};

pub const CHART_HEIGHT: f32 = 360.0;
const PARALLEL_HEIGHT: f32 = 420.0;
const AXIS_COLOR: Color32 = Color32::from_rgb(120, 120, 120);
const MAX_CATEGORY_TICKS: usize = 15;

fn color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Creates interactive charts from `ChartSpec`s.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw a chart with its title.
    pub fn draw(ui: &mut egui::Ui, id: &str, spec: &ChartSpec) {
        ui.label(RichText::new(&spec.title).strong().size(15.0));
        match &spec.plot {
            Plot::Histogram(plot) => Self::draw_histogram(ui, id, spec, plot),
            Plot::Scatter(plot) => Self::draw_scatter(ui, id, spec, plot),
            Plot::ParallelCoordinates(plot) => Self::draw_parallel(ui, id, plot),
        }
    }

    fn draw_histogram(ui: &mut egui::Ui, id: &str, spec: &ChartSpec, plot: &HistogramPlot) {
        let bins = plot.bins.clone();
        let (x_min, x_max) = plot.bins.x_range();
        let width = plot.bins.bar_width();

        egui_plot::Plot::new(id)
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_label(spec.x_axis.title.as_str())
            .y_axis_label(spec.y_axis.title.as_str())
            .include_x(x_min)
            .include_x(x_max)
            .include_y(0.0)
            .include_y(plot.max_height() as f64)
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| bins.tick_label(mark.value))
            .show(ui, |plot_ui| {
                let mut charts: Vec<BarChart> = Vec::with_capacity(plot.series.len());

                for series in &plot.series {
                    let color = color32(series.color).gamma_multiply(plot.opacity);
                    // Every bin keeps a bar, including empty ones, so stacked
                    // charts line up index by index.
                    let bars: Vec<Bar> = series
                        .counts
                        .iter()
                        .enumerate()
                        .map(|(i, &count)| {
                            Bar::new(plot.bins.center(i), count as f64)
                                .width(width)
                                .fill(color)
                        })
                        .collect();

                    let mut chart = BarChart::new(bars).name(&series.name).color(color);
                    if plot.barmode == BarMode::Stack && !charts.is_empty() {
                        let below: Vec<&BarChart> = charts.iter().collect();
                        chart = chart.stack_on(&below);
                    }
                    charts.push(chart);
                }

                for chart in charts {
                    plot_ui.bar_chart(chart);
                }
            });
    }

    fn draw_scatter(ui: &mut egui::Ui, id: &str, spec: &ChartSpec, plot: &ScatterPlot) {
        let mut chart = egui_plot::Plot::new(id)
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_label(spec.x_axis.title.as_str())
            .y_axis_label(spec.y_axis.title.as_str())
            .allow_scroll(false);

        if let Some(((x0, x1), (y0, y1))) = plot.bounds() {
            chart = chart.include_x(x0).include_x(x1).include_y(y0).include_y(y1);
        }

        chart.show(ui, |plot_ui| {
            for series in &plot.series {
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(series.points.iter().copied()))
                        .radius(2.0)
                        .color(color32(series.color))
                        .name(&series.name),
                );
            }
        });
    }

    /// One vertical axis per dimension at x = 0, 1, 2, ...; values normalized to [0, 1].
    fn draw_parallel(ui: &mut egui::Ui, id: &str, plot: &ParallelPlot) {
        let labels: Vec<String> = plot.dimensions.iter().map(|d| d.label.clone()).collect();
        let normalized: Vec<Vec<Option<f64>>> =
            plot.dimensions.iter().map(|d| d.normalized()).collect();

        let (code_min, code_max) = plot
            .color
            .values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        let scale = Palette::SET3;

        egui_plot::Plot::new(id)
            .height(PARALLEL_HEIGHT)
            .show_axes([true, false])
            .show_grid([false, false])
            .allow_scroll(false)
            .include_x(-0.5)
            .include_x(labels.len() as f64 - 0.5)
            .include_y(-0.1)
            .include_y(1.1)
            .x_axis_formatter(move |mark, _range| {
                let rounded = mark.value.round();
                if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                    return String::new();
                }
                labels.get(rounded as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for (axis, dim) in plot.dimensions.iter().enumerate() {
                    let x = axis as f64;
                    plot_ui.vline(VLine::new(x).color(AXIS_COLOR).width(1.0));

                    match &dim.ticks {
                        Some(ticks) if ticks.len() <= MAX_CATEGORY_TICKS => {
                            let last = ticks.len().saturating_sub(1).max(1) as f64;
                            for (code, tick) in ticks.iter().enumerate() {
                                let y = if ticks.len() > 1 { code as f64 / last } else { 0.5 };
                                plot_ui.text(
                                    Text::new(PlotPoint::new(x, y), RichText::new(tick).size(10.0)),
                                );
                            }
                        }
                        Some(_) => {}
                        None => {
                            if let Some((lo, hi)) = dim.range() {
                                plot_ui.text(Text::new(
                                    PlotPoint::new(x, -0.05),
                                    RichText::new(format!("{lo:.0}")).size(10.0),
                                ));
                                plot_ui.text(Text::new(
                                    PlotPoint::new(x, 1.05),
                                    RichText::new(format!("{hi:.0}")).size(10.0),
                                ));
                            }
                        }
                    }
                }

                for (row, code) in plot.color.values.iter().enumerate() {
                    let t = if code_max > code_min {
                        (code - code_min) / (code_max - code_min)
                    } else {
                        0.5
                    };
                    let color = color32(scale.sample(t)).gamma_multiply(0.6);

                    // Missing values break the polyline into segments
                    let mut segment: Vec<[f64; 2]> = Vec::new();
                    for (axis, values) in normalized.iter().enumerate() {
                        match values.get(row).copied().flatten() {
                            Some(y) => segment.push([axis as f64, y]),
                            None => {
                                Self::draw_segment(plot_ui, &mut segment, color);
                            }
                        }
                    }
                    Self::draw_segment(plot_ui, &mut segment, color);
                }
            });

        Self::draw_model_legend(ui, plot);
    }

    fn draw_segment(plot_ui: &mut egui_plot::PlotUi, segment: &mut Vec<[f64; 2]>, color: Color32) {
        let points = std::mem::take(segment);
        match points.len() {
            0 => {}
            1 => plot_ui.points(Points::new(PlotPoints::from(points)).radius(2.0).color(color)),
            _ => plot_ui.line(Line::new(PlotPoints::from(points)).color(color).width(1.0)),
        }
    }

    /// Model code to model name, shown under the color bar.
    fn draw_model_legend(ui: &mut egui::Ui, plot: &ParallelPlot) {
        ui.label(RichText::new(&plot.color.colorbar.title).strong().size(11.0));
        ui.horizontal_wrapped(|ui| {
            for model in &plot.models {
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 2.0, color32(model.color));
                ui.label(RichText::new(format!("{} {}", model.code, model.model)).size(11.0));
                ui.add_space(6.0);
            }
        });
        if plot.palette_wrapped {
            ui.label(
                RichText::new("More models than colors: some models share a color.")
                    .italics()
                    .size(10.0),
            );
        }
    }

    /// Draw price statistics table
    pub fn draw_stats_table(ui: &mut egui::Ui, summaries: &[PriceSummary]) {
        fn cell(value: f64) -> String {
            if value.is_nan() {
                "-".to_string()
            } else {
                format!("{:.0}", value)
            }
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id("price_summary_table"))
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Manufacturer", "N", "Mean", "Median", "Std", "P05", "P95"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for summary in summaries {
                            ui.label(RichText::new(&summary.make).size(11.0));
                            ui.label(RichText::new(summary.count.to_string()).size(11.0));
                            for value in [
                                summary.mean,
                                summary.median,
                                summary.std,
                                summary.p05,
                                summary.p95,
                            ] {
                                ui.label(RichText::new(cell(value)).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
