//! Chart Viewer Widget
//! Central scrollable dashboard: data viewer, distribution charts, price
//! comparison, scatter plot and parallel coordinates, each with its controls.

use crate::charts::{ChartPlotter, ChartSpec, ColorField, DashboardCharts, ScatterField, Selections};
use crate::data::Session;
use crate::gui::DataViewer;
use egui::{Color32, ComboBox, RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;
const CARD_WIDTH: f32 = 1100.0;

/// Scrollable dashboard. Charts are rebuilt only when the selections change.
pub struct ChartViewer {
    pub selections: Selections,
    /// Data viewer filter; the charts ignore it.
    pub include_small_makes: bool,
    charts: Option<DashboardCharts>,
    built_for: Option<Selections>,
    build_error: Option<String>,
    data_viewer: DataViewer,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self {
            selections: Selections::default(),
            include_small_makes: true,
            charts: None,
            built_for: None,
            build_error: None,
            data_viewer: DataViewer::default(),
        }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset selections and drop cached charts for a freshly loaded session.
    pub fn set_session(&mut self, session: &Session) {
        self.selections = Selections::for_session(session);
        self.include_small_makes = true;
        self.clear();
    }

    /// Clear all charts
    pub fn clear(&mut self) {
        self.charts = None;
        self.built_for = None;
        self.build_error = None;
        self.data_viewer.clear();
    }

    pub fn charts(&self) -> Option<&DashboardCharts> {
        self.charts.as_ref()
    }

    /// Selections changed since the charts were last built.
    fn is_stale(&self) -> bool {
        self.built_for.as_ref() != Some(&self.selections)
    }

    fn refresh(&mut self, session: &Session) {
        if !self.is_stale() {
            return;
        }

        match DashboardCharts::build(session, &self.selections) {
            Ok(charts) => {
                self.charts = Some(charts);
                self.build_error = None;
            }
            Err(e) => {
                log::error!("Failed to build charts: {}", e);
                self.charts = None;
                self.build_error = Some(e.user_message());
            }
        }
        self.built_for = Some(self.selections.clone());
    }

    /// Draw the dashboard
    pub fn show(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, session: Option<&Session>) {
        let Some(session) = session else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        self.refresh(session);

        ui.heading(RichText::new("EDA - Car Advertisement").size(24.0).strong());
        ui.label(
            "Explore and visualize various aspect of Car Advertisement dataset in USA for the years 2018-19.",
        );

        let Self {
            selections,
            include_small_makes,
            charts,
            build_error,
            data_viewer,
            ..
        } = self;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.set_max_width(CARD_WIDTH);

                Self::section(ui, "Data Viewer");
                ui.checkbox(
                    include_small_makes,
                    "Include manufacturers with less than 1000 ads",
                );
                data_viewer.show(ui, session, *include_small_makes);

                if let Some(error) = build_error {
                    ui.add_space(SECTION_SPACING);
                    ui.label(RichText::new(error.as_str()).color(Color32::from_rgb(220, 53, 69)));
                }

                Self::section(ui, "Vehicles by Manufacturer");
                ui.horizontal(|ui| {
                    ui.label("Display vehicle information by:");
                    for field in ColorField::ALL {
                        ui.radio_value(&mut selections.color_field, field, field.label());
                    }
                });
                Self::card(ui, "vehicles_by_make", charts.as_ref().map(|c| &c.vehicles_by_make));

                Self::section(ui, "Odometer Distribution");
                Self::card(ui, "odometer", charts.as_ref().map(|c| &c.odometer));

                Self::section(ui, "Price Distribution");
                Self::card(ui, "price", charts.as_ref().map(|c| &c.price));

                Self::section(ui, "Price Analysis");
                ui.label(
                    RichText::new("Price Distribution Comparison between Manufacturer")
                        .italics()
                        .color(Color32::GRAY),
                );
                Self::make_multiselect(ui, session, &mut selections.compared_makes);
                if let Some(charts) = charts.as_ref() {
                    if let Some(comparison) = &charts.comparison {
                        Self::card(ui, "price_comparison", Some(comparison));
                    }
                    if !charts.summaries.is_empty() {
                        ui.add_space(8.0);
                        ChartPlotter::draw_stats_table(ui, &charts.summaries);
                    }
                }

                ui.add_space(SECTION_SPACING);
                ui.label(
                    RichText::new("Price variation with Odometer and Days Listed")
                        .italics()
                        .color(Color32::GRAY),
                );
                ui.horizontal(|ui| {
                    ui.label("Select X-axis");
                    for field in ScatterField::ALL {
                        ui.radio_value(&mut selections.scatter_field, field, field.label());
                    }
                });
                Self::card(ui, "scatter", charts.as_ref().map(|c| &c.scatter));

                Self::section(ui, "View Parallel Coordinates");
                ui.horizontal(|ui| {
                    ui.label("Select a Manufacturer:");
                    ComboBox::from_id_salt("parallel_make")
                        .width(180.0)
                        .selected_text(selections.parallel_make.clone().unwrap_or_default())
                        .show_ui(ui, |ui| {
                            for make in session.makes() {
                                ui.selectable_value(
                                    &mut selections.parallel_make,
                                    Some(make.clone()),
                                    make,
                                );
                            }
                        });
                });
                match charts.as_ref().and_then(|c| c.parallel.as_ref()) {
                    Some(Ok(spec)) => Self::card(ui, "parallel", Some(spec)),
                    Some(Err(e)) => {
                        let color = if e.is_expected() {
                            Color32::GRAY
                        } else {
                            Color32::from_rgb(220, 53, 69)
                        };
                        ui.label(RichText::new(e.user_message()).color(color));
                    }
                    None => {}
                }
                ui.add_space(SECTION_SPACING);
            });

        // Widgets changed this frame: rebuild on the next one
        if self.is_stale() {
            ctx.request_repaint();
        }
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.add_space(SECTION_SPACING);
        ui.separator();
        ui.label(RichText::new(title).size(18.0).strong());
        ui.add_space(5.0);
    }

    fn card(ui: &mut egui::Ui, id: &str, spec: Option<&ChartSpec>) {
        let Some(spec) = spec else {
            return;
        };
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ChartPlotter::draw(ui, id, spec);
            });
    }

    /// Combo box of checkboxes; selection order is kept.
    fn make_multiselect(ui: &mut egui::Ui, session: &Session, selected: &mut Vec<String>) {
        let summary = if selected.is_empty() {
            "Choose manufacturers".to_string()
        } else {
            selected.join(", ")
        };

        ui.horizontal(|ui| {
            ui.label("Select the Manufacturer for Comparison");
            ComboBox::from_id_salt("compared_makes")
                .width(320.0)
                .selected_text(summary)
                .show_ui(ui, |ui| {
                    for make in session.makes() {
                        let mut checked = selected.contains(make);
                        if ui.checkbox(&mut checked, make).changed() {
                            if checked {
                                selected.push(make.clone());
                            } else {
                                selected.retain(|m| m != make);
                            }
                        }
                    }
                });
            if !selected.is_empty() && ui.small_button("Clear").clicked() {
                selected.clear();
            }
        });
    }
}
