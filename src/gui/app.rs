//! Car Ads EDA Main Application
//! Main window with control panel and dashboard.

use crate::charts::ChartSpec;
use crate::data::{load_listings, Session};
use crate::export::export_specs;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

const EXPORT_WIDTH: u32 = 1200;
const EXPORT_HEIGHT: u32 = 700;

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete(Session),
    Missing(PathBuf),
    Error(String),
}

/// Chart export result from background thread
enum ExportResult {
    Complete { dir: PathBuf, files: usize },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    session: Option<Session>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,

    // Async chart export
    export_rx: Option<Receiver<ExportResult>>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_path: PathBuf) -> Self {
        let mut app = Self {
            session: None,
            control_panel: ControlPanel::new(&data_path),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
            export_rx: None,
        };
        app.start_loading(data_path);
        app
    }

    /// Load the CSV in a background thread
    fn start_loading(&mut self, path: PathBuf) {
        if self.is_loading {
            return; // Already loading
        }

        self.chart_viewer.clear();
        self.control_panel.data_path = Some(path.clone());
        self.control_panel.set_status("Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(format!(
                "Reading {}...",
                path.display()
            )));

            let result = match load_listings(&path) {
                Ok(Some(listings)) => match Session::new(listings, &path) {
                    Ok(session) => LoadResult::Complete(session),
                    Err(e) => LoadResult::Error(e.to_string()),
                },
                Ok(None) => LoadResult::Missing(path),
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_status(status);
                    }
                    LoadResult::Complete(session) => {
                        self.control_panel.row_count = Some(session.row_count());
                        self.control_panel.export_enabled = true;
                        self.control_panel.set_status(format!(
                            "Loaded {} rows, {} manufacturers",
                            session.row_count(),
                            session.makes().len()
                        ));
                        self.chart_viewer.set_session(&session);
                        self.session = Some(session);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Missing(path) => {
                        self.session = None;
                        self.control_panel.row_count = None;
                        self.control_panel.export_enabled = false;
                        self.control_panel.set_status(format!(
                            "Data file not found: {}. Browse for a CSV file.",
                            path.display()
                        ));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        log::error!("Failed to load listings: {}", error);
                        self.session = None;
                        self.control_panel.row_count = None;
                        self.control_panel.export_enabled = false;
                        self.control_panel.set_status(format!("Error: {}", error));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(path);
        }
    }

    fn handle_reload(&mut self) {
        if let Some(path) = self.control_panel.data_path.clone() {
            self.start_loading(path);
        }
    }

    /// Write the displayed charts to a chosen directory in a background thread
    fn handle_export(&mut self) {
        if self.export_rx.is_some() {
            return; // Already exporting
        }

        let Some(charts) = self.chart_viewer.charts() else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        // Ask user for output location
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        // The worker gets its own copies; the dashboard keeps drawing
        let specs: Vec<(String, ChartSpec)> = charts
            .exportable()
            .into_iter()
            .map(|(name, spec)| (name, spec.clone()))
            .collect();
        let format = self.control_panel.export_format;

        let (tx, rx) = channel();
        self.export_rx = Some(rx);
        self.control_panel
            .set_status(format!("Exporting {} charts...", specs.len()));

        thread::spawn(move || {
            let result = match export_specs(&specs, &dir, format, EXPORT_WIDTH, EXPORT_HEIGHT) {
                Ok(files) => ExportResult::Complete {
                    dir,
                    files: files.len(),
                },
                Err(e) => {
                    log::error!("Export failed: {:#}", e);
                    ExportResult::Error(format!("{:#}", e))
                }
            };
            let _ = tx.send(result);
        });
    }

    /// Check for chart export results
    fn check_export_results(&mut self) {
        let Some(rx) = self.export_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(ExportResult::Complete { dir, files }) => {
                self.control_panel
                    .set_status(format!("Exported {} files to {}", files, dir.display()));
            }
            Ok(ExportResult::Error(error)) => {
                self.control_panel.set_status(format!("Error: {}", error));
            }
            Err(TryRecvError::Empty) => self.export_rx = Some(rx),
            Err(TryRecvError::Disconnected) => {
                self.control_panel.set_status("Error: export stopped unexpectedly");
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();
        self.check_export_results();
        let is_exporting = self.export_rx.is_some();
        self.control_panel.is_busy = self.is_loading || is_exporting;

        // Request repaint while working in the background
        if self.is_loading || is_exporting {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::ExportCharts => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ctx, ui, self.session.as_ref());
        });
    }
}
