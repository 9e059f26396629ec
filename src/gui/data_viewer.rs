//! Data Viewer Widget
//! Table preview of the listings, optionally restricted to popular manufacturers.

use crate::data::{DataProcessor, ProcessorError, Session, POPULAR_MAKE_THRESHOLD};
use egui::{RichText, ScrollArea};
use polars::prelude::DataFrame;

const PREVIEW_ROWS: usize = 200;

/// Rendered cells of the first rows plus the number of rows the filter keeps.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub row_count: usize,
}

impl Preview {
    pub fn build(df: &DataFrame, include_small_makes: bool, limit: usize) -> Result<Self, ProcessorError> {
        let shown = if include_small_makes {
            df.clone()
        } else {
            DataProcessor::restrict_to_popular(df, POPULAR_MAKE_THRESHOLD)?
        };
        let head = shown.head(Some(limit));

        let columns: Vec<String> = head
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = vec![Vec::with_capacity(columns.len()); head.height()];
        for name in &columns {
            let values = DataProcessor::string_values(&head, name)?;
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(value.unwrap_or_default());
            }
        }

        Ok(Self {
            columns,
            rows,
            row_count: shown.height(),
        })
    }
}

/// Preview cached per "include small manufacturers" flag.
#[derive(Default)]
pub struct DataViewer {
    cache: Option<(bool, Result<Preview, String>)>,
}

impl DataViewer {
    pub fn clear(&mut self) {
        self.cache = None;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, session: &Session, include_small_makes: bool) {
        let stale = !matches!(&self.cache, Some((flag, _)) if *flag == include_small_makes);
        if stale {
            let preview = Preview::build(session.listings(), include_small_makes, PREVIEW_ROWS)
                .map_err(|e| {
                    log::error!("Failed to build data preview: {}", e);
                    e.to_string()
                });
            self.cache = Some((include_small_makes, preview));
        }

        let Some((_, preview)) = &self.cache else {
            return;
        };
        let preview = match preview {
            Ok(preview) => preview,
            Err(e) => {
                ui.label(RichText::new(format!("Error: {}", e)).color(egui::Color32::RED));
                return;
            }
        };

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::both()
                    .id_salt("data_viewer_scroll")
                    .max_height(300.0)
                    .show(ui, |ui| {
                        egui::Grid::new("data_viewer_grid")
                            .striped(true)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                for column in &preview.columns {
                                    ui.label(RichText::new(column).strong().size(11.0));
                                }
                                ui.end_row();

                                for row in &preview.rows {
                                    for cell in row {
                                        ui.label(RichText::new(cell).size(11.0));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });

        ui.label(format!("Number of rows shown: {}", preview.row_count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_preview_limits_rows_but_counts_all() {
        let df = df!(
            "make" => ["ford", "bmw", "ford"],
            "price" => [Some(1000.0), None, Some(2000.0)]
        )
        .unwrap();

        let preview = Preview::build(&df, true, 2).unwrap();
        assert_eq!(preview.columns, vec!["make", "price"]);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[0][0], "ford");
        assert_eq!(preview.rows[1][1], "");
        assert_eq!(preview.row_count, 3);
    }

    #[test]
    fn test_preview_without_small_makes() {
        let df = df!(
            "make" => ["ford", "bmw", "ford"],
            "price" => [1000.0, 1500.0, 2000.0]
        )
        .unwrap();

        // No manufacturer in the fixture passes the popularity threshold
        let preview = Preview::build(&df, false, 10).unwrap();
        assert_eq!(preview.row_count, 0);
        assert!(preview.rows.is_empty());
    }
}
