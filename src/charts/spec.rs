//! Declarative chart specifications.
//!
//! A `ChartSpec` carries everything a renderer needs: titles, axis labels,
//! layout overrides and the already-aggregated data (histogram counts, scatter
//! points, parallel-coordinates dimensions). Renderers never look at the
//! listings table.

use super::palette::Rgb;
use crate::stats::NumericBins;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub layout: Layout,
    pub plot: Plot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
}

impl Axis {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub show_legend: bool,
    pub margin: Option<Margin>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            show_legend: true,
            margin: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub top: u32,
    pub bottom: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Plot {
    Histogram(HistogramPlot),
    Scatter(ScatterPlot),
    ParallelCoordinates(ParallelPlot),
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    /// Series stacked on top of each other.
    Stack,
    /// Series drawn over each other, relying on opacity.
    Overlay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Bins {
    Categorical { categories: Vec<String> },
    Numeric { start: f64, size: f64, count: usize },
}

impl Bins {
    pub fn len(&self) -> usize {
        match self {
            Bins::Categorical { categories } => categories.len(),
            Bins::Numeric { count, .. } => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Left and right x coordinate of a bar.
    pub fn edges(&self, index: usize) -> (f64, f64) {
        match self {
            Bins::Categorical { .. } => (index as f64 - 0.4, index as f64 + 0.4),
            Bins::Numeric { start, size, .. } => {
                let lo = start + index as f64 * size;
                (lo, lo + size)
            }
        }
    }

    pub fn center(&self, index: usize) -> f64 {
        let (lo, hi) = self.edges(index);
        (lo + hi) / 2.0
    }

    pub fn bar_width(&self) -> f64 {
        let (lo, hi) = self.edges(0);
        hi - lo
    }

    /// Visible x range including half a bar of padding for categories.
    pub fn x_range(&self) -> (f64, f64) {
        match self {
            Bins::Categorical { categories } => (-0.5, categories.len().max(1) as f64 - 0.5),
            Bins::Numeric { start, size, count } => {
                (*start, start + (*count).max(1) as f64 * size)
            }
        }
    }

    /// Tick text at an x position: the category name for categorical bins.
    pub fn tick_label(&self, x: f64) -> String {
        match self {
            Bins::Categorical { categories } => {
                let rounded = x.round();
                if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
                    return String::new();
                }
                categories.get(rounded as usize).cloned().unwrap_or_default()
            }
            Bins::Numeric { .. } => format!("{x:.0}"),
        }
    }
}

impl From<NumericBins> for Bins {
    fn from(bins: NumericBins) -> Self {
        Bins::Numeric {
            start: bins.start,
            size: bins.size,
            count: bins.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub name: String,
    pub color: Rgb,
    /// One count per bin.
    pub counts: Vec<u64>,
}

impl HistogramSeries {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramPlot {
    pub barmode: BarMode,
    pub opacity: f32,
    pub bins: Bins,
    pub series: Vec<HistogramSeries>,
}

impl HistogramPlot {
    pub fn series(&self, name: &str) -> Option<&HistogramSeries> {
        self.series.iter().find(|s| s.name == name)
    }

    /// Tallest bar on screen, taking stacking into account.
    pub fn max_height(&self) -> u64 {
        match self.barmode {
            BarMode::Stack => (0..self.bins.len())
                .map(|i| self.series.iter().map(|s| s.counts[i]).sum::<u64>())
                .max()
                .unwrap_or(0),
            BarMode::Overlay => self
                .series
                .iter()
                .flat_map(|s| s.counts.iter().copied())
                .max()
                .unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub name: String,
    pub color: Rgb,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPlot {
    pub series: Vec<ScatterSeries>,
}

impl ScatterPlot {
    /// Bounding box of all points as ((x_min, x_max), (y_min, y_max)).
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut points = self.series.iter().flat_map(|s| s.points.iter());
        let first = points.next()?;
        let init = ((first[0], first[0]), (first[1], first[1]));
        Some(points.fold(init, |((x0, x1), (y0, y1)), p| {
            ((x0.min(p[0]), x1.max(p[0])), (y0.min(p[1]), y1.max(p[1])))
        }))
    }
}

// ---------------------------------------------------------------------------
// Parallel coordinates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimension {
    pub column: String,
    pub label: String,
    /// One value per listing; categorical axes hold category codes.
    pub values: Vec<Option<f64>>,
    /// Category names for categorical axes, indexed by code.
    pub ticks: Option<Vec<String>>,
}

impl Dimension {
    pub fn range(&self) -> Option<(f64, f64)> {
        let mut values = self.values.iter().flatten().copied();
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Values scaled to [0, 1]; a degenerate range maps everything to 0.5.
    pub fn normalized(&self) -> Vec<Option<f64>> {
        let Some((lo, hi)) = self.range() else {
            return vec![None; self.values.len()];
        };
        self.values
            .iter()
            .map(|v| {
                v.map(|v| if hi > lo { (v - lo) / (hi - lo) } else { 0.5 })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum XAnchor {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: String,
    pub orientation: Orientation,
    pub x: f64,
    pub x_anchor: XAnchor,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorEncoding {
    pub column: String,
    pub values: Vec<f64>,
    pub scale: Vec<Rgb>,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelColor {
    pub code: i64,
    pub model: String,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParallelPlot {
    pub make: String,
    pub row_count: usize,
    pub dimensions: Vec<Dimension>,
    pub color: ColorEncoding,
    pub models: Vec<ModelColor>,
    /// More models than palette colors: some models share a color.
    pub palette_wrapped: bool,
}

impl ParallelPlot {
    pub fn model_color(&self, code: i64) -> Option<Rgb> {
        self.models.iter().find(|m| m.code == code).map(|m| m.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorical_bins() {
        let bins = Bins::Categorical {
            categories: vec!["ford".into(), "bmw".into()],
        };
        assert_eq!(bins.len(), 2);
        assert_eq!(bins.center(1), 1.0);
        assert_eq!(bins.tick_label(1.0), "bmw");
        assert_eq!(bins.tick_label(0.5), "");
        assert_eq!(bins.tick_label(7.0), "");
        assert_eq!(bins.x_range(), (-0.5, 1.5));
    }

    #[test]
    fn test_stacked_max_height() {
        let plot = HistogramPlot {
            barmode: BarMode::Stack,
            opacity: 0.8,
            bins: Bins::Numeric {
                start: 0.0,
                size: 10.0,
                count: 2,
            },
            series: vec![
                HistogramSeries {
                    name: "a".into(),
                    color: Rgb(0, 0, 0),
                    counts: vec![3, 1],
                },
                HistogramSeries {
                    name: "b".into(),
                    color: Rgb(0, 0, 0),
                    counts: vec![2, 4],
                },
            ],
        };
        assert_eq!(plot.max_height(), 5);

        let overlay = HistogramPlot {
            barmode: BarMode::Overlay,
            ..plot
        };
        assert_eq!(overlay.max_height(), 4);
    }

    #[test]
    fn test_dimension_normalization() {
        let dim = Dimension {
            column: "price".into(),
            label: "Price".into(),
            values: vec![Some(10.0), None, Some(30.0)],
            ticks: None,
        };
        assert_eq!(dim.range(), Some((10.0, 30.0)));
        assert_eq!(dim.normalized(), vec![Some(0.0), None, Some(1.0)]);

        let flat = Dimension {
            values: vec![Some(5.0), None],
            ..dim
        };
        assert_eq!(flat.normalized(), vec![Some(0.5), None]);
    }

    #[test]
    fn test_spec_serializes_with_kind_tag() {
        let spec = ChartSpec {
            title: "t".into(),
            x_axis: Axis::new("x"),
            y_axis: Axis::new("y"),
            layout: Layout::default(),
            plot: Plot::Scatter(ScatterPlot { series: vec![] }),
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["plot"]["kind"], "scatter");
        assert_eq!(json["x_axis"]["title"], "x");
    }
}
