//! Serialisable chart model.
//!
//! A [`Dashboard`] is a grid of [`Panel`]s, each holding one [`Chart`]. The
//! model carries everything a renderer needs and nothing about how to draw it.

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Colour theme of the whole dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Dark,
    Black,
    Light,
}

/// RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Line,
    Point,
    /// Filled to the baseline on both sides.
    Area,
    /// Filled above the baseline only.
    PositiveArea,
}

/// Optional drawing hints of one series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dashed: bool,
}

/// One named series of `(x, y)` points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XySeries {
    pub name: String,
    pub kind: SeriesKind,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub style: SeriesStyle,
}

impl XySeries {
    /// Create a series; `x` and `y` must have equal length.
    ///
    /// Line and area series must have at least one point. Point series may be
    /// empty, since a detector can flag nothing.
    pub fn new(name: impl Into<String>, kind: SeriesKind, x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if x.len() != y.len() {
            return Err(DashboardError::LengthMismatch {
                series: name,
                x: x.len(),
                y: y.len(),
            });
        }
        if x.is_empty() && kind != SeriesKind::Point {
            return Err(DashboardError::EmptySeries(name));
        }
        Ok(Self {
            name,
            kind,
            x,
            y,
            style: SeriesStyle::default(),
        })
    }

    pub fn line(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        Self::new(name, SeriesKind::Line, x, y)
    }

    pub fn points(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        Self::new(name, SeriesKind::Point, x, y)
    }

    pub fn point_size(mut self, size: f64) -> Self {
        self.style.point_size = Some(size);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.style.color = Some(color);
        self
    }

    pub fn dashed(mut self) -> Self {
        self.style.dashed = true;
        self
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TickStrategy {
    Linear,
    /// Ticks read as epoch milliseconds, optionally offset by `time_origin`.
    DateTime {
        #[serde(skip_serializing_if = "Option::is_none")]
        time_origin: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollStrategy {
    None,
    Progressive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    pub ticks: TickStrategy,
    pub scroll: ScrollStrategy,
    /// Initial visible `(start, end)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<(f64, f64)>,
}

impl Axis {
    /// Linear value axis.
    pub fn linear(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ticks: TickStrategy::Linear,
            scroll: ScrollStrategy::None,
            interval: None,
        }
    }

    /// Date-time axis with progressive scrolling.
    pub fn date_time(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ticks: TickStrategy::DateTime { time_origin: None },
            scroll: ScrollStrategy::Progressive,
            interval: None,
        }
    }

    /// Date-time axis whose values are offsets from `time_origin`.
    pub fn date_time_from(title: impl Into<String>, time_origin: f64) -> Self {
        Self {
            title: title.into(),
            ticks: TickStrategy::DateTime {
                time_origin: Some(time_origin),
            },
            scroll: ScrollStrategy::None,
            interval: None,
        }
    }

    pub fn interval(mut self, start: f64, end: f64) -> Self {
        self.interval = Some((start, end));
        self
    }
}

/// Cartesian chart of one or more series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XyChart {
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<XySeries>,
    pub legend: bool,
}

impl XyChart {
    pub fn new(x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            x_axis,
            y_axis,
            series: Vec::new(),
            legend: true,
        }
    }

    pub fn with_series(mut self, series: XySeries) -> Self {
        self.series.push(series);
        self
    }

    pub fn without_legend(mut self) -> Self {
        self.legend = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarEntry {
    pub category: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarStack {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BarData {
    Simple { entries: Vec<BarEntry> },
    Stacked { categories: Vec<String>, stacks: Vec<BarStack> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub data: BarData,
    pub legend: bool,
}

impl BarChart {
    /// One bar per entry.
    pub fn simple(entries: Vec<BarEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(DashboardError::EmptySeries("bars".to_string()));
        }
        Ok(Self {
            data: BarData::Simple { entries },
            legend: false,
        })
    }

    /// Stacked bars; every stack needs one value per category.
    pub fn stacked(categories: Vec<String>, stacks: Vec<BarStack>) -> Result<Self> {
        if categories.is_empty() {
            return Err(DashboardError::EmptySeries("categories".to_string()));
        }
        for stack in &stacks {
            if stack.values.len() != categories.len() {
                return Err(DashboardError::LengthMismatch {
                    series: stack.name.clone(),
                    x: categories.len(),
                    y: stack.values.len(),
                });
            }
        }
        Ok(Self {
            data: BarData::Stacked { categories, stacks },
            legend: true,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaletteStep {
    pub value: f64,
    pub color: Color,
}

/// Colour lookup for heatmap intensities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub steps: Vec<PaletteStep>,
    pub look_up_property: String,
    /// Step values are fractions of the value range rather than absolutes.
    pub percentage_values: bool,
}

impl Palette {
    /// Blue, yellow, red over the relative value range.
    pub fn blue_yellow_red() -> Self {
        Self {
            steps: vec![
                PaletteStep {
                    value: 0.0,
                    color: Color::BLUE,
                },
                PaletteStep {
                    value: 0.5,
                    color: Color::YELLOW,
                },
                PaletteStep {
                    value: 1.0,
                    color: Color::RED,
                },
            ],
            look_up_property: "value".to_string(),
            percentage_values: true,
        }
    }
}

/// Intensity grid. `values` has `columns` rows of `rows` cells each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapChart {
    pub columns: usize,
    pub rows: usize,
    /// Cell size along x and y.
    pub step: (f64, f64),
    pub values: Vec<Vec<f64>>,
    pub palette: Palette,
    pub x_axis: Axis,
    pub y_axis: Axis,
}

impl HeatmapChart {
    pub fn new(values: Vec<Vec<f64>>, step: (f64, f64), x_axis: Axis, y_axis: Axis) -> Result<Self> {
        let columns = values.len();
        let rows = values.first().map(Vec::len).unwrap_or(0);
        if columns == 0 || rows == 0 {
            return Err(DashboardError::EmptySeries("heatmap".to_string()));
        }
        if let Some(bad) = values.iter().find(|column| column.len() != rows) {
            return Err(DashboardError::LengthMismatch {
                series: "heatmap".to_string(),
                x: rows,
                y: bad.len(),
            });
        }
        Ok(Self {
            columns,
            rows,
            step,
            values,
            palette: Palette::blue_yellow_red(),
            x_axis,
            y_axis,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Xy(XyChart),
    Bar(BarChart),
    Heatmap(HeatmapChart),
}

/// A titled chart placed on the dashboard grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub row: usize,
    pub column: usize,
    pub row_span: usize,
    pub column_span: usize,
    pub title: String,
    pub chart: Chart,
}

impl Panel {
    /// Panel occupying a single cell.
    pub fn at(row: usize, column: usize, title: impl Into<String>, chart: Chart) -> Self {
        Self {
            row,
            column,
            row_span: 1,
            column_span: 1,
            title: title.into(),
            chart,
        }
    }
}

/// A grid of panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub title: String,
    pub rows: usize,
    pub columns: usize,
    pub theme: Theme,
    pub panels: Vec<Panel>,
}

impl Dashboard {
    pub fn new(title: impl Into<String>, rows: usize, columns: usize, theme: Theme) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(DashboardError::InvalidLayout(format!(
                "grid must be at least 1x1, got {}x{}",
                rows, columns
            )));
        }
        Ok(Self {
            title: title.into(),
            rows,
            columns,
            theme,
            panels: Vec::new(),
        })
    }

    /// Place a panel; it must fit inside the grid and not overlap another.
    pub fn add(&mut self, panel: Panel) -> Result<()> {
        if panel.row_span == 0 || panel.column_span == 0 {
            return Err(DashboardError::InvalidLayout(format!(
                "panel '{}' has an empty span",
                panel.title
            )));
        }
        if panel.row + panel.row_span > self.rows || panel.column + panel.column_span > self.columns {
            return Err(DashboardError::InvalidLayout(format!(
                "panel '{}' at row {} column {} does not fit a {}x{} grid",
                panel.title, panel.row, panel.column, self.rows, self.columns
            )));
        }
        if let Some(other) = self.panels.iter().find(|p| overlaps(p, &panel)) {
            return Err(DashboardError::InvalidLayout(format!(
                "panel '{}' overlaps '{}'",
                panel.title, other.title
            )));
        }
        self.panels.push(panel);
        Ok(())
    }

    /// Panel by title.
    pub fn panel(&self, title: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.title == title)
    }
}

fn overlaps(a: &Panel, b: &Panel) -> bool {
    a.row < b.row + b.row_span
        && b.row < a.row + a.row_span
        && a.column < b.column + b.column_span
        && b.column < a.column + a.column_span
}
