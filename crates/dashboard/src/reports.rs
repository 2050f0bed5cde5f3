//! The seven fixed sensor reports.
//!
//! Each report turns a [`Series`] into a [`Dashboard`]. Detector scores are
//! computed fresh per report, so two reports never share flags.

use std::fmt;
use std::str::FromStr;

use aggregate::{
    density_by, density_over_range, heatmap_pivot, histogram, stacked_year_month, CalendarKey, DensityGrid,
    EmptyGroupPolicy, Reduction, DEFAULT_BINS, SLOT_MINUTES,
};
use anomaly_facade::{DetectorKind, PipelineConfig, ScoreTable, ScoringPipeline};
use data_facade::{daily_mean, default_failure_windows, window_indices, AnomalyWindow, Series};
use serde::{Deserialize, Serialize};

use crate::chart::{
    Axis, BarChart, BarEntry, BarStack, Chart, Color, Dashboard, HeatmapChart, Panel, SeriesKind, Theme, XyChart,
    XySeries,
};
use crate::error::{DashboardError, Result};

const MINUTE_MS: f64 = 60_000.0;
const DAY_MS: f64 = 24.0 * 60.0 * MINUTE_MS;
/// Grid size of the score density panel.
const SCORE_DENSITY_POINTS: usize = 1000;

/// Knobs shared by every report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub pipeline: PipelineConfig,
    /// Grid size of the temperature density curves.
    pub density_points: usize,
    /// Bin count of the score histograms.
    pub bins: usize,
    pub empty_groups: EmptyGroupPolicy,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            density_points: 100,
            bins: DEFAULT_BINS,
            empty_groups: EmptyGroupPolicy::Abort,
        }
    }
}

/// Report selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Report {
    TimeSeries,
    BarCharts,
    AreaCharts,
    AnomalyScores,
    AllModels,
    Heatmap,
    #[serde(rename = "dashboard")]
    SelectedModels,
}

impl Report {
    pub const ALL: [Report; 7] = [
        Report::TimeSeries,
        Report::BarCharts,
        Report::AreaCharts,
        Report::AnomalyScores,
        Report::AllModels,
        Report::Heatmap,
        Report::SelectedModels,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Report::TimeSeries => "time-series",
            Report::BarCharts => "bar-charts",
            Report::AreaCharts => "area-charts",
            Report::AnomalyScores => "anomaly-scores",
            Report::AllModels => "all-models",
            Report::Heatmap => "heatmap",
            Report::SelectedModels => "dashboard",
        }
    }

    /// Assemble the report. The time series report labels the dataset's
    /// known failure windows.
    pub fn build(&self, series: &Series, options: &ReportOptions) -> Result<Dashboard> {
        match self {
            Report::TimeSeries => time_series_report(series, &default_failure_windows()?),
            Report::BarCharts => bar_charts_report(series),
            Report::AreaCharts => area_charts_report(series, options),
            Report::AnomalyScores => anomaly_scores_report(series, options),
            Report::AllModels => all_models_report(series, options),
            Report::Heatmap => heatmap_report(series),
            Report::SelectedModels => selected_models_report(series, options),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Report {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        Report::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| DashboardError::InvalidLayout(format!("unknown report '{}'", s)))
    }
}

// ============================================================================
// Building blocks
// ============================================================================

fn require_data(series: &Series) -> Result<()> {
    if series.is_empty() {
        return Err(DashboardError::EmptySeries("Temperature".to_string()));
    }
    Ok(())
}

fn temperature_line(series: &Series) -> Result<XySeries> {
    XySeries::line("Temperature", series.epoch_millis(), series.values())
}

/// Date axis scrolled over the whole series.
fn date_axis(title: &str, x: &[f64]) -> Axis {
    let axis = Axis::date_time(title);
    match (x.first(), x.last()) {
        (Some(&start), Some(&end)) => axis.interval(start, end),
        _ => axis,
    }
}

/// Temperature line with the readings at `indices` as red points.
fn marked_chart(series: &Series, indices: &[usize], name: &str, point_size: f64) -> Result<Chart> {
    let marked = series.select(indices);
    let points = XySeries::points(
        name,
        marked.iter().map(|r| r.epoch_millis()).collect(),
        marked.iter().map(|r| r.value).collect(),
    )?
    .point_size(point_size)
    .color(Color::RED);

    let chart = XyChart::new(date_axis("Date", &series.epoch_millis()), Axis::linear("Temperature"))
        .with_series(temperature_line(series)?)
        .with_series(points);
    Ok(Chart::Xy(chart))
}

fn detections_panel(series: &Series, table: &ScoreTable, kind: DetectorKind, row: usize, column: usize) -> Result<Panel> {
    let chart = marked_chart(series, &table.flagged_indices(kind), "Detected Points", 5.0)?;
    Ok(Panel::at(row, column, format!("{} - Detected Points", kind.title()), chart))
}

fn scores_of(table: &ScoreTable, kind: DetectorKind) -> Result<&[f64]> {
    table
        .scores(kind)
        .ok_or_else(|| DashboardError::EmptySeries(kind.score_column().to_string()))
}

fn score_histogram(table: &ScoreTable, kind: DetectorKind, bins: usize) -> Result<Chart> {
    let h = histogram(scores_of(table, kind)?, bins)?;
    let entries = h
        .bars()
        .into_iter()
        .map(|(category, count)| BarEntry {
            category,
            value: count as f64,
        })
        .collect();
    Ok(Chart::Bar(BarChart::simple(entries)?))
}

fn stacked_bars(series: &Series, reduction: Reduction) -> Result<Chart> {
    let bars = stacked_year_month(series, reduction);
    let stacks = bars
        .groups
        .into_iter()
        .map(|g| BarStack {
            name: g.name,
            values: g.values,
        })
        .collect();
    Ok(Chart::Bar(BarChart::stacked(bars.categories, stacks)?))
}

fn density_chart(grid: DensityGrid, x_title: &str, legend: bool) -> Result<Chart> {
    let mut chart = XyChart::new(Axis::linear(x_title), Axis::linear("Density"));
    for curve in grid.curves {
        chart = chart.with_series(XySeries::new(curve.name, SeriesKind::PositiveArea, grid.x.clone(), curve.density)?);
    }
    if !legend {
        chart = chart.without_legend();
    }
    Ok(Chart::Xy(chart))
}

fn heatmap_chart(series: &Series) -> Result<Chart> {
    let grid = heatmap_pivot(series)?;
    let origin = series
        .iter()
        .map(|r| r.epoch_millis())
        .fold(f64::INFINITY, f64::min);
    let chart = HeatmapChart::new(
        grid.values,
        (SLOT_MINUTES as f64 * MINUTE_MS, 2.0 * DAY_MS),
        Axis::date_time_from("Time", origin),
        Axis::date_time_from("Date", origin),
    )?;
    Ok(Chart::Heatmap(chart))
}

fn score_table(series: &Series, kinds: &[DetectorKind], config: &PipelineConfig) -> Result<ScoreTable> {
    let table = ScoringPipeline::new()
        .selected(kinds)
        .config(config.clone())
        .run(&series.values())?;
    Ok(table)
}

// ============================================================================
// Reports
// ============================================================================

/// Temperature with the labelled failure readings, next to the daily mean.
pub fn time_series_report(series: &Series, windows: &[AnomalyWindow]) -> Result<Dashboard> {
    require_data(series)?;
    let mut dashboard = Dashboard::new("Machine Temperature", 1, 2, Theme::Dark)?;

    let labelled = window_indices(series, windows);
    let chart = marked_chart(series, &labelled, "Anomaly Points", 3.0)?;
    dashboard.add(Panel::at(0, 0, "Temperature & Given Anomaly Points", chart))?;

    let days = daily_mean(series);
    let x: Vec<f64> = days.iter().map(|d| d.epoch_millis).collect();
    let mean = XySeries::line("Mean Temperature", x.clone(), days.iter().map(|d| d.mean).collect())?;
    let chart = XyChart::new(date_axis("Time", &x), Axis::linear("Temperature")).with_series(mean);
    dashboard.add(Panel::at(0, 1, "Temperature Mean by Day", Chart::Xy(chart)))?;

    tracing::info!(labelled = labelled.len(), days = days.len(), "time series report built");
    Ok(dashboard)
}

/// Year/month count, mean, max and min as stacked bars.
pub fn bar_charts_report(series: &Series) -> Result<Dashboard> {
    require_data(series)?;
    let mut dashboard = Dashboard::new("Year/Month Statistics", 2, 2, Theme::Dark)?;
    let cells = [
        (Reduction::Count, 0, 0),
        (Reduction::Mean, 0, 1),
        (Reduction::Max, 1, 0),
        (Reduction::Min, 1, 1),
    ];
    for (reduction, row, column) in cells {
        let title = format!("Year/Month {}", reduction.label());
        dashboard.add(Panel::at(row, column, title, stacked_bars(series, reduction)?))?;
    }
    tracing::info!("bar charts report built");
    Ok(dashboard)
}

/// Temperature density overall, per year and per month.
pub fn area_charts_report(series: &Series, options: &ReportOptions) -> Result<Dashboard> {
    require_data(series)?;
    let mut dashboard = Dashboard::new("Temperature Distribution", 1, 3, Theme::Black)?;
    let points = options.density_points;

    let whole = density_over_range(&series.values(), points)?;
    dashboard.add(Panel::at(0, 0, "Temperature Distribution", density_chart(whole, "Temperature", false)?))?;

    let by_year = density_by(series, CalendarKey::Year, points, options.empty_groups)?;
    dashboard.add(Panel::at(
        0,
        1,
        "Temperature by Year Distribution",
        density_chart(by_year, "Temperature", true)?,
    ))?;

    let by_month = density_by(series, CalendarKey::Month, points, options.empty_groups)?;
    dashboard.add(Panel::at(
        0,
        2,
        "Temperature by Month Distribution",
        density_chart(by_month, "Temperature", true)?,
    ))?;

    tracing::info!(points, "area charts report built");
    Ok(dashboard)
}

/// Score histograms of the five scoring methods.
pub fn anomaly_scores_report(series: &Series, options: &ReportOptions) -> Result<Dashboard> {
    require_data(series)?;
    let cells = [
        (DetectorKind::Hotelling, 0, 0),
        (DetectorKind::OneClassSvm, 0, 1),
        (DetectorKind::IsolationForest, 0, 2),
        (DetectorKind::LocalOutlierFactor, 1, 0),
        (DetectorKind::ChangeFinder, 1, 1),
    ];
    let kinds: Vec<DetectorKind> = cells.iter().map(|c| c.0).collect();
    let table = score_table(series, &kinds, &options.pipeline)?;

    let mut dashboard = Dashboard::new("Anomaly Scores", 2, 3, Theme::Dark)?;
    for (kind, row, column) in cells {
        let title = format!("{} Anomaly Scores", kind.title());
        dashboard.add(Panel::at(row, column, title, score_histogram(&table, kind, options.bins)?))?;
    }
    tracing::info!(methods = kinds.len(), "anomaly scores report built");
    Ok(dashboard)
}

/// Detected points of all six methods.
pub fn all_models_report(series: &Series, options: &ReportOptions) -> Result<Dashboard> {
    require_data(series)?;
    let table = score_table(series, &DetectorKind::ALL, &options.pipeline)?;

    let mut dashboard = Dashboard::new("All Models", 3, 2, Theme::Dark)?;
    for (i, kind) in DetectorKind::ALL.into_iter().enumerate() {
        dashboard.add(detections_panel(series, &table, kind, i / 2, i % 2)?)?;
        tracing::debug!(method = kind.as_str(), flagged = table.flagged_indices(kind).len(), "panel added");
    }
    tracing::info!("all models report built");
    Ok(dashboard)
}

/// Date × time-of-day heatmap.
pub fn heatmap_report(series: &Series) -> Result<Dashboard> {
    require_data(series)?;
    let mut dashboard = Dashboard::new("Temperature Heatmap", 1, 1, Theme::Dark)?;
    dashboard.add(Panel::at(0, 0, "Temperature by Date and Time", heatmap_chart(series)?))?;
    tracing::info!("heatmap report built");
    Ok(dashboard)
}

/// Mixed 3×3 dashboard of the most informative panels.
pub fn selected_models_report(series: &Series, options: &ReportOptions) -> Result<Dashboard> {
    require_data(series)?;
    let kinds = [
        DetectorKind::Hotelling,
        DetectorKind::OneClassSvm,
        DetectorKind::IsolationForest,
        DetectorKind::ChangeFinder,
    ];
    let table = score_table(series, &kinds, &options.pipeline)?;
    let mut dashboard = Dashboard::new("Selected Models", 3, 3, Theme::Dark)?;

    // descriptive column
    dashboard.add(Panel::at(0, 0, "Temperature by Date and Time", heatmap_chart(series)?))?;
    dashboard.add(Panel::at(
        1,
        0,
        "Year/Month Mean Temperature",
        stacked_bars(series, Reduction::Mean)?,
    ))?;
    let by_month = density_by(series, CalendarKey::Month, options.density_points, options.empty_groups)?;
    dashboard.add(Panel::at(
        2,
        0,
        "Temperature by Month Distribution",
        density_chart(by_month, "Temperature", true)?,
    ))?;

    // detections
    for (row, kind) in kinds[..3].iter().enumerate() {
        dashboard.add(detections_panel(series, &table, *kind, row, 1)?)?;
    }

    // scores
    let iforest = DetectorKind::IsolationForest;
    dashboard.add(Panel::at(
        0,
        2,
        format!("{} Anomaly Scores", iforest.title()),
        score_histogram(&table, iforest, options.bins)?,
    ))?;

    let x = series.epoch_millis();
    let cf = table
        .result(DetectorKind::ChangeFinder)
        .ok_or_else(|| DashboardError::EmptySeries(DetectorKind::ChangeFinder.score_column().to_string()))?;
    let score = XySeries::line("Anomaly Score", x.clone(), cf.scores.clone())?;
    let threshold = XySeries::line("Threshold", x.clone(), vec![cf.threshold; x.len()])?
        .dashed()
        .color(Color::RED);
    let chart = XyChart::new(date_axis("Date", &x), Axis::linear("Anomaly Score"))
        .with_series(score)
        .with_series(threshold);
    dashboard.add(Panel::at(1, 2, "ChangeFinder - Anomaly Score & Threshold", Chart::Xy(chart)))?;

    let grid = density_over_range(scores_of(&table, iforest)?, SCORE_DENSITY_POINTS)?;
    let density = grid.curves.into_iter().next().map(|c| c.density).unwrap_or_default();
    let mirrored: Vec<f64> = density.iter().map(|d| -d).collect();
    let chart = XyChart::new(Axis::linear("Anomaly Score"), Axis::linear("Density"))
        .with_series(XySeries::new("Density", SeriesKind::Area, grid.x.clone(), density)?)
        .with_series(XySeries::new("Density (mirrored)", SeriesKind::Area, grid.x, mirrored)?)
        .without_legend();
    dashboard.add(Panel::at(
        2,
        2,
        format!("{} Score Density", iforest.title()),
        Chart::Xy(chart),
    ))?;

    tracing::info!(panels = dashboard.panels.len(), "selected models report built");
    Ok(dashboard)
}
