//! Dashboard descriptions for the machine temperature reports.
//!
//! Reports produce a [`Dashboard`]: a grid of titled panels holding line,
//! point, area, bar and heatmap charts. Drawing is left to whatever consumes
//! the description through a [`RenderSink`].
//!
//! # Example
//!
//! ```rust,no_run
//! use dashboard::{JsonSink, RenderSink, Report, ReportOptions};
//! use data_facade::{CsvSeriesSource, SeriesSource};
//!
//! let series = CsvSeriesSource::from_path("machine_temperature_system_failure.csv").load()?;
//! let board = Report::AllModels.build(&series, &ReportOptions::default())?;
//! JsonSink::pretty(std::io::stdout()).render(&board)?;
//! # Ok::<(), dashboard::DashboardError>(())
//! ```

pub mod chart;
mod error;
mod render;
pub mod reports;
mod scored;

pub use chart::{Chart, Dashboard, Panel, Theme};
pub use error::{DashboardError, Result};
pub use render::{JsonSink, RenderSink};
pub use reports::{
    all_models_report, anomaly_scores_report, area_charts_report, bar_charts_report, heatmap_report,
    selected_models_report, time_series_report, Report, ReportOptions,
};
pub use scored::{join, ScoredReading};
